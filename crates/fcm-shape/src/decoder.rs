//! Inverse map: fundamental coordinates to vertex positions.
//!
//! Alternating local/global solve:
//! 1. **Initialize** one rotation per face by walking the spanning tree
//!    from the root face (identity there).
//! 2. **Global step**: target gradient blocks `U · Rᵀ` per face, Poisson
//!    solve for positions against the prefactored system.
//! 3. **Local step**: refit each face rotation from its neighbors'
//!    solved gradients, stretches and transitions.
//! 4. Re-center on the reference center of gravity, repeat from 2.
//!
//! The final iteration stops after its global step. The result is then
//! rotated so the root face frame matches the reference and translated
//! so the fixed vertex sits at its reference position.

use fcm_math::decomposition::proper_rotation;
use fcm_mesh::mesh::mean;
use fcm_mesh::operators::{face_block, stack_blocks, vertices_from_matrix};
use fcm_mesh::InnerEdge;
use fcm_types::{FaceId, FcmResult};
use nalgebra::{DMatrix, Matrix2, Matrix3, Vector3};
use tracing::debug;

use crate::coords::FcmCoords;
use crate::frame::frame_of_face;
use crate::reference::ReferenceGeometry;

/// Decode fundamental coordinates into vertex positions.
///
/// Runs `integration_iter` global steps of the configured reference.
pub fn decode(reference: &ReferenceGeometry, coords: &FcmCoords) -> FcmResult<Vec<Vector3<f64>>> {
    coords.check_shape(reference.edge_count(), reference.face_count())?;

    let frames = reference.frames();
    let operators = reference.operators();
    let edges = reference.adjacency().edges();
    let iterations = reference.config().integration_iter;

    let mut rotations = initial_rotations(reference, coords);
    let stretches: Vec<Matrix3<f64>> = coords
        .stretches
        .iter()
        .enumerate()
        .map(|(f, u)| ambient_stretch(frames.frame(f), u))
        .collect();

    let mut positions = DMatrix::zeros(reference.vertex_count(), 3);
    for iter in 0..iterations {
        // Global step
        let targets: Vec<Matrix3<f64>> = stretches
            .iter()
            .zip(&rotations)
            .map(|(u, r)| u * r.transpose())
            .collect();
        let rhs = operators.divergence(&stack_blocks(&targets));
        positions = reference.poisson().solve(&rhs)?;

        debug!(iteration = iter + 1, of = iterations, "Global step solved");

        if iter + 1 == iterations {
            break;
        }

        // Local step
        let gradients = operators.face_gradients(&positions);
        for (i, rotation) in rotations.iter_mut().enumerate() {
            let face = FaceId(i as u32);
            let mut blend = Matrix3::zeros();
            let mut any = false;
            for (neighbor, edge) in reference.adjacency().neighbors(face) {
                let j = neighbor.index();
                let transition = oriented_transition(coords, &edges[edge.index()], neighbor);
                blend += face_block(&gradients, j).transpose()
                    * stretches[j]
                    * frames.frame(j)
                    * transition
                    * frames.frame(i).transpose();
                any = true;
            }
            if any {
                *rotation = proper_rotation(&blend);
            }
        }

        // Re-center (the Poisson solve pins only one translational DoF)
        let shift = reference.center_of_gravity() - mean(&vertices_from_matrix(&positions));
        for mut row in positions.row_iter_mut() {
            row[0] += shift.x;
            row[1] += shift.y;
            row[2] += shift.z;
        }
    }

    Ok(align_to_reference(reference, vertices_from_matrix(&positions)))
}

/// Per-face rotations composed along the spanning tree.
fn initial_rotations(reference: &ReferenceGeometry, coords: &FcmCoords) -> Vec<Matrix3<f64>> {
    let frames = reference.frames();
    let edges = reference.adjacency().edges();
    let mut rotations = vec![Matrix3::identity(); reference.face_count()];

    for step in reference.spanning_tree().steps() {
        let (s, t) = (step.source.index(), step.target.index());
        let transition = oriented_transition(coords, &edges[step.edge.index()], step.source);
        rotations[t] = rotations[s] * frames.frame(s) * transition * frames.frame(t).transpose();
    }
    rotations
}

/// Transition rotation of `edge` read from face `from` towards the other
/// incident face: the stored block when `from` is the lower face id, its
/// transpose otherwise.
fn oriented_transition(coords: &FcmCoords, edge: &InnerEdge, from: FaceId) -> Matrix3<f64> {
    let c = coords.rotations[edge.id.index()];
    if from == edge.faces[0] {
        c
    } else {
        c.transpose()
    }
}

/// Embed a tangential 2×2 stretch into 3D (zero normal block) and express
/// it in ambient coordinates.
fn ambient_stretch(frame: &Matrix3<f64>, local: &Matrix2<f64>) -> Matrix3<f64> {
    let mut u = Matrix3::zeros();
    u.fixed_view_mut::<2, 2>(0, 0).copy_from(local);
    frame * u * frame.transpose()
}

/// Rotate so the root face frame matches the reference root frame, then
/// translate the fixed vertex onto its reference position.
fn align_to_reference(
    reference: &ReferenceGeometry,
    mut vertices: Vec<Vector3<f64>>,
) -> Vec<Vector3<f64>> {
    let config = reference.config();
    let surface = reference.surface();

    let current = frame_of_face(&surface.corners(&vertices, config.init_face));
    let rotation = reference.frames().frame(config.init_face) * current.transpose();
    for p in &mut vertices {
        *p = rotation * *p;
    }

    let shift = reference.fixed_vertex() - vertices[config.init_vert];
    for p in &mut vertices {
        *p += shift;
    }
    vertices
}
