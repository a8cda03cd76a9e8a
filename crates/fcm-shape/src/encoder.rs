//! Forward map: vertex positions to fundamental coordinates.
//!
//! 1. Per-face gradient blocks `D = grad · V` (transposed deformation
//!    gradients).
//! 2. Polar split of each block into a proper rotation and an in-plane
//!    stretch with unit normal stretch.
//! 3. Reference frames pushed forward by the rotation give the current
//!    frames; each inner edge stores `frame_loᵀ · frame_hi`.
//! 4. Stretch is expressed in the reference frame and cut to its
//!    tangential 2×2 block.
//!
//! The map is invariant to rigid motions of the input.

use fcm_math::decomposition::polar_decomposition_in_plane;
use fcm_mesh::operators::{face_block, vertex_matrix};
use fcm_types::{FcmError, FcmResult};
use nalgebra::{Matrix3, Vector3};

use crate::coords::FcmCoords;
use crate::reference::ReferenceGeometry;

/// Encode `vertices` (same topology as the reference) as fundamental
/// coordinates.
pub fn encode(reference: &ReferenceGeometry, vertices: &[Vector3<f64>]) -> FcmResult<FcmCoords> {
    if vertices.len() != reference.vertex_count() {
        return Err(FcmError::DimensionMismatch {
            expected: reference.vertex_count(),
            actual: vertices.len(),
        });
    }

    let gradients = reference
        .operators()
        .face_gradients(&vertex_matrix(vertices));
    let frames = reference.frames();

    let mut current_frames = Vec::with_capacity(reference.face_count());
    let mut stretches = Vec::with_capacity(reference.face_count());

    for f in 0..reference.face_count() {
        let polar = polar_decomposition_in_plane(&face_block(&gradients, f));
        let frame = frames.frame(f);

        current_frames.push(polar.rotation.transpose() * frame);

        let local: Matrix3<f64> = frame.transpose() * polar.stretch * frame;
        stretches.push(local.fixed_view::<2, 2>(0, 0).into_owned());
    }

    let rotations = reference
        .adjacency()
        .edges()
        .iter()
        .map(|e| {
            let [lo, hi] = e.faces;
            current_frames[lo.index()].transpose() * current_frames[hi.index()]
        })
        .collect();

    Ok(FcmCoords {
        rotations,
        stretches,
    })
}
