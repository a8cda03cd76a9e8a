//! Discrete differential operators for piecewise-linear functions.
//!
//! The gradient maps vertex values to one constant gradient per face.
//! Applied to the `n×3` matrix of vertex positions it yields a stacked
//! `3m×3` matrix whose `3×3` block for face `f` is the transposed
//! deformation gradient of that face, `Σᵢ ∇φᵢ pᵢᵀ`. For the surface's own
//! vertices that block is the tangent projector `I − n̂n̂ᵀ`.
//!
//! The divergence is the area-weighted adjoint `gradᵀ · diag(A)`, so
//! `div · grad` is the (positive semi-definite) cotangent Laplacian.

use fcm_types::constants::DEGENERATE_AREA_THRESHOLD;
use fcm_types::{FcmError, FcmResult};
use nalgebra::{DMatrix, Matrix3, Vector3};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::mesh::Surface;
use crate::topology::FaceAdjacency;

/// Geometry-dependent operators of a surface.
///
/// Rebuilt whenever the vertex positions change; the topology is reused.
#[derive(Debug, Clone)]
pub struct DiscreteOperators {
    /// Gradient, `3m × n`. Row `3f + k` is component `k` of face `f`.
    pub grad: CsrMatrix<f64>,
    /// Divergence, `n × 3m`.
    pub div: CsrMatrix<f64>,
    /// Area of every face.
    pub face_areas: Vec<f64>,
    /// Area associated with every inner edge: a third of each incident face.
    pub edge_areas: Vec<f64>,
}

impl DiscreteOperators {
    /// Assemble the operators for `surface`.
    ///
    /// Fails on triangles whose area is below
    /// [`DEGENERATE_AREA_THRESHOLD`].
    pub fn build(surface: &Surface, adjacency: &FaceAdjacency) -> FcmResult<Self> {
        let n = surface.vertex_count();
        let m = surface.face_count();

        let mut grad = CooMatrix::new(3 * m, n);
        let mut div = CooMatrix::new(n, 3 * m);
        let mut face_areas = Vec::with_capacity(m);

        for f in 0..m {
            let idx = surface.face(f);
            let p = surface.corners(&surface.vertices, f);

            // Unnormalized normal, magnitude = 2 × triangle area
            let normal = (p[1] - p[0]).cross(&(p[2] - p[0]));
            let double_area = normal.norm();
            if double_area < 2.0 * DEGENERATE_AREA_THRESHOLD {
                return Err(FcmError::InvalidMesh(format!(
                    "Face {f} is degenerate (area {:.3e})",
                    0.5 * double_area
                )));
            }
            let unit_normal = normal / double_area;
            let area = 0.5 * double_area;
            face_areas.push(area);

            // ∇φᵢ = n̂ × eᵢ / 2A with eᵢ the edge opposite corner i
            for i in 0..3 {
                let edge = p[(i + 2) % 3] - p[(i + 1) % 3];
                let g = unit_normal.cross(&edge) / double_area;
                for k in 0..3 {
                    grad.push(3 * f + k, idx[i], g[k]);
                    div.push(idx[i], 3 * f + k, area * g[k]);
                }
            }
        }

        let edge_areas = adjacency
            .edges()
            .iter()
            .map(|e| (face_areas[e.faces[0].index()] + face_areas[e.faces[1].index()]) / 3.0)
            .collect();

        Ok(Self {
            grad: CsrMatrix::from(&grad),
            div: CsrMatrix::from(&div),
            face_areas,
            edge_areas,
        })
    }

    /// Per-face gradient blocks of a vertex configuration, stacked `3m×3`.
    pub fn face_gradients(&self, vertices: &DMatrix<f64>) -> DMatrix<f64> {
        &self.grad * vertices
    }

    /// Assemble the Poisson right-hand side `div · targets` from stacked
    /// per-face `3×3` target blocks.
    pub fn divergence(&self, targets: &DMatrix<f64>) -> DMatrix<f64> {
        &self.div * targets
    }
}

/// Pack vertex positions into an `n×3` matrix (one row per vertex).
pub fn vertex_matrix(vertices: &[Vector3<f64>]) -> DMatrix<f64> {
    DMatrix::from_fn(vertices.len(), 3, |i, k| vertices[i][k])
}

/// Unpack an `n×3` matrix into vertex positions.
pub fn vertices_from_matrix(m: &DMatrix<f64>) -> Vec<Vector3<f64>> {
    (0..m.nrows())
        .map(|i| Vector3::new(m[(i, 0)], m[(i, 1)], m[(i, 2)]))
        .collect()
}

/// The `3×3` block of face `f` in a stacked `3m×3` matrix.
#[inline]
pub fn face_block(stacked: &DMatrix<f64>, f: usize) -> Matrix3<f64> {
    stacked.fixed_view::<3, 3>(3 * f, 0).into_owned()
}

/// Stack per-face `3×3` blocks into a `3m×3` matrix.
pub fn stack_blocks(blocks: &[Matrix3<f64>]) -> DMatrix<f64> {
    let mut stacked = DMatrix::zeros(3 * blocks.len(), 3);
    for (f, block) in blocks.iter().enumerate() {
        stacked.fixed_view_mut::<3, 3>(3 * f, 0).copy_from(block);
    }
    stacked
}
