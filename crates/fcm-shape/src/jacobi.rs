//! Jacobi-field operations of the shape space.
//!
//! Curvature lives entirely in the rotation factors; the stretch factors
//! are flat under the log-Euclidean metric.

use fcm_manifold::{FactorManifold, JacobiBasis, RotationGroup};
use nalgebra::Matrix3;

use crate::coords::FcmCoords;
use crate::space::FundamentalCoords;

impl FundamentalCoords {
    /// Jacobi operator along the geodesic from `x` to `y`, applied to the
    /// rotation-part tangent `r` (one skew block per inner edge).
    ///
    /// Uses only the rotation part `v` of `log(x, y)`:
    /// `¼(−v·v·r + 2·v·r·v − r·v·v)` per edge.
    pub fn jacop(&self, x: &FcmCoords, y: &FcmCoords, r: &[Matrix3<f64>]) -> Vec<Matrix3<f64>> {
        x.rotations
            .iter()
            .zip(&y.rotations)
            .zip(r)
            .map(|((p, q), r)| RotationGroup::jacop(&self.so3.log(p, q), r))
            .collect()
    }

    /// Eigenvalues and orthonormal eigenbasis of the Jacobi operator along
    /// the geodesic from `x` to `y`, rotation part only, one basis per
    /// inner edge.
    pub fn jac_onb(&self, x: &FcmCoords, y: &FcmCoords) -> Vec<JacobiBasis<Matrix3<f64>>> {
        x.rotations
            .iter()
            .zip(&y.rotations)
            .map(|(p, q)| self.so3.jac_onb(p, q))
            .collect()
    }

    /// Adjoint Jacobi field along the geodesic `γ` from `x` to `y`: maps
    /// `g ∈ T_{γ(t)}` to the tangent space at `x`.
    pub fn adj_jacobi(&self, x: &FcmCoords, y: &FcmCoords, t: f64, g: &FcmCoords) -> FcmCoords {
        FcmCoords {
            rotations: (0..g.edge_count())
                .map(|e| {
                    self.so3
                        .adj_jacobi(&x.rotations[e], &y.rotations[e], t, &g.rotations[e])
                })
                .collect(),
            stretches: (0..g.face_count())
                .map(|f| {
                    self.spd
                        .adj_jacobi(&x.stretches[f], &y.stretches[f], t, &g.stretches[f])
                })
                .collect(),
        }
    }

    /// Adjoint of the derivative of `γ(t; x, y)` with respect to `x`.
    pub fn adj_dxgeo(&self, x: &FcmCoords, y: &FcmCoords, t: f64, g: &FcmCoords) -> FcmCoords {
        self.adj_jacobi(x, y, t, g)
    }

    /// Adjoint of the derivative of `γ(t; x, y)` with respect to `y`.
    pub fn adj_dygeo(&self, x: &FcmCoords, y: &FcmCoords, t: f64, g: &FcmCoords) -> FcmCoords {
        self.adj_jacobi(y, x, 1.0 - t, g)
    }
}
