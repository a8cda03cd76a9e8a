//! Matrix decompositions for per-face gradient blocks.
//!
//! Every rotation extracted here goes through [`proper_rotation`], which
//! flips the last singular direction when the raw polar factor would be
//! a reflection. Singular values are ordered descending, so the flipped
//! direction is always the one with the smallest singular value (the
//! surface normal for a rank-2 gradient block).

use nalgebra::{Matrix3, Vector3};

/// Singular value decomposition of a 3×3 block: `m = u · diag(s) · v_t`.
#[derive(Debug, Clone, Copy)]
pub struct Svd3 {
    pub u: Matrix3<f64>,
    /// Singular values, sorted descending.
    pub singular_values: Vector3<f64>,
    pub v_t: Matrix3<f64>,
}

/// Result of an in-plane polar decomposition of a transposed
/// deformation gradient `D = S · R`.
///
/// - `rotation` is in SO(3)
/// - `stretch` is symmetric with unit stretch along the block's
///   null (normal) direction
#[derive(Debug, Clone, Copy)]
pub struct PolarDecomposition {
    pub rotation: Matrix3<f64>,
    pub stretch: Matrix3<f64>,
}

/// Compute the SVD of a 3×3 matrix with both singular bases.
pub fn svd3(m: &Matrix3<f64>) -> Svd3 {
    let svd = m.svd(true, true);
    match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => Svd3 {
            u,
            singular_values: svd.singular_values,
            v_t,
        },
        // Both bases were requested; nalgebra only omits them on request.
        _ => Svd3 {
            u: Matrix3::identity(),
            singular_values: svd.singular_values,
            v_t: Matrix3::identity(),
        },
    }
}

/// Sign-corrected polar rotation from an SVD:
/// `R = U · diag(1, 1, det(U·Vᵀ)) · Vᵀ`.
pub fn rotation_from_svd(svd: &Svd3) -> Matrix3<f64> {
    let det = (svd.u * svd.v_t).determinant();
    let w = Vector3::new(1.0, 1.0, det);
    svd.u * Matrix3::from_diagonal(&w) * svd.v_t
}

/// Closest proper rotation (in Frobenius norm) to `m`.
///
/// The result is in SO(3) even when `m` has negative determinant or is
/// rank deficient.
pub fn proper_rotation(m: &Matrix3<f64>) -> Matrix3<f64> {
    rotation_from_svd(&svd3(m))
}

/// Polar split of a per-face gradient block with the normal stretch
/// pinned to 1.
///
/// Given `D = U·S·Vᵀ`, returns the sign-corrected rotation and the
/// ambient stretch `U · diag(s₀, s₁, 1) · Uᵀ`. The block stores the
/// transposed deformation gradient, so this is the left polar factor of
/// `D` and the right stretch tensor of the deformation.
pub fn polar_decomposition_in_plane(d: &Matrix3<f64>) -> PolarDecomposition {
    let svd = svd3(d);
    let rotation = rotation_from_svd(&svd);

    let mut s = svd.singular_values;
    s[2] = 1.0; // no stretch in normal direction
    let stretch = svd.u * Matrix3::from_diagonal(&s) * svd.u.transpose();

    PolarDecomposition { rotation, stretch }
}
