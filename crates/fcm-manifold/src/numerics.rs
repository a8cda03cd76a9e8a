//! Small-matrix utilities shared by the factor manifolds.

use nalgebra::{Matrix2, Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector2, Vector3};

/// Below this norm a rotation vector is treated as the identity.
pub const SMALL_ANGLE: f64 = 1e-12;

/// Two eigenvalues closer than this share a divided difference.
pub const EIGEN_GAP: f64 = 1e-10;

/// Skew-symmetric matrix of `a`, so that `hat(a) * b == a × b`.
#[inline]
pub fn hat(a: &Vector3<f64>) -> Matrix3<f64> {
    a.cross_matrix()
}

/// Inverse of [`hat`] on the skew-symmetric part of `m`.
#[inline]
pub fn vee(m: &Matrix3<f64>) -> Vector3<f64> {
    Vector3::new(
        0.5 * (m[(2, 1)] - m[(1, 2)]),
        0.5 * (m[(0, 2)] - m[(2, 0)]),
        0.5 * (m[(1, 0)] - m[(0, 1)]),
    )
}

/// Skew-symmetric part `(m − mᵀ)/2`.
#[inline]
pub fn skew(m: &Matrix3<f64>) -> Matrix3<f64> {
    (m - m.transpose()) * 0.5
}

/// Symmetric part `(m + mᵀ)/2`.
#[inline]
pub fn sym(m: &Matrix2<f64>) -> Matrix2<f64> {
    (m + m.transpose()) * 0.5
}

/// Matrix exponential of the skew matrix `hat(omega)` (Rodrigues).
#[inline]
pub fn so3_exp(omega: &Vector3<f64>) -> Matrix3<f64> {
    Rotation3::from_scaled_axis(*omega).into_inner()
}

/// Principal logarithm of a rotation as a rotation vector.
///
/// Goes through the unit quaternion so the axis stays well defined for
/// angles close to π; the result has norm in `[0, π]`.
pub fn so3_log(r: &Matrix3<f64>) -> Vector3<f64> {
    let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*r));
    let q: &Quaternion<f64> = q.as_ref();
    // q and −q are the same rotation, pick w ≥ 0
    let (w, v) = if q.w < 0.0 {
        (-q.w, -q.imag())
    } else {
        (q.w, q.imag())
    };
    let s = v.norm();
    if s < SMALL_ANGLE {
        // 2·atan2(s, w)/s → 2/w
        return v * (2.0 / w);
    }
    v * (2.0 * s.atan2(w) / s)
}

/// Spectral decomposition `(eigenvalues, eigenvectors)` of a symmetric
/// 2×2 matrix.
#[inline]
pub fn sym2_eigen(m: &Matrix2<f64>) -> (Vector2<f64>, Matrix2<f64>) {
    let eig = sym(m).symmetric_eigen();
    (eig.eigenvalues, eig.eigenvectors)
}

/// Apply a scalar function to the spectrum of a symmetric 2×2 matrix.
pub fn sym2_map(m: &Matrix2<f64>, f: impl Fn(f64) -> f64) -> Matrix2<f64> {
    let (lambda, q) = sym2_eigen(m);
    q * Matrix2::from_diagonal(&lambda.map(f)) * q.transpose()
}

/// Matrix exponential of a symmetric 2×2 matrix.
#[inline]
pub fn sym2_exp(m: &Matrix2<f64>) -> Matrix2<f64> {
    sym2_map(m, f64::exp)
}

/// Principal logarithm of an SPD 2×2 matrix.
#[inline]
pub fn sym2_log(m: &Matrix2<f64>) -> Matrix2<f64> {
    sym2_map(m, f64::ln)
}

/// Differential of the matrix exponential at the symmetric matrix `l`
/// applied to the symmetric direction `h` (Daleckii–Krein formula).
pub fn sym2_dexp(l: &Matrix2<f64>, h: &Matrix2<f64>) -> Matrix2<f64> {
    let (lambda, q) = sym2_eigen(l);
    let mut hq = q.transpose() * sym(h) * q;
    for i in 0..2 {
        for j in 0..2 {
            let (a, b) = (lambda[i], lambda[j]);
            let divided = if (a - b).abs() < EIGEN_GAP {
                a.exp()
            } else {
                (a.exp() - b.exp()) / (a - b)
            };
            hq[(i, j)] *= divided;
        }
    }
    q * hq * q.transpose()
}

/// Weight of an adjoint Jacobi field component with Jacobi eigenvalue
/// `kappa` at parameter `t`.
///
/// Solves `J'' + κJ = 0` with `J(0) = 1`, `J(1) = 0`.
pub fn jacobi_weight(kappa: f64, t: f64) -> f64 {
    if kappa > SMALL_ANGLE {
        let s = kappa.sqrt();
        ((1.0 - t) * s).sin() / s.sin()
    } else if kappa < -SMALL_ANGLE {
        let s = (-kappa).sqrt();
        ((1.0 - t) * s).sinh() / s.sinh()
    } else {
        1.0 - t
    }
}
