//! The rotation group SO(3) with its bi-invariant metric.
//!
//! Tangent vectors are left-trivialized: a tangent vector at `R` is stored
//! as the skew-symmetric `X` with `R·X` the actual velocity. The metric is
//! the Frobenius pairing `tr(XᵀY)` of those skew matrices.

use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector3};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::numerics::{hat, skew, so3_exp, so3_log, vee, SMALL_ANGLE};
use crate::traits::{FactorManifold, JacobiBasis};

/// The special orthogonal group SO(3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationGroup;

impl RotationGroup {
    pub fn new() -> Self {
        Self
    }

    /// The Jacobi operator `¼(−vvr + 2vrv − rvv)` along a geodesic with
    /// velocity `v`, applied to `r`.
    ///
    /// Equals `−¼[v, [v, r]]`; zero curvature directions are those
    /// commuting with `v`.
    pub fn jacop(v: &Matrix3<f64>, r: &Matrix3<f64>) -> Matrix3<f64> {
        (-(v * v * r) + v * r * v * 2.0 - r * v * v) * 0.25
    }
}

impl FactorManifold for RotationGroup {
    type Point = Matrix3<f64>;
    type Tangent = Matrix3<f64>;

    fn name(&self) -> &'static str {
        "SO(3)"
    }

    fn dim(&self) -> usize {
        3
    }

    fn identity(&self) -> Matrix3<f64> {
        Matrix3::identity()
    }

    fn zerovec(&self) -> Matrix3<f64> {
        Matrix3::zeros()
    }

    fn inner(&self, _x: &Matrix3<f64>, g: &Matrix3<f64>, h: &Matrix3<f64>) -> f64 {
        g.dot(h)
    }

    fn exp(&self, x: &Matrix3<f64>, g: &Matrix3<f64>) -> Matrix3<f64> {
        x * so3_exp(&vee(g))
    }

    fn log(&self, x: &Matrix3<f64>, y: &Matrix3<f64>) -> Matrix3<f64> {
        hat(&so3_log(&(x.transpose() * y)))
    }

    fn proj(&self, x: &Matrix3<f64>, a: &Matrix3<f64>) -> Matrix3<f64> {
        skew(&(x.transpose() * a))
    }

    fn egrad2rgrad(&self, x: &Matrix3<f64>, d: &Matrix3<f64>) -> Matrix3<f64> {
        self.proj(x, d)
    }

    fn transp(&self, x: &Matrix3<f64>, y: &Matrix3<f64>, g: &Matrix3<f64>) -> Matrix3<f64> {
        let half = so3_exp(&(so3_log(&(x.transpose() * y)) * 0.5));
        half.transpose() * g * half
    }

    fn rand<R: Rng + ?Sized>(&self, rng: &mut R) -> Matrix3<f64> {
        // Normalized Gaussian quaternions are Haar-distributed
        loop {
            let q = Quaternion::new(
                rng.sample::<f64, _>(StandardNormal),
                rng.sample::<f64, _>(StandardNormal),
                rng.sample::<f64, _>(StandardNormal),
                rng.sample::<f64, _>(StandardNormal),
            );
            if q.norm() > SMALL_ANGLE {
                return UnitQuaternion::from_quaternion(q)
                    .to_rotation_matrix()
                    .into_inner();
            }
        }
    }

    fn randvec<R: Rng + ?Sized>(&self, x: &Matrix3<f64>, rng: &mut R) -> Matrix3<f64> {
        let a = Vector3::from_fn(|_, _| rng.sample::<f64, _>(StandardNormal));
        let g = hat(&a);
        let n = self.norm(x, &g);
        if n > SMALL_ANGLE {
            g / n
        } else {
            self.randvec(x, rng)
        }
    }

    fn jac_onb(&self, x: &Matrix3<f64>, y: &Matrix3<f64>) -> JacobiBasis<Matrix3<f64>> {
        let omega = so3_log(&(x.transpose() * y));
        let theta = omega.norm();

        // Axis of the geodesic, or any axis for a constant geodesic
        let axis = if theta > SMALL_ANGLE {
            omega / theta
        } else {
            Vector3::x()
        };
        let helper = if axis.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let u = axis.cross(&helper).normalize();
        let w = axis.cross(&u);

        let kappa = theta * theta / 4.0;
        let scale = std::f64::consts::FRAC_1_SQRT_2;
        JacobiBasis {
            eigenvalues: vec![0.0, kappa, kappa],
            basis: vec![hat(&axis) * scale, hat(&u) * scale, hat(&w) * scale],
        }
    }
}
