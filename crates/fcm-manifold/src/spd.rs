//! The cone of 2×2 symmetric positive-definite matrices under the
//! log-Euclidean metric.
//!
//! The matrix logarithm is a global isometry onto the flat space of
//! symmetric matrices, so geodesics are straight lines in the log domain
//! and the curvature vanishes. Tangent vectors are symmetric matrices in
//! that log domain.

use nalgebra::Matrix2;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::numerics::{sym, sym2_dexp, sym2_exp, sym2_log, SMALL_ANGLE};
use crate::traits::{FactorManifold, JacobiBasis};

/// SPD(2), the stretch tensors of a triangle in its own tangent frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpdCone;

impl SpdCone {
    pub fn new() -> Self {
        Self
    }
}

impl FactorManifold for SpdCone {
    type Point = Matrix2<f64>;
    type Tangent = Matrix2<f64>;

    fn name(&self) -> &'static str {
        "SPD(2)"
    }

    fn dim(&self) -> usize {
        3
    }

    fn identity(&self) -> Matrix2<f64> {
        Matrix2::identity()
    }

    fn zerovec(&self) -> Matrix2<f64> {
        Matrix2::zeros()
    }

    fn inner(&self, _x: &Matrix2<f64>, g: &Matrix2<f64>, h: &Matrix2<f64>) -> f64 {
        g.dot(h)
    }

    fn exp(&self, x: &Matrix2<f64>, g: &Matrix2<f64>) -> Matrix2<f64> {
        sym2_exp(&(sym2_log(x) + g))
    }

    fn log(&self, x: &Matrix2<f64>, y: &Matrix2<f64>) -> Matrix2<f64> {
        sym2_log(y) - sym2_log(x)
    }

    fn proj(&self, _x: &Matrix2<f64>, a: &Matrix2<f64>) -> Matrix2<f64> {
        sym(a)
    }

    fn egrad2rgrad(&self, x: &Matrix2<f64>, d: &Matrix2<f64>) -> Matrix2<f64> {
        // Pull the gradient back through S = expm(L)
        sym2_dexp(&sym2_log(x), d)
    }

    fn transp(&self, _x: &Matrix2<f64>, _y: &Matrix2<f64>, g: &Matrix2<f64>) -> Matrix2<f64> {
        *g
    }

    fn rand<R: Rng + ?Sized>(&self, rng: &mut R) -> Matrix2<f64> {
        let a = Matrix2::from_fn(|_, _| rng.sample::<f64, _>(StandardNormal));
        sym2_exp(&sym(&a))
    }

    fn randvec<R: Rng + ?Sized>(&self, x: &Matrix2<f64>, rng: &mut R) -> Matrix2<f64> {
        let g = sym(&Matrix2::from_fn(|_, _| rng.sample::<f64, _>(StandardNormal)));
        let n = self.norm(x, &g);
        if n > SMALL_ANGLE {
            g / n
        } else {
            self.randvec(x, rng)
        }
    }

    fn jac_onb(&self, _x: &Matrix2<f64>, _y: &Matrix2<f64>) -> JacobiBasis<Matrix2<f64>> {
        let off = std::f64::consts::FRAC_1_SQRT_2;
        JacobiBasis {
            eigenvalues: vec![0.0; 3],
            basis: vec![
                Matrix2::new(1.0, 0.0, 0.0, 0.0),
                Matrix2::new(0.0, 0.0, 0.0, 1.0),
                Matrix2::new(0.0, off, off, 0.0),
            ],
        }
    }
}
