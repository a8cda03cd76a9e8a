//! Core factor-manifold trait.

use std::ops::{Add, Mul, Sub};

use rand::Rng;

use crate::numerics::jacobi_weight;

/// Eigen-decomposition of the Jacobi operator along a geodesic.
///
/// `basis` is orthonormal with respect to [`FactorManifold::inner`] at the
/// geodesic's start point; `eigenvalues[i]` belongs to `basis[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct JacobiBasis<T> {
    pub eigenvalues: Vec<f64>,
    pub basis: Vec<T>,
}

/// A Riemannian manifold whose points and tangent vectors are small
/// fixed-size matrices.
///
/// Implementations provide the closed-form primitives; geodesic
/// evaluation and adjoint Jacobi fields are derived from them.
pub trait FactorManifold {
    /// A point on the manifold.
    type Point: Copy;
    /// A tangent vector, in the implementation's chosen representation.
    type Tangent: Copy
        + Add<Output = Self::Tangent>
        + Sub<Output = Self::Tangent>
        + Mul<f64, Output = Self::Tangent>;

    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Intrinsic dimension.
    fn dim(&self) -> usize;

    /// The distinguished base point (identity).
    fn identity(&self) -> Self::Point;

    /// The zero tangent vector.
    fn zerovec(&self) -> Self::Tangent;

    /// Riemannian inner product of tangent vectors at `x`.
    fn inner(&self, x: &Self::Point, g: &Self::Tangent, h: &Self::Tangent) -> f64;

    /// Riemannian norm of `g` at `x`.
    fn norm(&self, x: &Self::Point, g: &Self::Tangent) -> f64 {
        self.inner(x, g, g).max(0.0).sqrt()
    }

    /// Exponential map.
    fn exp(&self, x: &Self::Point, g: &Self::Tangent) -> Self::Point;

    /// Logarithmic map, the inverse of [`exp`](Self::exp) within the
    /// injectivity radius.
    fn log(&self, x: &Self::Point, y: &Self::Point) -> Self::Tangent;

    /// Geodesic distance.
    fn dist(&self, x: &Self::Point, y: &Self::Point) -> f64 {
        self.norm(x, &self.log(x, y))
    }

    /// Point at parameter `t` on the geodesic from `x` (t = 0) to `y` (t = 1).
    fn geopoint(&self, x: &Self::Point, y: &Self::Point, t: f64) -> Self::Point {
        self.exp(x, &(self.log(x, y) * t))
    }

    /// Orthogonal projection of an ambient matrix onto the tangent space at `x`.
    fn proj(&self, x: &Self::Point, a: &Self::Tangent) -> Self::Tangent;

    /// Convert a Euclidean gradient at `x` into a Riemannian gradient.
    fn egrad2rgrad(&self, x: &Self::Point, d: &Self::Tangent) -> Self::Tangent;

    /// Parallel transport of `g` along the geodesic from `x` to `y`.
    fn transp(&self, x: &Self::Point, y: &Self::Point, g: &Self::Tangent) -> Self::Tangent;

    /// Random point.
    fn rand<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Point;

    /// Random unit tangent vector at `x`.
    fn randvec<R: Rng + ?Sized>(&self, x: &Self::Point, rng: &mut R) -> Self::Tangent;

    /// Diagonalize the Jacobi operator `J(w) = R(w, v)v` with
    /// `v = log(x, y)`, at `x`.
    fn jac_onb(&self, x: &Self::Point, y: &Self::Point) -> JacobiBasis<Self::Tangent>;

    /// Evaluate the adjoint Jacobi field along the geodesic `γ` from `x`
    /// to `y`: maps `g ∈ T_{γ(t)}` to the tangent space at `x`.
    ///
    /// `g` is transported back to `x` and expanded in the Jacobi eigenbasis;
    /// each coefficient is damped according to its eigenvalue.
    fn adj_jacobi(
        &self,
        x: &Self::Point,
        y: &Self::Point,
        t: f64,
        g: &Self::Tangent,
    ) -> Self::Tangent {
        let at = self.geopoint(x, y, t);
        let back = self.transp(&at, x, g);
        let JacobiBasis { eigenvalues, basis } = self.jac_onb(x, y);

        eigenvalues
            .iter()
            .zip(&basis)
            .fold(self.zerovec(), |acc, (&kappa, e)| {
                acc + *e * (jacobi_weight(kappa, t) * self.inner(x, &back, e))
            })
    }
}
