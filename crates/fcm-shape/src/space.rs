//! The fundamental-coordinates shape space.
//!
//! A Riemannian product of one SO(3) factor per inner edge and one SPD(2)
//! factor per face under the diagonal area-weighted [`Metric`]. Every
//! operation splits its arguments into blocks, delegates each block to
//! its factor manifold, and reassembles.

use std::fmt;

use fcm_manifold::{FactorManifold, RotationGroup, SpdCone};
use fcm_mesh::Surface;
use fcm_types::constants::GEODESIC_PROJECTION_TOL;
use fcm_types::FcmResult;
use nalgebra::Vector3;
use rand::Rng;
use tracing::warn;

use crate::config::FcmConfig;
use crate::coords::FcmCoords;
use crate::decoder::decode;
use crate::encoder::encode;
use crate::metric::Metric;
use crate::reference::ReferenceGeometry;

/// Geodesics shorter than this have no usable direction.
const DEGENERATE_GEODESIC: f64 = 1e-12;

/// Shape space of deformations of a reference surface, in fundamental
/// coordinates.
#[derive(Debug)]
pub struct FundamentalCoords {
    reference: ReferenceGeometry,
    pub(crate) so3: RotationGroup,
    pub(crate) spd: SpdCone,
}

impl FundamentalCoords {
    /// Shape space around `reference`.
    pub fn new(reference: Surface, config: FcmConfig) -> FcmResult<Self> {
        Ok(Self::from_reference(ReferenceGeometry::new(reference, config)?))
    }

    /// Shape space around an already built reference geometry.
    pub fn from_reference(reference: ReferenceGeometry) -> Self {
        Self {
            reference,
            so3: RotationGroup::new(),
            spd: SpdCone::new(),
        }
    }

    #[inline]
    pub fn reference(&self) -> &ReferenceGeometry {
        &self.reference
    }

    #[inline]
    pub fn metric(&self) -> &Metric {
        self.reference.metric()
    }

    /// Replace the reference vertex positions.
    pub fn update_ref_geom(&mut self, vertices: Vec<Vector3<f64>>) -> FcmResult<()> {
        self.reference.update(vertices)
    }

    /// Encode vertex positions.
    pub fn to_coords(&self, vertices: &[Vector3<f64>]) -> FcmResult<FcmCoords> {
        encode(&self.reference, vertices)
    }

    /// Decode to vertex positions.
    pub fn from_coords(&self, coords: &FcmCoords) -> FcmResult<Vec<Vector3<f64>>> {
        decode(&self.reference, coords)
    }

    /// Intrinsic dimension, `3E + 3F`.
    pub fn dim(&self) -> usize {
        self.so3.dim() * self.reference.edge_count() + self.spd.dim() * self.reference.face_count()
    }

    /// Typical distance scale, `√dim`.
    pub fn typicaldist(&self) -> f64 {
        (self.dim() as f64).sqrt()
    }

    /// Identity rotations and stretches.
    pub fn identity(&self) -> FcmCoords {
        FcmCoords::identity(self.reference.edge_count(), self.reference.face_count())
    }

    /// The zero tangent vector.
    pub fn zerovec(&self) -> FcmCoords {
        FcmCoords::zeros(self.reference.edge_count(), self.reference.face_count())
    }

    /// Weighted inner product `Gᵀ · metric · H`.
    pub fn inner(&self, x: &FcmCoords, g: &FcmCoords, h: &FcmCoords) -> f64 {
        let metric = self.reference.metric();
        let r: f64 = metric
            .edge_weights()
            .iter()
            .enumerate()
            .map(|(e, w)| w * self.so3.inner(&x.rotations[e], &g.rotations[e], &h.rotations[e]))
            .sum();
        let s: f64 = metric
            .face_weights()
            .iter()
            .enumerate()
            .map(|(f, w)| w * self.spd.inner(&x.stretches[f], &g.stretches[f], &h.stretches[f]))
            .sum();
        r + s
    }

    pub fn norm(&self, x: &FcmCoords, g: &FcmCoords) -> f64 {
        self.inner(x, g, g).max(0.0).sqrt()
    }

    /// Geodesic distance, `‖log(x, y)‖ₓ`.
    pub fn dist(&self, x: &FcmCoords, y: &FcmCoords) -> f64 {
        self.norm(x, &self.log(x, y))
    }

    /// Project an ambient perturbation onto the tangent space at `x`.
    pub fn proj(&self, x: &FcmCoords, a: &FcmCoords) -> FcmCoords {
        x.zip_with(a, |p, v| self.so3.proj(p, v), |p, v| self.spd.proj(p, v))
    }

    /// Riemannian gradient from a Euclidean one: per-factor conversion,
    /// then division by the metric weights.
    pub fn egrad2rgrad(&self, x: &FcmCoords, d: &FcmCoords) -> FcmCoords {
        let metric = self.reference.metric();
        let mut grad = x.zip_with(
            d,
            |p, v| self.so3.egrad2rgrad(p, v),
            |p, v| self.spd.egrad2rgrad(p, v),
        );
        for (block, w) in grad.rotations.iter_mut().zip(metric.edge_weights()) {
            *block /= *w;
        }
        for (block, w) in grad.stretches.iter_mut().zip(metric.face_weights()) {
            *block /= *w;
        }
        grad
    }

    /// Exponential map.
    pub fn exp(&self, x: &FcmCoords, g: &FcmCoords) -> FcmCoords {
        x.zip_with(g, |p, v| self.so3.exp(p, v), |p, v| self.spd.exp(p, v))
    }

    /// Retraction; the exponential map is exact.
    pub fn retr(&self, x: &FcmCoords, g: &FcmCoords) -> FcmCoords {
        self.exp(x, g)
    }

    /// Logarithmic map.
    pub fn log(&self, x: &FcmCoords, y: &FcmCoords) -> FcmCoords {
        x.zip_with(y, |p, q| self.so3.log(p, q), |p, q| self.spd.log(p, q))
    }

    /// Point at parameter `t` on the geodesic from `x` to `y`.
    pub fn geopoint(&self, x: &FcmCoords, y: &FcmCoords, t: f64) -> FcmCoords {
        self.exp(x, &(self.log(x, y) * t))
    }

    /// Parallel transport of `g` from `x` to `y`.
    pub fn transp(&self, x: &FcmCoords, y: &FcmCoords, g: &FcmCoords) -> FcmCoords {
        FcmCoords {
            rotations: (0..g.edge_count())
                .map(|e| self.so3.transp(&x.rotations[e], &y.rotations[e], &g.rotations[e]))
                .collect(),
            stretches: (0..g.face_count())
                .map(|f| self.spd.transp(&x.stretches[f], &y.stretches[f], &g.stretches[f]))
                .collect(),
        }
    }

    /// Closest point to `p` on the geodesic from `x` to `y`.
    ///
    /// Fixed-point iteration moving along the unit direction of the
    /// geodesic by the component of `log(current, p)` along it, until
    /// that component drops below the projection tolerance or `max_iter`
    /// steps have been taken.
    pub fn proj_to_geodesic(
        &self,
        x: &FcmCoords,
        y: &FcmCoords,
        p: &FcmCoords,
        max_iter: usize,
    ) -> FcmCoords {
        let v = self.log(x, y);
        let length = self.norm(x, &v);
        if length < DEGENERATE_GEODESIC {
            return x.clone();
        }
        let v = v * (1.0 / length);

        let mut current = x.clone();
        for _ in 0..max_iter {
            let w = self.log(&current, p);
            let d = self.inner(&current, &v, &w);
            if d.abs() < GEODESIC_PROJECTION_TOL {
                return current;
            }
            current = self.exp(&current, &(&v * d));
        }

        warn!(max_iter, "Geodesic projection did not converge");
        current
    }

    /// Random point, sampling every factor independently.
    pub fn rand<R: Rng + ?Sized>(&self, rng: &mut R) -> FcmCoords {
        FcmCoords {
            rotations: (0..self.reference.edge_count())
                .map(|_| self.so3.rand(rng))
                .collect(),
            stretches: (0..self.reference.face_count())
                .map(|_| self.spd.rand(rng))
                .collect(),
        }
    }

    /// Random unit tangent vector at `x`.
    pub fn randvec<R: Rng + ?Sized>(&self, x: &FcmCoords, rng: &mut R) -> FcmCoords {
        let g = FcmCoords {
            rotations: x.rotations.iter().map(|p| self.so3.randvec(p, rng)).collect(),
            stretches: x.stretches.iter().map(|p| self.spd.randvec(p, rng)).collect(),
        };
        let n = self.norm(x, &g);
        if n > 0.0 {
            g * (1.0 / n)
        } else {
            g
        }
    }
}

impl fmt::Display for FundamentalCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fundamental Coordinates Shape Space")
    }
}
