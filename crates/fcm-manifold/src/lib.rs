//! # fcm-manifold
//!
//! Factor manifolds of the fundamental-coordinates shape space.
//!
//! - [`RotationGroup`]: SO(3), one factor per inner edge (transition
//!   rotations).
//! - [`SpdCone`]: SPD(2), one factor per face (in-plane stretch).
//!
//! Both implement [`FactorManifold`], which supplies geodesics and
//! adjoint Jacobi fields on top of each factor's closed-form primitives.

pub mod numerics;
pub mod so3;
pub mod spd;
pub mod traits;

pub use so3::RotationGroup;
pub use spd::SpdCone;
pub use traits::{FactorManifold, JacobiBasis};
