//! # fcm-math
//!
//! Linear algebra primitives for the fundamental-coordinates shape space.
//!
//! Provides:
//! - SVD-based polar extraction with the reflection sign correction
//! - Sparse SPD solver interface with a faer supernodal backend and a
//!   nalgebra-sparse simplicial fallback, selected once per build

pub mod decomposition;
#[cfg(feature = "faer")]
pub mod faer_solver;
pub mod simplicial;
pub mod sparse;

pub use sparse::{SolverBackend, SparseSolver};
