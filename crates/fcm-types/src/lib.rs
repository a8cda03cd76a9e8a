//! # fcm-types
//!
//! Shared identifiers, error types, and numeric defaults for the
//! fundamental-coordinates shape space.
//!
//! This crate has zero domain logic: it defines the vocabulary
//! that all other `fcm-*` crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{FcmError, FcmResult};
pub use ids::{EdgeId, FaceId, VertexId};
