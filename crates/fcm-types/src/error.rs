//! Error types for the shape space.
//!
//! All crates return `FcmResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the fundamental-coordinates crates.
#[derive(Debug, Error)]
pub enum FcmError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// The face-adjacency graph has more than one component.
    #[error("Disconnected mesh: spanning tree reached {reached} of {total} faces")]
    DisconnectedMesh { reached: usize, total: usize },

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sparse factorization of the Poisson system failed.
    #[error("Factorization failed: {0}")]
    Factorization(String),

    /// Solving against an existing factorization failed.
    #[error("Linear solve failed: {0}")]
    Solve(String),

    /// A coordinate vector does not match the reference topology.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, FcmError>`.
pub type FcmResult<T> = Result<T, FcmError>;
