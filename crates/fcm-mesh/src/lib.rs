//! # fcm-mesh
//!
//! Triangle surface representation and the discrete operators the
//! fundamental-coordinates encoder and decoder consume.
//!
//! ## Key Types
//!
//! - [`Surface`]: vertex positions and triangle indices.
//! - [`FaceAdjacency`]: inner edges with unique ids and the sparse
//!   face-to-face matrix carrying them.
//! - [`DiscreteOperators`]: piecewise-linear gradient and divergence,
//!   face and edge areas.
//! - Procedural generators for tests and demos (platonic solids, grids).

pub mod generators;
pub mod mesh;
pub mod operators;
pub mod topology;

pub use mesh::Surface;
pub use operators::DiscreteOperators;
pub use topology::{FaceAdjacency, InnerEdge};
