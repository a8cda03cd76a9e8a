//! # fcm-shape
//!
//! Fundamental coordinates of triangle surfaces: per-inner-edge transition
//! rotations and per-face stretch tensors relative to a reference surface.
//!
//! ## Key Types
//!
//! - [`FundamentalCoords`]: the shape space: encode, decode and the
//!   Riemannian operations of the product manifold
//! - [`ReferenceGeometry`]: frames, spanning tree, metric and the
//!   factorized Poisson system of the reference surface
//! - [`FcmCoords`]: a point or tangent vector in block form
//! - [`FcmConfig`]: anchoring, decoder iterations, metric weights

pub mod config;
pub mod coords;
pub mod decoder;
pub mod encoder;
pub mod frame;
pub mod jacobi;
pub mod metric;
pub mod reference;
pub mod space;
pub mod spanning_tree;

pub use config::FcmConfig;
pub use coords::{FcmCoords, FlatCoords};
pub use decoder::decode;
pub use encoder::encode;
pub use frame::{frame_of_face, FrameField};
pub use metric::Metric;
pub use reference::ReferenceGeometry;
pub use space::FundamentalCoords;
pub use spanning_tree::{SpanningTree, TreeStep};
