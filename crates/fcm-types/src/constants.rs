//! Numeric defaults shared across the shape space.

/// Default root face of the spanning tree.
pub const DEFAULT_INIT_FACE: usize = 0;

/// Default vertex pinned to its reference position after decoding.
pub const DEFAULT_INIT_VERT: usize = 0;

/// Default local/global integration tolerance.
pub const DEFAULT_INTEGRATION_TOL: f64 = 1.0e-5;

/// Default number of local/global iterations.
pub const DEFAULT_INTEGRATION_ITER: u32 = 2;

/// Stopping threshold of the geodesic projection fixed-point loop.
pub const GEODESIC_PROJECTION_TOL: f64 = 1.0e-6;

/// Default iteration cap of the geodesic projection.
pub const DEFAULT_PROJECTION_MAX_ITER: usize = 10;

/// Epsilon for degenerate triangle detection (area threshold).
pub const DEGENERATE_AREA_THRESHOLD: f64 = 1.0e-12;
