//! Shape-space configuration.
//!
//! Parameters that control how the reference geometry is anchored, how
//! many local/global iterations the decoder runs, and how rotation and
//! stretch are weighed against each other in the metric.

use std::path::Path;
use std::str::FromStr;

use fcm_types::constants::{
    DEFAULT_INIT_FACE, DEFAULT_INIT_VERT, DEFAULT_INTEGRATION_ITER, DEFAULT_INTEGRATION_TOL,
};
use fcm_types::{FcmError, FcmResult};
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`FcmConfig::init_face`].
pub const ENV_INIT_FACE: &str = "FCM_INIT_FACE";
/// Environment variable overriding [`FcmConfig::init_vert`].
pub const ENV_INIT_VERT: &str = "FCM_INIT_VERT";
/// Environment variable overriding [`FcmConfig::integration_tol`].
pub const ENV_INTEGRATION_TOL: &str = "FCM_INTEGRATION_TOL";
/// Environment variable overriding [`FcmConfig::integration_iter`].
pub const ENV_INTEGRATION_ITER: &str = "FCM_INTEGRATION_ITER";
/// Environment variable overriding [`FcmConfig::rotation_weight`].
pub const ENV_WEIGHT_ROTATION: &str = "FCM_WEIGHT_ROTATION";
/// Environment variable overriding [`FcmConfig::stretch_weight`].
pub const ENV_WEIGHT_STRETCH: &str = "FCM_WEIGHT_STRETCH";

/// Configuration of a fundamental-coordinates shape space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FcmConfig {
    /// Root face of the spanning tree; its frame anchors the decoded
    /// orientation.
    pub init_face: usize,

    /// Vertex pinned to its reference position after decoding.
    pub init_vert: usize,

    /// Local/global integration tolerance.
    /// Carried for completeness; the decoder runs a fixed iteration count.
    pub integration_tol: f64,

    /// Number of local/global iterations (global steps) of the decoder.
    pub integration_iter: u32,

    /// Metric weight of the rotation (transition) part.
    pub rotation_weight: f64,

    /// Metric weight of the stretch part.
    pub stretch_weight: f64,
}

impl Default for FcmConfig {
    fn default() -> Self {
        Self {
            init_face: DEFAULT_INIT_FACE,
            init_vert: DEFAULT_INIT_VERT,
            integration_tol: DEFAULT_INTEGRATION_TOL,
            integration_iter: DEFAULT_INTEGRATION_ITER,
            rotation_weight: 1.0,
            stretch_weight: 1.0,
        }
    }
}

impl FcmConfig {
    /// Default configuration with custom metric weights.
    pub fn with_metric_weights(rotation_weight: f64, stretch_weight: f64) -> Self {
        Self {
            rotation_weight,
            stretch_weight,
            ..Default::default()
        }
    }

    /// Creates a high-quality config (more decoder iterations, tighter tolerance).
    pub fn high_quality() -> Self {
        Self {
            integration_iter: 10,
            integration_tol: 1e-8,
            ..Default::default()
        }
    }

    /// Defaults overridden by the `FCM_*` environment variables.
    pub fn from_env() -> FcmResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `FCM_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> FcmResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            init_face: parse_or(&lookup, ENV_INIT_FACE, defaults.init_face)?,
            init_vert: parse_or(&lookup, ENV_INIT_VERT, defaults.init_vert)?,
            integration_tol: parse_or(&lookup, ENV_INTEGRATION_TOL, defaults.integration_tol)?,
            integration_iter: parse_or(&lookup, ENV_INTEGRATION_ITER, defaults.integration_iter)?,
            rotation_weight: parse_or(&lookup, ENV_WEIGHT_ROTATION, defaults.rotation_weight)?,
            stretch_weight: parse_or(&lookup, ENV_WEIGHT_STRETCH, defaults.stretch_weight)?,
        })
    }

    /// Parses a TOML config; missing fields take their defaults.
    pub fn from_toml(text: &str) -> FcmResult<Self> {
        toml::from_str(text).map_err(|e| FcmError::Serialization(format!("config TOML: {e}")))
    }

    /// Reads a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> FcmResult<Self> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Checks the settings that do not depend on a mesh: iteration count,
    /// tolerance and metric weights.
    pub fn validate_settings(&self) -> FcmResult<()> {
        if self.integration_iter == 0 {
            return Err(FcmError::InvalidConfig(
                "integration_iter must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("integration_tol", self.integration_tol),
            ("rotation_weight", self.rotation_weight),
            ("stretch_weight", self.stretch_weight),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FcmError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Checks the configuration against a mesh with the given counts.
    pub fn validate(&self, vertex_count: usize, face_count: usize) -> FcmResult<()> {
        self.validate_settings()?;
        if self.init_face >= face_count {
            return Err(FcmError::InvalidConfig(format!(
                "init_face {} is out of range (face count: {face_count})",
                self.init_face
            )));
        }
        if self.init_vert >= vertex_count {
            return Err(FcmError::InvalidConfig(format!(
                "init_vert {} is out of range (vertex count: {vertex_count})",
                self.init_vert
            )));
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> FcmResult<T> {
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            FcmError::InvalidConfig(format!("{key}={raw:?} could not be parsed"))
        }),
        None => Ok(default),
    }
}
