//! Tunable simulation parameters.
//!
//! Values are never validated: a friction outside `[0, 1]` or a negative
//! wall force is accepted and simply produces unusual dynamics.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Scalars read by every step and every field sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Velocity damping per step. `0` keeps all momentum, `1` stops every point.
    pub friction: f64,
    /// Strength of the repulsion from the four edges of the unit square.
    pub wall_force: f64,
    /// Strength of the pairwise repulsion between points.
    pub point_force: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            friction: 0.0,
            wall_force: 2.0,
            point_force: 0.1,
        }
    }
}

impl Config {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the config as pretty-printed JSON, in the same shape
    /// [`Config::from_json`] and [`Config::load`] accept.
    ///
    /// ### Returns
    /// The JSON text, or [`ConfigError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
