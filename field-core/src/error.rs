//! Error types for the field simulator.

use std::fmt;

use crate::types::PointId;

/// Errors raised while evaluating forces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// A squared distance used as a divisor was exactly zero.
    ///
    /// `point` is the point whose force was being accumulated, or `None`
    /// when sampling the field at a free location. `other` is the point it
    /// coincides with.
    DegenerateDistance {
        point: Option<PointId>,
        other: PointId,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::DegenerateDistance {
                point: Some(point),
                other,
            } => write!(f, "Point {} coincides with point {}", point, other),
            FieldError::DegenerateDistance { point: None, other } => {
                write!(f, "Sample location coincides with point {}", other)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Errors that can occur while loading a [`crate::config::Config`].
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    Io(std::io::Error),
    /// The file was read but is not a valid config.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
