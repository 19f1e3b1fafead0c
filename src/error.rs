//! Error types for tether.
//!
//! Per-step simulation never fails: degenerate geometry is resolved locally.
//! Only configuration is fallible, and it is rejected before a rope exists.

use std::fmt;

/// A configuration value that cannot drive a rope simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A rope needs at least an anchor and a grapple particle.
    TooFewSegments(usize),
    /// Segment length must be finite and strictly positive.
    InvalidSegmentLength(f32),
    /// Aim range must be finite and strictly positive.
    InvalidMaxDistance(f32),
    /// The fixed simulation step must be finite and strictly positive.
    InvalidTimestep(f32),
    /// Ribbon width must be finite and non-negative.
    InvalidRopeWidth(f32),
    /// A force scale was negative or not finite.
    InvalidForce {
        /// Which setting was rejected.
        name: &'static str,
        /// The offending value.
        value: f32,
    },
    /// Look limits must be finite, with the pitch limit inside `[0, 90]`.
    InvalidLookAngle(f32),
    /// Ground check distance must be finite and non-negative.
    InvalidGroundCheckDistance(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TooFewSegments(n) => {
                write!(f, "Rope needs at least 2 segments, got {}", n)
            }
            ConfigError::InvalidSegmentLength(l) => {
                write!(f, "Segment length must be positive and finite, got {}", l)
            }
            ConfigError::InvalidMaxDistance(d) => {
                write!(f, "Max grapple distance must be positive and finite, got {}", d)
            }
            ConfigError::InvalidTimestep(dt) => {
                write!(f, "Fixed timestep must be positive and finite, got {}", dt)
            }
            ConfigError::InvalidRopeWidth(w) => {
                write!(f, "Rope width must be non-negative and finite, got {}", w)
            }
            ConfigError::InvalidForce { name, value } => {
                write!(f, "`{}` must be non-negative and finite, got {}", name, value)
            }
            ConfigError::InvalidLookAngle(a) => {
                write!(f, "Max look angle must be within [0, 90] degrees, got {}", a)
            }
            ConfigError::InvalidGroundCheckDistance(d) => {
                write!(f, "Ground check distance must be non-negative and finite, got {}", d)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur while reading or writing a configuration file.
#[derive(Debug)]
pub enum ConfigLoadError {
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// The file is not valid configuration JSON.
    Parse(serde_json::Error),
    /// The file parsed but describes an unusable rope.
    Invalid(ConfigError),
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLoadError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigLoadError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigLoadError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigLoadError::Io(e) => Some(e),
            ConfigLoadError::Parse(e) => Some(e),
            ConfigLoadError::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigLoadError {
    fn from(e: std::io::Error) -> Self {
        ConfigLoadError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigLoadError {
    fn from(e: serde_json::Error) -> Self {
        ConfigLoadError::Parse(e)
    }
}

impl From<ConfigError> for ConfigLoadError {
    fn from(e: ConfigError) -> Self {
        ConfigLoadError::Invalid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_mentions_value() {
        let msg = ConfigError::TooFewSegments(1).to_string();
        assert!(msg.contains('1'));

        let msg = ConfigError::InvalidForce {
            name: "swing_force",
            value: -2.0,
        }
        .to_string();
        assert!(msg.contains("swing_force"));
    }

    #[test]
    fn test_load_error_source() {
        let err: ConfigLoadError = ConfigError::InvalidSegmentLength(0.0).into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Invalid config"));
    }
}
