//! Configuration types for grappling-hook simulations.
//!
//! Every section can be serialized to JSON; missing fields fall back to the
//! defaults below, so a config file only needs the values it changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigLoadError};
use crate::raycast::CollisionMask;

/// Rope shape and solver quality.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RopeConfig {
    /// Number of particles, anchor and grapple ends included.
    pub segment_count: usize,
    /// Rest distance between adjacent particles.
    pub segment_length: f32,
    /// Relaxation passes per fixed step. Higher is stiffer and slower.
    pub constraint_iterations: u32,
    /// Aim range for acquiring a grapple point.
    pub max_distance: f32,
    /// Layers the aim ray can hit.
    pub grapple_mask: CollisionMask,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            segment_count: 15,
            segment_length: 0.5,
            constraint_iterations: 5,
            max_distance: 20.0,
            grapple_mask: CollisionMask::ALL,
        }
    }
}

impl RopeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_count < 2 {
            return Err(ConfigError::TooFewSegments(self.segment_count));
        }
        if !is_positive(self.segment_length) {
            return Err(ConfigError::InvalidSegmentLength(self.segment_length));
        }
        if !is_positive(self.max_distance) {
            return Err(ConfigError::InvalidMaxDistance(self.max_distance));
        }
        Ok(())
    }

    /// Rest length of the whole chain.
    pub fn max_length(&self) -> f32 {
        self.segment_count as f32 * self.segment_length
    }
}

/// Forces applied to the swinging body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwingConfig {
    /// Steering acceleration per unit of directional intent.
    pub swing_force: f32,
    /// Whether directional intents steer the swing at all.
    pub allow_swing_control: bool,
    /// Pull acceleration per unit of over-extension.
    pub rope_stiffness: f32,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            swing_force: 3.0,
            allow_swing_control: true,
            rope_stiffness: 50.0,
        }
    }
}

impl SwingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_force("swing_force", self.swing_force)?;
        check_force("rope_stiffness", self.rope_stiffness)
    }
}

/// Ground movement of the player body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MoveConfig {
    /// Walking speed in units per second at full intent.
    pub speed: f32,
    /// Upward velocity change applied by a grounded jump.
    pub jump_force: f32,
    /// Extra reach of the downward ground ray below the body.
    pub ground_check_distance: f32,
    /// Layers that count as ground.
    pub ground_mask: CollisionMask,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            jump_force: 5.0,
            ground_check_distance: 0.05,
            ground_mask: CollisionMask::ALL,
        }
    }
}

impl MoveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_force("speed", self.speed)?;
        check_force("jump_force", self.jump_force)?;
        if !self.ground_check_distance.is_finite() || self.ground_check_distance < 0.0 {
            return Err(ConfigError::InvalidGroundCheckDistance(
                self.ground_check_distance,
            ));
        }
        Ok(())
    }

    /// Length of the downward ground ray.
    pub fn ground_ray_length(&self) -> f32 {
        self.ground_check_distance + 0.1
    }
}

/// Ribbon geometry settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StripMeshConfig {
    /// Full width of the ribbon.
    pub rope_width: f32,
}

impl Default for StripMeshConfig {
    fn default() -> Self {
        Self { rope_width: 0.1 }
    }
}

impl StripMeshConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rope_width.is_finite() || self.rope_width < 0.0 {
            return Err(ConfigError::InvalidRopeWidth(self.rope_width));
        }
        Ok(())
    }
}

/// Look controls for the aim rig.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AimConfig {
    /// Degrees of rotation per unit of look intent per second.
    pub sensitivity: f32,
    /// Pitch limit in degrees, symmetric around the horizon.
    pub max_look_angle: f32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            sensitivity: 50.0,
            max_look_angle: 80.0,
        }
    }
}

impl AimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_force("sensitivity", self.sensitivity)?;
        if !(0.0..=90.0).contains(&self.max_look_angle) {
            return Err(ConfigError::InvalidLookAngle(self.max_look_angle));
        }
        Ok(())
    }
}

fn default_name() -> String {
    "Untitled".into()
}

/// Complete grappling-hook configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GrappleConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Seconds per fixed physics step.
    #[serde(default = "default_timestep")]
    pub fixed_timestep: f32,
    /// Constant acceleration applied to rope particles and the body.
    #[serde(default = "default_gravity")]
    pub gravity: Vec3,
    /// Height below which a restart is broadcast.
    #[serde(default = "default_fall_boundary")]
    pub fall_boundary_y: f32,
    #[serde(default)]
    pub rope: RopeConfig,
    #[serde(default)]
    pub swing: SwingConfig,
    #[serde(default)]
    pub mesh: StripMeshConfig,
    #[serde(default)]
    pub aim: AimConfig,
    #[serde(default)]
    pub movement: MoveConfig,
}

fn default_timestep() -> f32 {
    0.02
}

fn default_gravity() -> Vec3 {
    Vec3::new(0.0, -9.8, 0.0)
}

fn default_fall_boundary() -> f32 {
    -10.0
}

impl Default for GrappleConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            fixed_timestep: default_timestep(),
            gravity: default_gravity(),
            fall_boundary_y: default_fall_boundary(),
            rope: RopeConfig::default(),
            swing: SwingConfig::default(),
            mesh: StripMeshConfig::default(),
            aim: AimConfig::default(),
            movement: MoveConfig::default(),
        }
    }
}

impl GrappleConfig {
    /// Check every section, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.fixed_timestep) {
            return Err(ConfigError::InvalidTimestep(self.fixed_timestep));
        }
        self.rope.validate()?;
        self.swing.validate()?;
        self.mesh.validate()?;
        self.aim.validate()?;
        self.movement.validate()
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigLoadError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn check_force(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidForce { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GrappleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_short_rope() {
        let rope = RopeConfig {
            segment_count: 1,
            ..Default::default()
        };
        assert_eq!(rope.validate(), Err(ConfigError::TooFewSegments(1)));
    }

    #[test]
    fn test_rejects_bad_length() {
        for length in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let rope = RopeConfig {
                segment_length: length,
                ..Default::default()
            };
            assert!(matches!(rope.validate(), Err(ConfigError::InvalidSegmentLength(_))));
        }
    }

    #[test]
    fn test_rejects_negative_ground_check() {
        let movement = MoveConfig {
            ground_check_distance: -0.5,
            ..Default::default()
        };
        assert_eq!(
            movement.validate(),
            Err(ConfigError::InvalidGroundCheckDistance(-0.5))
        );
        assert!((MoveConfig::default().ground_ray_length() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GrappleConfig::from_json(r#"{ "rope": { "segment_count": 4 } }"#).unwrap();
        assert_eq!(config.rope.segment_count, 4);
        assert_eq!(config.rope.segment_length, 0.5);
        assert_eq!(config.gravity, Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(config.name, "Untitled");
    }

    #[test]
    fn test_negative_iterations_rejected() {
        let result = GrappleConfig::from_json(r#"{ "rope": { "constraint_iterations": -1 } }"#);
        assert!(matches!(result, Err(ConfigLoadError::Parse(_))));
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let result = GrappleConfig::from_json(r#"{ "fixed_timestep": 0.0 }"#);
        assert!(matches!(
            result,
            Err(ConfigLoadError::Invalid(ConfigError::InvalidTimestep(_)))
        ));
    }

    #[test]
    fn test_json_roundtrip_file() {
        let mut config = GrappleConfig::default();
        config.name = "swing test".into();
        config.rope.grapple_mask = CollisionMask::layer(2);

        let path = std::env::temp_dir().join(format!("tether-config-{}.json", std::process::id()));
        config.save(&path).unwrap();
        let loaded = GrappleConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
