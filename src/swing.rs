//! How a taut rope acts on the body hanging from it.
//!
//! The rope never pushes. Once the body is farther from the grapple point
//! than the rope's rest length, its outward velocity along the rope is
//! removed and a spring-like pull proportional to the over-extension is
//! applied. Directional intents steer the swing in the plane orthogonal to
//! the rope.

use glam::Vec3;

use crate::angular::WORLD_UP;
use crate::config::SwingConfig;

/// Point-mass state of the swinging body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Body {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    /// Semi-implicit Euler step.
    pub fn integrate(&mut self, acceleration: Vec3, dt: f32) {
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }
}

/// Directional steering for one fixed step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwingIntent {
    /// Strafe axis, -1 (left) to 1 (right).
    pub horizontal: f32,
    /// Forward axis, -1 (back) to 1 (forward).
    pub vertical: f32,
    /// View forward direction.
    pub view_forward: Vec3,
    /// View right direction.
    pub view_right: Vec3,
}

/// Result of evaluating the rope against the body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwingResponse {
    /// Body velocity after removing outward motion along a taut rope.
    pub velocity: Vec3,
    /// Acceleration to apply this step (pull plus steering).
    pub acceleration: Vec3,
    /// Whether the body was past the rope's rest length.
    pub taut: bool,
}

/// Evaluate the rope's effect on `body` for a rope of rest length `max_length`
/// fixed at `grapple_point`.
pub fn swing_response(
    config: &SwingConfig,
    grapple_point: Vec3,
    max_length: f32,
    body: &Body,
    intent: Option<&SwingIntent>,
) -> SwingResponse {
    let to_grapple = grapple_point - body.position;
    let current_length = to_grapple.length();
    let dir = to_grapple.normalize_or_zero();

    let mut response = SwingResponse {
        velocity: body.velocity,
        ..Default::default()
    };

    if current_length > max_length {
        let along = dir * body.velocity.dot(dir);
        response.velocity = body.velocity - along;
        response.acceleration += dir * (current_length - max_length) * config.rope_stiffness;
        response.taut = true;
    }

    if let Some(intent) = intent.filter(|_| config.allow_swing_control) {
        let forward = flatten(intent.view_forward);
        let right = flatten(intent.view_right);
        let swing_forward = project_on_plane(forward, dir).normalize_or_zero();
        let swing_right = project_on_plane(right, dir).normalize_or_zero();

        response.acceleration += swing_right * intent.horizontal * config.swing_force;
        response.acceleration += swing_forward * intent.vertical * config.swing_force;
    }

    response
}

/// Horizontal component of `v`, normalized.
pub(crate) fn flatten(v: Vec3) -> Vec3 {
    (v - WORLD_UP * v.dot(WORLD_UP)).normalize_or_zero()
}

/// Remove the component of `v` along `normal`. A zero normal leaves `v` unchanged.
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let len_sq = normal.length_squared();
    if len_sq < f32::EPSILON {
        return v;
    }
    v - normal * (v.dot(normal) / len_sq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SwingConfig {
        SwingConfig {
            swing_force: 2.0,
            allow_swing_control: true,
            rope_stiffness: 10.0,
        }
    }

    #[test]
    fn test_slack_rope_does_nothing() {
        let body = Body {
            position: Vec3::ZERO,
            velocity: Vec3::new(1.0, 2.0, 3.0),
        };
        let r = swing_response(&config(), Vec3::new(0.0, 5.0, 0.0), 10.0, &body, None);
        assert!(!r.taut);
        assert_eq!(r.velocity, body.velocity);
        assert_eq!(r.acceleration, Vec3::ZERO);
    }

    #[test]
    fn test_taut_rope_clamps_and_pulls() {
        let body = Body {
            position: Vec3::ZERO,
            velocity: Vec3::new(1.0, -3.0, 0.0),
        };
        let r = swing_response(&config(), Vec3::new(0.0, 6.0, 0.0), 5.0, &body, None);
        assert!(r.taut);
        assert!((r.velocity - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((r.acceleration - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_steering_orthogonal_to_rope() {
        let body = Body::at(Vec3::ZERO);
        let intent = SwingIntent {
            horizontal: 1.0,
            vertical: 1.0,
            view_forward: Vec3::new(0.0, -0.5, -1.0),
            view_right: Vec3::X,
        };
        let grapple = Vec3::new(0.0, 4.0, -3.0);
        let r = swing_response(&config(), grapple, 10.0, &body, Some(&intent));
        let dir = grapple.normalize();
        assert!(r.acceleration.dot(dir).abs() < 1e-4);
        assert!(r.acceleration.x > 0.0);
    }

    #[test]
    fn test_steering_disabled() {
        let mut cfg = config();
        cfg.allow_swing_control = false;
        let intent = SwingIntent {
            horizontal: 1.0,
            vertical: 0.0,
            view_forward: Vec3::NEG_Z,
            view_right: Vec3::X,
        };
        let r = swing_response(&cfg, Vec3::Y, 10.0, &Body::at(Vec3::ZERO), Some(&intent));
        assert_eq!(r.acceleration, Vec3::ZERO);
    }

    #[test]
    fn test_body_integrate() {
        let mut body = Body::at(Vec3::ZERO);
        body.integrate(Vec3::new(0.0, -10.0, 0.0), 0.1);
        assert!((body.velocity.y + 1.0).abs() < 1e-6);
        assert!((body.position.y + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_project_zero_normal() {
        assert_eq!(project_on_plane(Vec3::ONE, Vec3::ZERO), Vec3::ONE);
    }
}
