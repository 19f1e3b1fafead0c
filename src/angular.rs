//! Rotational rate of the rope's end-to-end direction about world up.
//!
//! A first-difference estimator: the signed angle between the previous and
//! current chord direction gives an angular velocity, and the change in
//! that velocity gives an angular acceleration. No smoothing is applied.

use glam::Vec3;

/// World up axis used for the rotation sign.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Tracks the chord direction between fixed steps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AngularMotion {
    last_direction: Option<Vec3>,
    last_angular_velocity: f32,
    angular_acceleration: f32,
}

impl AngularMotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the chord vector (grapple end minus anchor end) of the step that
    /// just finished, `dt` seconds after the previous one.
    ///
    /// The first usable direction only primes the tracker, so the signal
    /// stays at zero for one step after attach. A zero-length chord measures
    /// as no rotation and drops the stored direction, so the step after it
    /// primes again.
    pub fn update(&mut self, chord: Vec3, dt: f32) {
        if !(dt > 0.0) {
            return;
        }

        let direction = chord.normalize_or_zero();
        if let Some(last) = self.last_direction {
            let signed = if direction == Vec3::ZERO {
                0.0
            } else {
                signed_angle_degrees(last, direction, WORLD_UP)
            };
            let angular_velocity = signed / dt;
            self.angular_acceleration = (angular_velocity - self.last_angular_velocity) / dt;
            self.last_angular_velocity = angular_velocity;
        }

        self.last_direction = (direction != Vec3::ZERO).then_some(direction);
    }

    /// Latest angular acceleration, degrees per second squared.
    #[inline]
    pub fn angular_acceleration(&self) -> f32 {
        self.angular_acceleration
    }

    /// Latest angular velocity, degrees per second.
    #[inline]
    pub fn angular_velocity(&self) -> f32 {
        self.last_angular_velocity
    }
}

/// Unsigned angle between two vectors in degrees; 0 if either is degenerate.
pub fn unsigned_angle_degrees(a: Vec3, b: Vec3) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }
    let cos = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Angle from `from` to `to`, negative when the rotation runs clockwise
/// around `axis`. A zero triple product counts as positive.
pub fn signed_angle_degrees(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let angle = unsigned_angle_degrees(from, to);
    let sign = if from.cross(to).dot(axis) >= 0.0 { 1.0 } else { -1.0 };
    angle * sign
}
