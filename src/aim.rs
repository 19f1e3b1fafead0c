//! First-person look rig that supplies the grapple aim ray.
//!
//! Look intents are applied once per fixed step; rendering blends between the
//! previous and current step's orientation with the same interpolation factor
//! the rope mesh uses.

use glam::{EulerRot, Quat, Vec3};

use crate::config::AimConfig;
use crate::raycast::Ray;

/// Yaw/pitch look rig.
#[derive(Clone, Debug)]
pub struct AimRig {
    /// Horizontal rotation in degrees, positive turns left.
    pub yaw: f32,
    /// Vertical rotation in degrees, positive looks up.
    pub pitch: f32,
    /// Eye position the aim ray starts from.
    pub eye: Vec3,
    config: AimConfig,
    rotation: Quat,
    previous_rotation: Quat,
}

impl AimRig {
    /// Rig at `eye` looking down -Z.
    pub fn new(config: AimConfig, eye: Vec3) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            eye,
            config,
            rotation: Quat::IDENTITY,
            previous_rotation: Quat::IDENTITY,
        }
    }

    /// Apply one fixed step of look intent (`dx` right, `dy` up).
    pub fn look(&mut self, dx: f32, dy: f32, dt: f32) {
        let scale = self.config.sensitivity * dt;
        self.yaw -= dx * scale;
        self.pitch += dy * scale;
        let limit = self.config.max_look_angle;
        self.pitch = self.pitch.clamp(-limit, limit);

        self.previous_rotation = self.rotation;
        self.rotation = orientation(self.yaw, self.pitch);
    }

    /// Snap to an orientation with no blend from the previous step.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        let limit = self.config.max_look_angle;
        self.yaw = yaw;
        self.pitch = pitch.clamp(-limit, limit);
        self.rotation = orientation(self.yaw, self.pitch);
        self.previous_rotation = self.rotation;
    }

    /// Orientation after the latest fixed step.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Orientation blended between the last two fixed steps.
    pub fn interpolated_rotation(&self, t: f32) -> Quat {
        self.previous_rotation.slerp(self.rotation, t.clamp(0.0, 1.0))
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Unit vector to the right of the view.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Ray from the eye along the view direction.
    pub fn ray(&self) -> Ray {
        Ray::new(self.eye, self.forward())
    }
}

fn orientation(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch.to_radians(), 0.0)
}
