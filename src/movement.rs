//! Walking and jumping for the player body.
//!
//! Walking moves the body directly (no acceleration) along the view's
//! horizontal right and forward directions. Jumping is an upward velocity
//! change and needs ground under the body, found with a short downward ray.

use glam::Vec3;

use crate::config::MoveConfig;
use crate::raycast::{Ray, Raycast};
use crate::swing::flatten;

/// Lift applied to the ground ray origin so a body resting exactly on a
/// surface still finds it.
pub(crate) const GROUND_SKIN: f32 = 0.05;

/// Position change for one fixed step of walking.
///
/// The intent is `horizontal * right + vertical * forward`, with both view
/// vectors flattened onto the ground plane. Intents longer than one (a
/// diagonal) are normalized so walking diagonally is not faster.
pub fn walk_displacement(
    config: &MoveConfig,
    horizontal: f32,
    vertical: f32,
    view_right: Vec3,
    view_forward: Vec3,
    dt: f32,
) -> Vec3 {
    let mut direction = flatten(view_right) * horizontal + flatten(view_forward) * vertical;
    if direction.length_squared() > 1.0 {
        direction = direction.normalize();
    }
    direction * config.speed * dt
}

/// Whether ground on `config.ground_mask` lies within the ground ray length below
/// `position`.
pub fn is_grounded<R>(scene: &R, config: &MoveConfig, position: Vec3) -> bool
where
    R: Raycast + ?Sized,
{
    let ray = Ray::new(position + Vec3::Y * GROUND_SKIN, Vec3::NEG_Y);
    scene
        .raycast(&ray, config.ground_ray_length() + GROUND_SKIN, config.ground_mask)
        .is_some()
}
