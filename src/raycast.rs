//! Aim-ray queries against level geometry.
//!
//! The rope only needs a single closest-hit ray query when it is fired.
//! Anything that can answer that query implements [`Raycast`]; closures do
//! so automatically, and [`StaticScene`] covers simple level blockouts.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bit set of collision layers.
///
/// A query with mask `m` only sees colliders whose layers intersect `m`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// No layer; queries with this mask never hit.
    pub const NONE: Self = Self(0);

    /// Mask containing only `layer` (0..32). Out-of-range layers yield [`Self::NONE`].
    pub const fn layer(layer: u32) -> Self {
        if layer < 32 {
            Self(1 << layer)
        } else {
            Self::NONE
        }
    }

    /// Union of two masks.
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether the two masks share any layer.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CollisionMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// A half-line with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. A zero direction stays zero and
    /// such a ray hits nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Closest intersection reported by a [`Raycast`] query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space impact point.
    pub point: Vec3,
    /// Surface normal at the impact point.
    pub normal: Vec3,
    /// Distance along the ray.
    pub distance: f32,
}

/// Collision collaborator used to acquire the grapple point.
pub trait Raycast {
    /// Closest hit along `ray` within `max_distance` on layers in `mask`.
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: CollisionMask) -> Option<RayHit>;
}

impl<F> Raycast for F
where
    F: Fn(&Ray, f32, CollisionMask) -> Option<RayHit>,
{
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: CollisionMask) -> Option<RayHit> {
        self(ray, max_distance, mask)
    }
}

/// Primitive collision shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Infinite plane `dot(normal, p) = offset` with a unit normal.
    Plane { normal: Vec3, offset: f32 },
    /// Solid sphere.
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box.
    Aabb { min: Vec3, max: Vec3 },
}

/// A shape tagged with the layers it lives on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    pub layers: CollisionMask,
}

/// Immutable set of colliders answering aim queries by brute force.
#[derive(Clone, Debug, Default)]
pub struct StaticScene {
    colliders: Vec<Collider>,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plane through `point` facing `normal`.
    pub fn with_plane(mut self, point: Vec3, normal: Vec3, layers: CollisionMask) -> Self {
        let normal = normal.normalize_or_zero();
        self.colliders.push(Collider {
            shape: Shape::Plane {
                normal,
                offset: normal.dot(point),
            },
            layers,
        });
        self
    }

    pub fn with_sphere(mut self, center: Vec3, radius: f32, layers: CollisionMask) -> Self {
        self.colliders.push(Collider {
            shape: Shape::Sphere { center, radius },
            layers,
        });
        self
    }

    /// Add a box spanning the two corners in any order.
    pub fn with_box(mut self, a: Vec3, b: Vec3, layers: CollisionMask) -> Self {
        self.colliders.push(Collider {
            shape: Shape::Aabb {
                min: a.min(b),
                max: a.max(b),
            },
            layers,
        });
        self
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }
}

impl Raycast for StaticScene {
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: CollisionMask) -> Option<RayHit> {
        if ray.direction == Vec3::ZERO || !(max_distance >= 0.0) {
            return None;
        }

        self.colliders
            .iter()
            .filter(|c| c.layers.intersects(mask))
            .filter_map(|c| intersect(&c.shape, ray))
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

fn intersect(shape: &Shape, ray: &Ray) -> Option<RayHit> {
    match *shape {
        Shape::Plane { normal, offset } => {
            let denom = normal.dot(ray.direction);
            if denom.abs() < 1e-6 {
                return None;
            }
            let t = (offset - normal.dot(ray.origin)) / denom;
            if t < 0.0 {
                return None;
            }
            // Report the face the ray arrives at.
            let facing = if denom < 0.0 { normal } else { -normal };
            Some(RayHit {
                point: ray.point_at(t),
                normal: facing,
                distance: t,
            })
        }
        Shape::Sphere { center, radius } => {
            let oc = ray.origin - center;
            let b = oc.dot(ray.direction);
            let c = oc.length_squared() - radius * radius;
            let discriminant = b * b - c;
            if discriminant < 0.0 {
                return None;
            }
            let sqrt_d = discriminant.sqrt();
            // Origin inside the sphere: no hit, as for a back-face-culled surface.
            let t = -b - sqrt_d;
            if t < 0.0 {
                return None;
            }
            let point = ray.point_at(t);
            Some(RayHit {
                point,
                normal: (point - center).normalize_or_zero(),
                distance: t,
            })
        }
        Shape::Aabb { min, max } => {
            let inv = ray.direction.recip();
            let t0 = (min - ray.origin) * inv;
            let t1 = (max - ray.origin) * inv;
            let near = t0.min(t1);
            let far = t0.max(t1);
            let t_enter = finite_max(near);
            let t_exit = finite_min(far);
            if t_enter > t_exit || t_enter < 0.0 {
                return None;
            }
            let point = ray.point_at(t_enter);
            Some(RayHit {
                point,
                normal: box_normal(near, t_enter, ray.direction),
                distance: t_enter,
            })
        }
    }
}

// Slab tests divide by zero on axis-parallel rays; the NaN/inf lanes of an
// axis the ray never crosses must not decide the interval.
fn finite_max(v: Vec3) -> f32 {
    v.to_array()
        .into_iter()
        .filter(|x| !x.is_nan())
        .fold(f32::NEG_INFINITY, f32::max)
}

fn finite_min(v: Vec3) -> f32 {
    v.to_array()
        .into_iter()
        .filter(|x| !x.is_nan())
        .fold(f32::INFINITY, f32::min)
}

fn box_normal(near: Vec3, t_enter: f32, direction: Vec3) -> Vec3 {
    let axis = near
        .to_array()
        .iter()
        .position(|&t| t == t_enter)
        .unwrap_or(0);
    let mut normal = Vec3::ZERO;
    normal[axis] = -direction[axis].signum();
    normal
}
