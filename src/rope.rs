//! Rope lifecycle and the per-step simulation pipeline.
//!
//! A [`RopeController`] owns at most one active rope. Firing allocates a
//! fresh [`SegmentStore`]; releasing (or firing again) drops it. Each fixed
//! step re-pins the anchor to the launcher, integrates all particles in
//! parallel, relaxes the chain sequentially, and updates the angular signal.
//!
//! Readers (the mesh builder, swing logic) borrow the particles through
//! [`RopeController::current_segments`], so a step or a release can never
//! overlap a read of the same store.

use glam::Vec3;
use log::{debug, trace, warn};

use crate::angular::AngularMotion;
use crate::config::RopeConfig;
use crate::error::ConfigError;
use crate::integrator;
use crate::raycast::{CollisionMask, Ray, Raycast};
use crate::segment::{Segment, SegmentStore};
use crate::solver::{self, Pins};

/// What a successful attach produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttachResult {
    /// World point the grapple end is pinned to.
    pub grapple_point: Vec3,
    /// Distance from the launcher to the grapple point at attach time.
    pub distance: f32,
    /// Particles allocated for the new rope.
    pub segment_count: usize,
}

/// State that only exists while a rope is out.
#[derive(Debug)]
struct ActiveRope {
    segments: SegmentStore,
    anchor: Vec3,
    grapple: Vec3,
    angular: AngularMotion,
}

/// Owns the active rope and drives its simulation.
#[derive(Debug)]
pub struct RopeController {
    config: RopeConfig,
    rope: Option<ActiveRope>,
}

impl RopeController {
    /// Create an idle controller. Rejects configurations that could not
    /// produce a valid rope.
    pub fn new(config: RopeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rope: None })
    }

    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    /// Fire the aim ray and, on a hit, replace any existing rope with a new
    /// one stretched from `origin` towards the hit point.
    ///
    /// A miss changes nothing and returns `None`.
    pub fn attach<R>(
        &mut self,
        scene: &R,
        origin: Vec3,
        ray: Ray,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Option<AttachResult>
    where
        R: Raycast + ?Sized,
    {
        let hit = scene.raycast(&ray, max_distance, mask)?;
        Some(self.attach_to(origin, hit.point))
    }

    /// [`attach`](Self::attach) with the configured range and mask.
    pub fn fire<R>(&mut self, scene: &R, origin: Vec3, ray: Ray) -> Option<AttachResult>
    where
        R: Raycast + ?Sized,
    {
        let (max_distance, mask) = (self.config.max_distance, self.config.grapple_mask);
        self.attach(scene, origin, ray, max_distance, mask)
    }

    /// Spawn a rope to a known grapple point without a ray query.
    ///
    /// Particles are laid out at rest from `origin` along the line to
    /// `grapple_point`, `segment_length` apart.
    pub fn attach_to(&mut self, origin: Vec3, grapple_point: Vec3) -> AttachResult {
        // Release the previous buffer before sizing the new one.
        self.rope = None;

        let count = self.config.segment_count;
        let segments =
            SegmentStore::along_line(origin, grapple_point, self.config.segment_length, count);

        self.rope = Some(ActiveRope {
            segments,
            anchor: origin,
            grapple: grapple_point,
            angular: AngularMotion::new(),
        });

        let distance = origin.distance(grapple_point);
        debug!(
            "rope attached at {:?}, {:.2} from launcher, {} segments",
            grapple_point, distance, count
        );

        AttachResult {
            grapple_point,
            distance,
            segment_count: count,
        }
    }

    /// Release the rope. Returns whether one was active; calling this on an
    /// idle controller does nothing.
    pub fn detach(&mut self) -> bool {
        let was_active = self.rope.take().is_some();
        if was_active {
            debug!("rope detached");
        }
        was_active
    }

    /// Advance the active rope by one fixed step of `dt` seconds.
    ///
    /// Does nothing while idle. A non-positive or non-finite `dt` skips the
    /// step so the angular signal never divides by zero.
    pub fn step(&mut self, dt: f32, gravity: Vec3, launcher_position: Vec3) {
        let Some(rope) = self.rope.as_mut() else {
            return;
        };
        if !(dt.is_finite() && dt > 0.0) {
            warn!("skipping rope step with invalid dt {}", dt);
            return;
        }

        rope.anchor = launcher_position;

        integrator::integrate(rope.segments.as_mut_slice(), gravity, dt);
        solver::solve(
            rope.segments.as_mut_slice(),
            Pins {
                anchor: rope.anchor,
                grapple: rope.grapple,
            },
            self.config.segment_length,
            self.config.constraint_iterations,
        );
        rope.angular.update(rope.segments.chord(), dt);

        trace!(
            "rope step: arc {:.3}, angular acceleration {:.3}",
            rope.segments.arc_length(),
            rope.angular.angular_acceleration()
        );
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.rope.is_some()
    }

    /// Particles of the active rope; empty while idle.
    pub fn current_segments(&self) -> &[Segment] {
        self.rope
            .as_ref()
            .map(|r| r.segments.as_slice())
            .unwrap_or(&[])
    }

    /// The active rope's particle buffer.
    pub fn segment_store(&self) -> Option<&SegmentStore> {
        self.rope.as_ref().map(|r| &r.segments)
    }

    /// Latest angular acceleration of the rope chord about world up, in
    /// degrees per second squared. Zero while idle.
    pub fn angular_acceleration(&self) -> f32 {
        self.rope
            .as_ref()
            .map_or(0.0, |r| r.angular.angular_acceleration())
    }

    /// Latest angular velocity of the rope chord, in degrees per second.
    pub fn angular_velocity(&self) -> f32 {
        self.rope
            .as_ref()
            .map_or(0.0, |r| r.angular.angular_velocity())
    }

    /// Where the launcher end was pinned on the last step (or at attach).
    pub fn anchor_point(&self) -> Option<Vec3> {
        self.rope.as_ref().map(|r| r.anchor)
    }

    pub fn grapple_point(&self) -> Option<Vec3> {
        self.rope.as_ref().map(|r| r.grapple)
    }

    /// Rest length of the whole rope, used by swing logic to decide when
    /// the body is over-extended.
    pub fn max_length(&self) -> f32 {
        self.config.max_length()
    }
}
