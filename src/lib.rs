//! # Tether - Verlet rope for a grappling hook
//!
//! A chain of point-mass particles integrated with position Verlet and held
//! together by distance constraints, pinned at one end to a launcher and at
//! the other to the point a grapple ray hit.
//!
//! Each fixed step the rope is integrated in parallel, relaxed sequentially,
//! and sampled for the angular acceleration of its chord about world up.
//! Every rendered frame the particles are turned into a camera-independent
//! ribbon of quads.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tether::prelude::*;
//!
//! let scene = StaticScene::new()
//!     .with_plane(Vec3::ZERO, Vec3::Y, CollisionMask::ALL)
//!     .with_box(Vec3::new(-2.0, 8.0, -8.0), Vec3::new(2.0, 9.0, -4.0), CollisionMask::ALL);
//!
//! let mut rope = RopeController::new(RopeConfig::default())?;
//! let mut mesh = StripMeshBuilder::new(0.1);
//!
//! let launcher = Vec3::new(0.0, 1.0, 0.0);
//! let ray = Ray::new(launcher, Vec3::new(0.0, 1.0, -1.0));
//! if rope.fire(&scene, launcher, ray).is_some() {
//!     rope.step(0.02, Vec3::new(0.0, -9.8, 0.0), launcher);
//!     let strip = mesh.build(rope.current_segments(), 1.0, Vec3::ZERO);
//!     upload(strip.vertex_bytes(), strip.uv_bytes(), strip.index_bytes());
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Segments
//!
//! A [`Segment`] stores its current and previous position; velocity is
//! implicit in their difference. A [`SegmentStore`] is the fixed-length,
//! contiguous buffer of a single rope.
//!
//! ### Stepping
//!
//! [`RopeController::step`] runs, in order:
//!
//! 1. pin the launcher end to the launcher position
//! 2. [`integrator::integrate`] every particle under gravity, in parallel
//! 3. [`solver::solve`] the distance constraints, pinning both ends first
//! 4. update the [`AngularMotion`] tracker from the rope's chord
//!
//! ### Sessions
//!
//! [`GrappleSession`] wires the rope to a fixed-rate clock, an aim rig, a
//! swinging body and an event bus, for callers that want a whole game loop
//! rather than the individual pieces.
//!
//! ## Feature Overview
//!
//! | Module | Provides |
//! |--------|----------|
//! | [`segment`] | [`Segment`], [`SegmentStore`] |
//! | [`integrator`] | parallel and serial Verlet integration |
//! | [`solver`] | [`Pins`], pinned Gauss-Seidel distance relaxation |
//! | [`angular`] | [`AngularMotion`], signed angles about an axis |
//! | [`raycast`] | [`Raycast`], [`StaticScene`], [`CollisionMask`] |
//! | [`rope`] | [`RopeController`] |
//! | [`mesh`] | [`StripMeshBuilder`], [`StripMesh`] |
//! | [`swing`] | [`swing_response`] for a body hanging from the rope |
//! | [`movement`] | walking and grounded jumps for the body |
//! | [`aim`] | [`AimRig`] look controls and aim ray |
//! | [`events`] | [`EventBus`], [`FallDetector`] |
//! | [`time`] | [`FixedTimestep`] |
//! | [`config`] | [`GrappleConfig`] and its JSON persistence |

pub mod aim;
pub mod angular;
pub mod config;
pub mod error;
pub mod events;
pub mod integrator;
pub mod mesh;
pub mod movement;
pub mod raycast;
pub mod rope;
pub mod segment;
pub mod session;
pub mod solver;
pub mod swing;
pub mod time;

pub use bytemuck;
pub use glam::{Quat, Vec2, Vec3};

pub use aim::AimRig;
pub use angular::AngularMotion;
pub use config::{AimConfig, GrappleConfig, MoveConfig, RopeConfig, StripMeshConfig, SwingConfig};
pub use error::{ConfigError, ConfigLoadError};
pub use events::{EventBus, FallDetector, GameEvent, Subscription};
pub use mesh::{StripMesh, StripMeshBuilder};
pub use movement::{is_grounded, walk_displacement};
pub use raycast::{CollisionMask, Ray, RayHit, Raycast, StaticScene};
pub use rope::{AttachResult, RopeController};
pub use segment::{Segment, SegmentStore};
pub use session::{FrameInput, FrameReport, GrappleSession};
pub use solver::Pins;
pub use swing::{swing_response, Body, SwingIntent, SwingResponse};
pub use time::FixedTimestep;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use tether::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aim::AimRig;
    pub use crate::config::{
        AimConfig, GrappleConfig, MoveConfig, RopeConfig, StripMeshConfig, SwingConfig,
    };
    pub use crate::events::{EventBus, FallDetector, GameEvent};
    pub use crate::mesh::{StripMesh, StripMeshBuilder};
    pub use crate::raycast::{CollisionMask, Ray, RayHit, Raycast, StaticScene};
    pub use crate::rope::{AttachResult, RopeController};
    pub use crate::segment::{Segment, SegmentStore};
    pub use crate::session::{FrameInput, FrameReport, GrappleSession};
    pub use crate::swing::Body;
    pub use crate::time::FixedTimestep;
    pub use crate::{Vec2, Vec3};
}
