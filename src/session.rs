//! Frame-driven grappling-hook session.
//!
//! Ties the pieces together the way a game loop would: discrete input
//! intents arrive once per rendered frame, physics runs in fixed steps, and
//! the rope ribbon is rebuilt at the end of every frame with the clock's
//! interpolation factor.
//!
//! ```ignore
//! let scene = StaticScene::new().with_box(min, max, CollisionMask::ALL);
//! let mut session = GrappleSession::new(GrappleConfig::default(), scene)?
//!     .with_spawn(Vec3::new(0.0, 1.0, 0.0));
//!
//! let report = session.frame(1.0 / 60.0, &FrameInput { fire: true, ..Default::default() });
//! upload(session.mesh());
//! ```

use glam::{Vec2, Vec3};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::aim::AimRig;
use crate::config::GrappleConfig;
use crate::error::ConfigError;
use crate::events::{EventBus, FallDetector, GameEvent, Subscription};
use crate::mesh::{StripMesh, StripMeshBuilder};
use crate::movement::{is_grounded, walk_displacement, GROUND_SKIN};
use crate::raycast::{Ray, Raycast};
use crate::rope::{AttachResult, RopeController};
use crate::swing::{swing_response, Body, SwingIntent};
use crate::time::FixedTimestep;

/// Discrete intents collected for one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Fire the grapple along the current aim.
    pub fire: bool,
    /// Release the active rope.
    pub release: bool,
    /// Request a scene restart.
    pub restart: bool,
    /// Jump, if the body is on the ground.
    pub jump: bool,
    /// Look intent per fixed step, x right and y up.
    pub look: Vec2,
    /// Walk and swing intent, x strafe and y forward, each in `[-1, 1]`.
    pub movement: Vec2,
}

/// What happened during one [`GrappleSession::frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed steps run this frame.
    pub steps: u32,
    /// Blend factor used for the mesh.
    pub interpolation_factor: f32,
    pub rope_active: bool,
    /// Set when a fire intent hit something this frame.
    pub attached: Option<AttachResult>,
    /// Latest rope angular acceleration, degrees per second squared.
    pub angular_acceleration: f32,
    /// Quads in the rebuilt ribbon.
    pub quad_count: usize,
    /// Whether the scene was reset at the end of this frame.
    pub restarted: bool,
}

/// A player body, its grapple, and the level it swings in.
pub struct GrappleSession<R> {
    config: GrappleConfig,
    scene: R,
    rope: RopeController,
    mesh: StripMeshBuilder,
    clock: FixedTimestep,
    aim: AimRig,
    body: Body,
    grounded: bool,
    spawn: Vec3,
    eye_offset: Vec3,
    launcher_offset: Vec3,
    mesh_origin: Vec3,
    fall: FallDetector,
    events: EventBus<GameEvent>,
    restart_pending: Arc<AtomicBool>,
    _restart_listener: Subscription<GameEvent>,
}

impl<R: Raycast> GrappleSession<R> {
    /// Validate `config` and set up an idle session with the body at the origin.
    pub fn new(config: GrappleConfig, scene: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let rope = RopeController::new(config.rope.clone())?;
        let mesh = StripMeshBuilder::new(config.mesh.rope_width);
        let clock = FixedTimestep::new(config.fixed_timestep);
        let eye_offset = Vec3::new(0.0, 0.6, 0.0);
        let aim = AimRig::new(config.aim.clone(), eye_offset);
        let fall = FallDetector::new(config.fall_boundary_y);

        let events = EventBus::new();
        let restart_pending = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&restart_pending);
        let restart_listener = events.subscribe(move |event: &GameEvent| {
            if matches!(event, GameEvent::Restart) {
                flag.store(true, Ordering::SeqCst);
            }
        });

        Ok(Self {
            config,
            scene,
            rope,
            mesh,
            clock,
            aim,
            body: Body::default(),
            grounded: false,
            spawn: Vec3::ZERO,
            eye_offset,
            launcher_offset: Vec3::ZERO,
            mesh_origin: Vec3::ZERO,
            fall,
            events,
            restart_pending,
            _restart_listener: restart_listener,
        })
    }

    /// Place the body, and the point it respawns at, at `spawn`.
    pub fn with_spawn(mut self, spawn: Vec3) -> Self {
        self.spawn = spawn;
        self.body = Body::at(spawn);
        self.aim.eye = spawn + self.eye_offset;
        self
    }

    /// Offset of the rope's launcher end from the body.
    pub fn with_launcher_offset(mut self, offset: Vec3) -> Self {
        self.launcher_offset = offset;
        self
    }

    /// Offset of the eye (aim ray origin) from the body.
    pub fn with_eye_offset(mut self, offset: Vec3) -> Self {
        self.eye_offset = offset;
        self.aim.eye = self.body.position + offset;
        self
    }

    /// Reference point the ribbon's vertices are expressed relative to.
    pub fn with_mesh_origin(mut self, origin: Vec3) -> Self {
        self.mesh_origin = origin;
        self
    }

    /// Start looking at `yaw`/`pitch` degrees.
    pub fn with_orientation(mut self, yaw: f32, pitch: f32) -> Self {
        self.aim.set_orientation(yaw, pitch);
        self
    }

    /// Run one rendered frame of `delta` seconds.
    pub fn frame(&mut self, delta: f32, input: &FrameInput) -> FrameReport {
        let mut report = FrameReport::default();

        if input.release && self.rope.detach() {
            self.events.publish(&GameEvent::RopeDetached);
        }
        if input.fire {
            report.attached = self.fire();
        }
        if input.restart {
            self.events.publish(&GameEvent::Restart);
        }

        report.steps = self.clock.advance(delta);
        let dt = self.clock.step();
        for _ in 0..report.steps {
            self.fixed_step(input, dt);
        }

        if self.restart_pending.swap(false, Ordering::SeqCst) {
            self.restart();
            report.restarted = true;
        }

        report.interpolation_factor = self.clock.interpolation_factor();
        report.quad_count = if self.rope.is_active() {
            self.mesh
                .build(
                    self.rope.current_segments(),
                    report.interpolation_factor,
                    self.mesh_origin,
                )
                .quad_count()
        } else {
            self.mesh.clear();
            0
        };
        report.rope_active = self.rope.is_active();
        report.angular_acceleration = self.rope.angular_acceleration();
        report
    }

    /// Aim ray for the current orientation.
    pub fn aim_ray(&self) -> Ray {
        self.aim.ray()
    }

    fn launcher_position(&self) -> Vec3 {
        self.body.position + self.launcher_offset
    }

    fn fire(&mut self) -> Option<AttachResult> {
        let origin = self.launcher_position();
        let ray = self.aim.ray();
        let result = self.rope.fire(&self.scene, origin, ray)?;
        self.events.publish(&GameEvent::RopeAttached {
            grapple_point: result.grapple_point,
        });
        Some(result)
    }

    fn fixed_step(&mut self, input: &FrameInput, dt: f32) {
        self.aim.look(input.look.x, input.look.y, dt);
        self.walk(input, dt);

        let gravity = self.config.gravity;
        let launcher = self.launcher_position();
        self.rope.step(dt, gravity, launcher);

        let mut acceleration = gravity;
        if let Some(grapple_point) = self.rope.grapple_point() {
            let intent = SwingIntent {
                horizontal: input.movement.x,
                vertical: input.movement.y,
                view_forward: self.aim.forward(),
                view_right: self.aim.right(),
            };
            let response = swing_response(
                &self.config.swing,
                grapple_point,
                self.rope.max_length(),
                &self.body,
                Some(&intent),
            );
            self.body.velocity = response.velocity;
            acceleration += response.acceleration;

            let angular_acceleration = self.rope.angular_acceleration();
            info!("angular acceleration: {:.2} deg/s^2", angular_acceleration);
            self.events
                .publish(&GameEvent::AngularAcceleration(angular_acceleration));
        }

        let before = self.body.position;
        self.body.integrate(acceleration, dt);
        self.land(before);
        self.aim.eye = self.body.position + self.eye_offset;

        // One restart per frame is enough; it runs once the steps are done.
        if !self.restart_pending.load(Ordering::SeqCst) {
            self.fall.check(self.body.position, &self.events);
        }
    }

    /// Ground check, walking and jumping for one fixed step.
    fn walk(&mut self, input: &FrameInput, dt: f32) {
        let movement = &self.config.movement;
        self.grounded = is_grounded(&self.scene, movement, self.body.position);

        self.body.position += walk_displacement(
            movement,
            input.movement.x,
            input.movement.y,
            self.aim.right(),
            self.aim.forward(),
            dt,
        );

        if input.jump && self.grounded {
            self.body.velocity.y += movement.jump_force;
            debug!("jump from {:?}", self.body.position);
        }
    }

    /// Stop the body on the first surface crossed while moving down.
    fn land(&mut self, before: Vec3) {
        let drop = before.y - self.body.position.y;
        if drop <= 0.0 {
            return;
        }
        // Start slightly above so a body resting on a surface still finds it.
        let ray = Ray::new(before + Vec3::Y * GROUND_SKIN, Vec3::NEG_Y);
        if let Some(hit) = self
            .scene
            .raycast(&ray, drop + GROUND_SKIN, self.config.movement.ground_mask)
        {
            self.body.position.y = hit.point.y;
            self.body.velocity.y = 0.0;
        }
    }

    /// Reset body, aim and rope to their initial state.
    pub fn restart(&mut self) {
        info!("restarting session '{}'", self.config.name);
        if self.rope.detach() {
            self.events.publish(&GameEvent::RopeDetached);
        }
        self.body = Body::at(self.spawn);
        self.grounded = false;
        self.aim.set_orientation(0.0, 0.0);
        self.aim.eye = self.spawn + self.eye_offset;
        self.mesh.clear();
        self.restart_pending.store(false, Ordering::SeqCst);
        debug!("body respawned at {:?}", self.spawn);
    }

    pub fn config(&self) -> &GrappleConfig {
        &self.config
    }

    pub fn rope(&self) -> &RopeController {
        &self.rope
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Whether the ground ray found ground on the last fixed step.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn aim(&self) -> &AimRig {
        &self.aim
    }

    pub fn clock(&self) -> &FixedTimestep {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FixedTimestep {
        &mut self.clock
    }

    /// Ribbon built at the end of the last frame.
    pub fn mesh(&self) -> StripMesh<'_> {
        self.mesh.mesh()
    }

    /// Channel for restart, rope and UI notifications.
    pub fn events(&self) -> &EventBus<GameEvent> {
        &self.events
    }
}
