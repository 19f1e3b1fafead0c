//! Headless grappling-hook runner.
//!
//! Builds a small test level, fires the grapple at an overhang, swings for a
//! while, lets go, and logs the rope's angular acceleration as it goes.

use std::path::PathBuf;

use clap::Parser;
use ftlog::{appender::FileAppender, LevelFilter, LoggerGuard};

use tether::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON session config to load. Defaults are used when omitted.
    #[arg(short('c'), long)]
    config: Option<PathBuf>,

    /// Write the effective config to this path and exit.
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Number of rendered frames to simulate.
    #[arg(short('n'), long, default_value_t = 600)]
    frames: u32,

    /// Rendered frames per second.
    #[arg(short('r'), long, default_value_t = 60.0)]
    frame_rate: f32,

    /// Frame on which the rope is released.
    #[arg(long, default_value_t = 300)]
    release_at: u32,

    /// Maximum log level (error, warn, info, debug, trace).
    #[arg(short('l'), long, default_value = "info")]
    log_level: String,

    /// Log file; logs go to stderr when omitted.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn configure_logger(level: &str, file: Option<&PathBuf>) -> Result<LoggerGuard, String> {
    let level = level.parse::<LevelFilter>().map_err(|e| e.to_string())?;
    let builder = ftlog::Builder::new().max_log_level(level);
    // pass no root to write to stderr
    let builder = match file {
        Some(path) => builder.root(FileAppender::new(path)),
        None => builder,
    };
    builder.try_init().map_err(|e| e.to_string())
}

fn level() -> StaticScene {
    StaticScene::new()
        .with_plane(Vec3::ZERO, Vec3::Y, CollisionMask::layer(0))
        .with_box(
            Vec3::new(-3.0, 8.0, -10.0),
            Vec3::new(3.0, 9.0, -4.0),
            CollisionMask::layer(1),
        )
        .with_sphere(Vec3::new(6.0, 6.0, -6.0), 1.5, CollisionMask::layer(1))
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let _guard = configure_logger(&args.log_level, args.log_file.as_ref())?;

    let config = match &args.config {
        Some(path) => {
            ftlog::info!("Loading config from {path:?}");
            GrappleConfig::load(path).map_err(|e| e.to_string())?
        }
        None => GrappleConfig::default(),
    };

    if let Some(path) = &args.save_config {
        config.save(path).map_err(|e| e.to_string())?;
        ftlog::info!("Config written to {path:?}");
        return Ok(());
    }

    if !(args.frame_rate.is_finite() && args.frame_rate > 0.0) {
        return Err(format!("frame rate must be positive, got {}", args.frame_rate));
    }
    let frame_delta = 1.0 / args.frame_rate;

    let mut session = GrappleSession::new(config, level())
        .map_err(|e| e.to_string())?
        .with_spawn(Vec3::new(0.0, 1.0, 0.0))
        .with_launcher_offset(Vec3::new(0.2, 0.4, 0.0))
        .with_orientation(0.0, 40.0);

    let _event_log = session.events().subscribe(|event: &GameEvent| match event {
        GameEvent::AngularAcceleration(_) => {}
        other => ftlog::info!("event: {other:?}"),
    });

    ftlog::info!(
        "Running '{}' for {} frames at {} fps",
        session.config().name,
        args.frames,
        args.frame_rate
    );

    let report_every = args.frame_rate.round().max(1.0) as u32;
    let mut total_steps = 0u64;
    let mut restarts = 0u32;

    for frame in 0..args.frames {
        let input = FrameInput {
            fire: frame == 0,
            release: frame == args.release_at,
            movement: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        let report = session.frame(frame_delta, &input);
        total_steps += u64::from(report.steps);
        restarts += u32::from(report.restarted);

        if let Some(hit) = report.attached {
            ftlog::info!(
                "Grapple hit {:?} at {:.2} m, {} segments",
                hit.grapple_point,
                hit.distance,
                hit.segment_count
            );
        } else if input.fire {
            ftlog::warn!("Grapple missed");
        }

        if report.rope_active && frame % report_every == 0 {
            ftlog::info!(
                "frame {frame}: angular acceleration {:.2} deg/s^2, {} quads, body at {:?}",
                report.angular_acceleration,
                report.quad_count,
                session.body().position
            );
        }
    }

    ftlog::info!(
        "Done: {} fixed steps, {:.2} s simulated, {} restarts",
        total_steps,
        session.clock().elapsed(),
        restarts
    );

    Ok(())
}
