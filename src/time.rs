//! Fixed-rate simulation clock.
//!
//! Physics advances in whole steps of a fixed length while rendering runs at
//! whatever rate frames arrive. The clock accumulates frame time, reports how
//! many fixed steps are due, and exposes how far the leftover time reaches
//! into the next step: the interpolation factor used to blend the last two
//! physics states.
//!
//! # Example
//!
//! ```ignore
//! use tether::time::FixedTimestep;
//!
//! let mut clock = FixedTimestep::new(0.02);
//!
//! // In your frame loop:
//! for _ in 0..clock.tick() {
//!     rope.step(clock.step(), gravity, launcher);
//! }
//! let mesh = builder.build(rope.current_segments(), clock.interpolation_factor(), origin);
//! ```

use std::time::Instant;

/// Accumulator clock producing fixed steps and an interpolation factor.
#[derive(Debug)]
pub struct FixedTimestep {
    /// Seconds per fixed step.
    step: f32,
    /// Scaled frame time not yet consumed by a step.
    accumulator: f32,
    /// Upper bound on steps per frame, so a long stall cannot spiral.
    max_steps_per_frame: u32,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
    /// Whether time is paused.
    paused: bool,
    /// Total fixed steps taken.
    step_count: u64,
    /// Total scaled time fed in.
    elapsed: f64,
    /// When the last wall-clock tick happened.
    last_tick: Option<Instant>,
}

impl FixedTimestep {
    /// Clock with `step` seconds per fixed step. Non-positive or non-finite
    /// steps fall back to 1/50 s.
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() && step > 0.0 { step } else { 0.02 };
        Self {
            step,
            accumulator: 0.0,
            max_steps_per_frame: 8,
            time_scale: 1.0,
            paused: false,
            step_count: 0,
            elapsed: 0.0,
            last_tick: None,
        }
    }

    /// Feed `frame_delta` seconds of frame time and return the number of
    /// fixed steps to run now.
    ///
    /// While paused nothing accumulates. If more steps are due than the
    /// per-frame limit allows, the excess time is dropped.
    pub fn advance(&mut self, frame_delta: f32) -> u32 {
        if self.paused || !(frame_delta.is_finite() && frame_delta > 0.0) {
            return 0;
        }

        let scaled = frame_delta * self.time_scale;
        self.accumulator += scaled;
        self.elapsed += f64::from(scaled);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps_per_frame && self.accumulator >= self.step {
            self.accumulator %= self.step;
        }

        self.step_count += u64::from(steps);
        steps
    }

    /// [`advance`](Self::advance) by the wall time since the previous tick.
    /// The first tick only starts the clock.
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let delta = self
            .last_tick
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        self.advance(delta)
    }

    /// Fraction of the next fixed step already elapsed, in `[0, 1]`.
    #[inline]
    pub fn interpolation_factor(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Total fixed steps produced.
    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Total scaled time fed into the clock, in seconds.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Stop accumulating time. Resuming does not replay the pause.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_tick = None;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = half speed (slow motion)
    /// - `2.0` = double speed
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    /// Limit on fixed steps per [`advance`](Self::advance); at least 1.
    pub fn set_max_steps_per_frame(&mut self, max: u32) {
        self.max_steps_per_frame = max.max(1);
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(0.02)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_new() {
        let clock = FixedTimestep::new(0.02);
        assert_eq!(clock.step_count(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.time_scale(), 1.0);
        assert_eq!(clock.interpolation_factor(), 0.0);
    }

    #[test]
    fn test_steps_and_factor() {
        let mut clock = FixedTimestep::new(0.25);
        assert_eq!(clock.advance(0.125), 0);
        assert!((clock.interpolation_factor() - 0.5).abs() < 1e-6);

        assert_eq!(clock.advance(0.5), 2);
        assert!((clock.interpolation_factor() - 0.5).abs() < 1e-6);
        assert_eq!(clock.step_count(), 2);
    }

    #[test]
    fn test_pause() {
        let mut clock = FixedTimestep::new(0.1);
        clock.pause();
        assert_eq!(clock.advance(1.0), 0);
        clock.resume();
        assert_eq!(clock.advance(0.25), 2);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = FixedTimestep::new(0.25);
        clock.set_time_scale(2.0);
        assert_eq!(clock.advance(0.25), 2);

        // Negative scale should clamp to 0
        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
        assert_eq!(clock.advance(10.0), 0);
    }

    #[test]
    fn test_spiral_clamp() {
        let mut clock = FixedTimestep::new(0.25);
        clock.set_max_steps_per_frame(3);
        assert_eq!(clock.advance(10.0), 3);
        assert!(clock.interpolation_factor() < 1.0);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_invalid_step_falls_back() {
        assert_eq!(FixedTimestep::new(0.0).step(), 0.02);
        assert_eq!(FixedTimestep::new(f32::NAN).step(), 0.02);
    }

    #[test]
    fn test_first_tick_starts_clock() {
        let mut clock = FixedTimestep::new(0.02);
        assert_eq!(clock.tick(), 0);
    }
}
