//! Position-only (Störmer-Verlet) integration.
//!
//! Every particle is advanced independently of its neighbours, so the pass
//! is a plain parallel map over the buffer. The gravity displacement is
//! computed once per call, which keeps the result bit-identical no matter
//! how rayon splits the work.

use glam::Vec3;
use rayon::prelude::*;

use crate::segment::Segment;

/// Minimum number of particles handed to one rayon job.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Advance all particles by one fixed step under constant acceleration.
pub fn integrate(segments: &mut [Segment], gravity: Vec3, dt: f32) {
    integrate_batched(segments, gravity, dt, DEFAULT_BATCH_SIZE);
}

/// [`integrate`] with an explicit lower bound on the per-job batch size.
///
/// `batch_size` only affects scheduling; a value of 0 is treated as 1.
pub fn integrate_batched(segments: &mut [Segment], gravity: Vec3, dt: f32, batch_size: usize) {
    let displacement = step_displacement(gravity, dt);
    segments
        .par_iter_mut()
        .with_min_len(batch_size.max(1))
        .for_each(|segment| segment.advance(displacement));
}

/// Single-threaded [`integrate`].
pub fn integrate_serial(segments: &mut [Segment], gravity: Vec3, dt: f32) {
    let displacement = step_displacement(gravity, dt);
    for segment in segments.iter_mut() {
        segment.advance(displacement);
    }
}

#[inline]
fn step_displacement(gravity: Vec3, dt: f32) -> Vec3 {
    gravity * dt * dt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_fall_from_rest() {
        let mut segments = vec![Segment::at(Vec3::ZERO); 3];
        integrate(&mut segments, Vec3::new(0.0, -10.0, 0.0), 0.1);

        for s in &segments {
            assert_eq!(s.previous_position, Vec3::ZERO);
            assert!((s.position.y + 0.1).abs() < 1e-6);
        }

        // Second step carries the implicit velocity forward.
        integrate(&mut segments, Vec3::new(0.0, -10.0, 0.0), 0.1);
        assert!((segments[0].position.y + 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_empty_is_noop() {
        let mut segments: Vec<Segment> = Vec::new();
        integrate(&mut segments, Vec3::NEG_Y, 0.02);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_zero_batch_size() {
        let mut a = vec![Segment::at(Vec3::ONE); 10];
        let mut b = a.clone();
        integrate_batched(&mut a, Vec3::NEG_Y, 0.02, 0);
        integrate_serial(&mut b, Vec3::NEG_Y, 0.02);
        assert_eq!(a, b);
    }
}
