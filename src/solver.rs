//! Distance-constraint relaxation for a pinned particle chain.
//!
//! Each pass walks the chain from the anchor to the grapple end and splits
//! the length error of every adjacent pair evenly between its two particles
//! (Gauss-Seidel order). Endpoints are pinned before the first pass and are
//! never moved by a correction, so they stay exactly on their pins.
//!
//! Passes are strictly sequential: a correction on pair `i` is already
//! visible when pair `i + 1` is read.

use glam::Vec3;

use crate::segment::Segment;

/// World points the two rope ends are held to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pins {
    /// Launcher end, index 0.
    pub anchor: Vec3,
    /// Impact end, index `N - 1`.
    pub grapple: Vec3,
}

/// Pin both ends, then run `iterations` relaxation passes over the chain.
///
/// With a single particle the anchor pin is written first and then
/// overwritten by the grapple pin. An empty slice is left untouched.
pub fn solve(segments: &mut [Segment], pins: Pins, segment_length: f32, iterations: u32) {
    let count = segments.len();
    if count == 0 {
        return;
    }

    segments[0].position = pins.anchor;
    segments[count - 1].position = pins.grapple;

    for _ in 0..iterations {
        relax(segments, segment_length);
    }
}

/// One anchor-to-grapple pass. Index 0 and `N - 1` receive no correction.
fn relax(segments: &mut [Segment], segment_length: f32) {
    let count = segments.len();
    if count < 2 {
        return;
    }
    let last_pair = count - 2;

    for i in 0..=last_pair {
        let correction = pair_correction(segments[i].position, segments[i + 1].position, segment_length);

        if i != 0 {
            segments[i].position += correction;
        }
        if i != last_pair {
            segments[i + 1].position -= correction;
        }
    }
}

/// Half of the pair's length error, directed from `a` towards `b`.
///
/// Coincident particles have no direction; they get no correction for this
/// pass and are separated later by their other neighbour or by gravity.
#[inline]
fn pair_correction(a: Vec3, b: Vec3, segment_length: f32) -> Vec3 {
    let delta = b - a;
    let dist = delta.length();
    let error = dist - segment_length;
    delta.normalize_or_zero() * (error * 0.5)
}

/// Mean absolute deviation of adjacent-particle distances from `segment_length`.
///
/// Returns 0 for chains with fewer than two particles.
pub fn mean_length_error(segments: &[Segment], segment_length: f32) -> f32 {
    if segments.len() < 2 {
        return 0.0;
    }
    let total: f32 = segments
        .windows(2)
        .map(|pair| (pair[0].position.distance(pair[1].position) - segment_length).abs())
        .sum();
    total / (segments.len() - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[Vec3]) -> Vec<Segment> {
        points.iter().copied().map(Segment::at).collect()
    }

    #[test]
    fn test_empty_is_noop() {
        let mut segments: Vec<Segment> = Vec::new();
        solve(
            &mut segments,
            Pins {
                anchor: Vec3::ONE,
                grapple: Vec3::ZERO,
            },
            1.0,
            4,
        );
        assert!(segments.is_empty());
    }

    #[test]
    fn test_single_particle_takes_grapple_pin() {
        let mut segments = line(&[Vec3::ZERO]);
        let pins = Pins {
            anchor: Vec3::X,
            grapple: Vec3::Y,
        };
        solve(&mut segments, pins, 1.0, 3);
        assert_eq!(segments[0].position, Vec3::Y);
    }

    #[test]
    fn test_two_particles_are_only_pinned() {
        let mut segments = line(&[Vec3::ZERO, Vec3::X]);
        let pins = Pins {
            anchor: Vec3::new(0.0, 1.0, 0.0),
            grapple: Vec3::new(10.0, 1.0, 0.0),
        };
        solve(&mut segments, pins, 1.0, 10);
        assert_eq!(segments[0].position, pins.anchor);
        assert_eq!(segments[1].position, pins.grapple);
    }

    #[test]
    fn test_interior_relaxes_towards_length() {
        let mut segments = line(&[Vec3::ZERO, Vec3::new(0.2, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]);
        let pins = Pins {
            anchor: Vec3::ZERO,
            grapple: Vec3::new(2.0, 0.0, 0.0),
        };
        let before = mean_length_error(&segments, 1.0);
        solve(&mut segments, pins, 1.0, 20);
        let after = mean_length_error(&segments, 1.0);

        assert!(after < before);
        assert!((segments[1].position.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_coincident_particles_stay_finite() {
        let mut segments = line(&[Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO]);
        let pins = Pins {
            anchor: Vec3::ZERO,
            grapple: Vec3::ZERO,
        };
        solve(&mut segments, pins, 0.5, 5);
        assert!(segments.iter().all(|s| s.position.is_finite()));
    }

    #[test]
    fn test_mean_length_error_short_chain() {
        assert_eq!(mean_length_error(&line(&[Vec3::ONE]), 1.0), 0.0);
    }
}
