//! Rope particles and the fixed-size buffer that holds them.
//!
//! Index 0 is the anchor end (the launcher); the last index is the grapple
//! end (the world impact point). Velocity is never stored: it is the
//! difference between a particle's position and its position one fixed
//! step earlier.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One particle of the rope chain.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Segment {
    /// Position after the most recent fixed step.
    pub position: Vec3,
    /// Position one fixed step earlier, before the current step's integration.
    pub previous_position: Vec3,
}

impl Segment {
    /// A particle at rest at `position`.
    #[inline]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            previous_position: position,
        }
    }

    /// Displacement over the last fixed step.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.position - self.previous_position
    }

    /// Position blended between the previous and current step.
    #[inline]
    pub fn interpolated(&self, t: f32) -> Vec3 {
        self.previous_position.lerp(self.position, t)
    }

    /// Verlet step: carry the implicit velocity forward and add `displacement`
    /// (acceleration already scaled by `dt * dt`).
    #[inline]
    pub fn advance(&mut self, displacement: Vec3) {
        let velocity = self.position - self.previous_position;
        self.previous_position = self.position;
        self.position += velocity;
        self.position += displacement;
    }
}

/// Contiguous, fixed-length particle buffer for one active rope.
///
/// The length is chosen at creation and never changes; a rope with a
/// different segment count gets a fresh store.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentStore {
    segments: Box<[Segment]>,
}

impl SegmentStore {
    /// `count` particles at the origin.
    pub fn new(count: usize) -> Self {
        Self {
            segments: vec![Segment::zeroed(); count].into_boxed_slice(),
        }
    }

    /// Particles at rest along the ray from `start` towards `target`,
    /// `spacing` apart. The chain starts exactly at `start`; it does not
    /// necessarily end at `target`.
    pub fn along_line(start: Vec3, target: Vec3, spacing: f32, count: usize) -> Self {
        let direction = (target - start).normalize_or_zero();
        let segments = (0..count)
            .map(|i| Segment::at(start + direction * (spacing * i as f32)))
            .collect::<Vec<_>>();
        Self {
            segments: segments.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    /// The anchor-end particle.
    #[inline]
    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// The grapple-end particle.
    #[inline]
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Vector from the anchor particle to the grapple particle.
    pub fn chord(&self) -> Vec3 {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => b.position - a.position,
            _ => Vec3::ZERO,
        }
    }

    /// Sum of the distances between adjacent particles.
    pub fn arc_length(&self) -> f32 {
        self.segments
            .windows(2)
            .map(|pair| pair[0].position.distance(pair[1].position))
            .sum()
    }

    /// Raw bytes of the buffer, laid out as `[position, previous_position]`
    /// triples of `f32` per particle.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.segments)
    }
}

impl std::ops::Index<usize> for SegmentStore {
    type Output = Segment;

    fn index(&self, index: usize) -> &Segment {
        &self.segments[index]
    }
}

impl std::ops::IndexMut<usize> for SegmentStore {
    fn index_mut(&mut self, index: usize) -> &mut Segment {
        &mut self.segments[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_at_rest() {
        let s = Segment::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(s.velocity(), Vec3::ZERO);
        assert_eq!(s.interpolated(0.7), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_advance_keeps_velocity() {
        let mut s = Segment {
            position: Vec3::new(1.0, 0.0, 0.0),
            previous_position: Vec3::ZERO,
        };
        s.advance(Vec3::ZERO);
        assert_eq!(s.previous_position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(s.position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_along_line_spacing() {
        let store = SegmentStore::along_line(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), 0.5, 5);
        assert_eq!(store.len(), 5);
        assert_eq!(store[0].position, Vec3::ZERO);
        assert!((store[4].position.y - 2.0).abs() < 1e-6);
        assert!((store.arc_length() - 2.0).abs() < 1e-5);
        assert!(store.as_slice().iter().all(|s| s.velocity() == Vec3::ZERO));
    }

    #[test]
    fn test_along_line_coincident_target() {
        let p = Vec3::new(3.0, 1.0, -2.0);
        let store = SegmentStore::along_line(p, p, 1.0, 4);
        assert!(store.as_slice().iter().all(|s| s.position == p));
    }

    #[test]
    fn test_bytes_layout() {
        let store = SegmentStore::new(3);
        assert_eq!(store.as_bytes().len(), 3 * 6 * std::mem::size_of::<f32>());
    }

    #[test]
    fn test_chord_empty() {
        assert_eq!(SegmentStore::new(0).chord(), Vec3::ZERO);
    }
}
