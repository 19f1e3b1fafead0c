//! Ribbon (quad strip) geometry for a rope.
//!
//! Runs once per rendered frame. Particle positions are blended between the
//! previous and current fixed step by the interpolation factor, so the rope
//! moves smoothly at render rates above the physics rate.
//!
//! Each adjacent particle pair becomes one quad of four vertices:
//!
//! ```text
//!   leftB (2) ---- rightB (3)      triangles: (leftA, leftB, rightA)
//!      |       /       |                      (rightA, leftB, rightB)
//!   leftA (0) ---- rightA (1)
//! ```
//!
//! Buffers are owned by the builder and only reallocated when the quad count
//! changes; the steady-state path overwrites them in place.

use glam::{Vec2, Vec3};
use log::debug;

use crate::angular::WORLD_UP;
use crate::segment::Segment;

const VERTICES_PER_QUAD: usize = 4;
const INDICES_PER_QUAD: usize = 6;

const LEFT_A: u32 = 0;
const RIGHT_A: u32 = 1;
const LEFT_B: u32 = 2;
const RIGHT_B: u32 = 3;

/// Reusable quad-strip buffers.
#[derive(Clone, Debug, Default)]
pub struct StripMeshBuilder {
    rope_width: f32,
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    triangles: Vec<u32>,
    quad_count: usize,
}

impl StripMeshBuilder {
    /// Builder producing ribbons `rope_width` wide.
    pub fn new(rope_width: f32) -> Self {
        Self {
            rope_width,
            ..Default::default()
        }
    }

    pub fn rope_width(&self) -> f32 {
        self.rope_width
    }

    pub fn set_rope_width(&mut self, rope_width: f32) {
        self.rope_width = rope_width;
    }

    /// Rebuild the ribbon for `segments` at interpolation factor `t`, with
    /// vertices expressed relative to `origin`.
    ///
    /// Fewer than two particles produce no geometry. `t` is clamped to
    /// `[0, 1]`; a NaN factor uses the current step as is.
    pub fn build(&mut self, segments: &[Segment], t: f32, origin: Vec3) -> StripMesh<'_> {
        if segments.len() < 2 {
            self.clear();
            return self.mesh();
        }

        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        let quad_count = segments.len() - 1;
        self.resize(quad_count);

        let half_width = self.rope_width * 0.5;
        let v_scale = 1.0 / quad_count as f32;

        for (i, pair) in segments.windows(2).enumerate() {
            let pos_a = pair[0].interpolated(t);
            let pos_b = pair[1].interpolated(t);
            let side = side_direction(pos_b - pos_a) * half_width;

            let local_a = pos_a - origin;
            let local_b = pos_b - origin;

            let vert = i * VERTICES_PER_QUAD;
            self.vertices[vert] = local_a + side;
            self.vertices[vert + 1] = local_a - side;
            self.vertices[vert + 2] = local_b + side;
            self.vertices[vert + 3] = local_b - side;

            let v0 = i as f32 * v_scale;
            let v1 = (i + 1) as f32 * v_scale;
            self.uvs[vert] = Vec2::new(0.0, v0);
            self.uvs[vert + 1] = Vec2::new(1.0, v0);
            self.uvs[vert + 2] = Vec2::new(0.0, v1);
            self.uvs[vert + 3] = Vec2::new(1.0, v1);

            let base = vert as u32;
            let tri = i * INDICES_PER_QUAD;
            self.triangles[tri..tri + INDICES_PER_QUAD].copy_from_slice(&[
                base + LEFT_A,
                base + LEFT_B,
                base + RIGHT_A,
                base + RIGHT_A,
                base + LEFT_B,
                base + RIGHT_B,
            ]);
        }

        self.mesh()
    }

    /// Drop the geometry but keep the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        self.triangles.clear();
        self.quad_count = 0;
    }

    /// The geometry produced by the last [`build`](Self::build).
    pub fn mesh(&self) -> StripMesh<'_> {
        StripMesh {
            vertices: &self.vertices,
            uvs: &self.uvs,
            triangles: &self.triangles,
        }
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    fn resize(&mut self, quad_count: usize) {
        if quad_count == self.quad_count {
            return;
        }
        debug!("resizing rope mesh from {} to {} quads", self.quad_count, quad_count);
        let vertex_count = quad_count * VERTICES_PER_QUAD;
        self.vertices = vec![Vec3::ZERO; vertex_count];
        self.uvs = vec![Vec2::ZERO; vertex_count];
        self.triangles = vec![0; quad_count * INDICES_PER_QUAD];
        self.quad_count = quad_count;
    }
}

/// Borrowed view of a ribbon ready for upload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripMesh<'a> {
    pub vertices: &'a [Vec3],
    pub uvs: &'a [Vec2],
    /// Triangle list, three indices per triangle.
    pub triangles: &'a [u32],
}

impl StripMesh<'_> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.uvs)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.triangles)
    }
}

/// Unit vector across the ribbon for a strip running along `delta`.
///
/// The ribbon lies flat across world up. When the strip runs vertically the
/// cross product vanishes and any perpendicular is used; coincident points
/// fall back to world +X.
fn side_direction(delta: Vec3) -> Vec3 {
    let forward = delta.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Vec3::X;
    }
    let side = forward.cross(WORLD_UP);
    if side.length_squared() > 1e-10 {
        side.normalize()
    } else {
        forward.any_orthonormal_vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(count: usize) -> Vec<Segment> {
        (0..count)
            .map(|i| Segment::at(Vec3::new(i as f32, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn test_empty_for_short_chains() {
        let mut builder = StripMeshBuilder::new(0.1);
        assert!(builder.build(&[], 0.5, Vec3::ZERO).is_empty());
        assert!(builder.build(&straight(1), 0.5, Vec3::ZERO).is_empty());
    }

    #[test]
    fn test_counts() {
        let mut builder = StripMeshBuilder::new(0.1);
        let mesh = builder.build(&straight(5), 1.0, Vec3::ZERO);
        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.uvs.len(), 16);
        assert_eq!(mesh.triangles.len(), 24);
        assert_eq!(mesh.quad_count(), 4);
    }

    #[test]
    fn test_first_quad_layout() {
        let mut builder = StripMeshBuilder::new(0.2);
        let mesh = builder.build(&straight(3), 1.0, Vec3::ZERO);

        // Along +X the side is X cross Y = +Z.
        assert!((mesh.vertices[0] - Vec3::new(0.0, 0.0, 0.1)).length() < 1e-6);
        assert!((mesh.vertices[1] - Vec3::new(0.0, 0.0, -0.1)).length() < 1e-6);
        assert!((mesh.vertices[2] - Vec3::new(1.0, 0.0, 0.1)).length() < 1e-6);
        assert!((mesh.vertices[3] - Vec3::new(1.0, 0.0, -0.1)).length() < 1e-6);

        assert_eq!(&mesh.triangles[..6], &[0, 2, 1, 1, 2, 3]);
        assert_eq!(&mesh.triangles[6..], &[4, 6, 5, 5, 6, 7]);

        assert_eq!(mesh.uvs[0], Vec2::new(0.0, 0.0));
        assert_eq!(mesh.uvs[3], Vec2::new(1.0, 0.5));
        assert_eq!(mesh.uvs[7], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_interpolation_and_origin() {
        let segments = vec![
            Segment {
                position: Vec3::new(0.0, 2.0, 0.0),
                previous_position: Vec3::ZERO,
            },
            Segment {
                position: Vec3::new(1.0, 2.0, 0.0),
                previous_position: Vec3::new(1.0, 0.0, 0.0),
            },
        ];
        let mut builder = StripMeshBuilder::new(0.0);
        let mesh = builder.build(&segments, 0.25, Vec3::new(0.0, 0.5, 0.0));
        assert!((mesh.vertices[0] - Vec3::ZERO).length() < 1e-6);
        assert!((mesh.vertices[2] - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_forward_is_finite() {
        let segments = vec![Segment::at(Vec3::ONE); 3];
        let mut builder = StripMeshBuilder::new(0.5);
        let mesh = builder.build(&segments, 0.5, Vec3::ZERO);
        assert!(mesh.vertices.iter().all(|v| v.is_finite()));
        assert!((mesh.vertices[0] - mesh.vertices[1]).length() > 0.49);

        let vertical = vec![Segment::at(Vec3::ZERO), Segment::at(Vec3::Y)];
        let mesh = builder.build(&vertical, 1.0, Vec3::ZERO);
        assert!(mesh.vertices.iter().all(|v| v.is_finite()));
        assert!((mesh.vertices[0] - mesh.vertices[1]).length() > 0.49);
    }

    #[test]
    fn test_buffers_reused_when_count_stable() {
        let mut builder = StripMeshBuilder::new(0.1);
        let ptr = builder.build(&straight(6), 0.0, Vec3::ZERO).vertices.as_ptr();
        let again = builder.build(&straight(6), 1.0, Vec3::ONE).vertices.as_ptr();
        assert_eq!(ptr, again);

        let resized = builder.build(&straight(8), 1.0, Vec3::ZERO);
        assert_eq!(resized.vertices.len(), 28);
    }

    #[test]
    fn test_nan_factor_uses_current() {
        let segments = vec![
            Segment {
                position: Vec3::new(0.0, 1.0, 0.0),
                previous_position: Vec3::ZERO,
            },
            Segment::at(Vec3::new(2.0, 1.0, 0.0)),
        ];
        let mut builder = StripMeshBuilder::new(0.0);
        let mesh = builder.build(&segments, f32::NAN, Vec3::ZERO);
        assert_eq!(mesh.vertices[0], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_byte_views() {
        let mut builder = StripMeshBuilder::new(0.1);
        let mesh = builder.build(&straight(2), 1.0, Vec3::ZERO);
        assert_eq!(mesh.vertex_bytes().len(), 4 * 12);
        assert_eq!(mesh.uv_bytes().len(), 4 * 8);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }
}
