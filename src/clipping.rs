//! View-space frustum clipping.
//!
//! Triangles are clipped against the six view-space frustum planes with the
//! Sutherland-Hodgman algorithm before projection, so no vertex with w <= 0
//! ever reaches the perspective divide. Planes are defined by a point and an
//! inward-facing normal; the side the normal points to is "inside".

use crate::math::vec3::Vec3;
use crate::vertex::Vertex;

/// Hard cap on clipped polygon size. A triangle clipped against six planes
/// can gain at most one vertex per plane, so 10 slots cover 3 + 6 with one
/// spare; anything beyond is silently dropped (capacity fault, not an
/// error).
pub const MAX_POLYGON_VERTICES: usize = 10;

/// A clipping plane defined by a point on the plane and its normal.
/// The normal points toward the inside (visible) half-space.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub const fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Signed distance from a point to this plane.
    /// Positive = inside (same side as normal), negative = outside.
    #[inline]
    pub fn signed_distance(&self, position: Vec3) -> f32 {
        (position - self.point).dot(self.normal)
    }
}

/// A convex polygon with a fixed vertex capacity.
///
/// Used as the intermediate representation while clipping one triangle.
/// Lives entirely on the stack; no allocation per primitive.
#[derive(Clone, Copy)]
pub struct Polygon {
    vertices: [Vertex; MAX_POLYGON_VERTICES],
    len: usize,
}

impl Polygon {
    pub fn from_triangle(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        let mut p = Self {
            vertices: [v0; MAX_POLYGON_VERTICES],
            len: 3,
        };
        p.vertices[1] = v1;
        p.vertices[2] = v2;
        p
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// True when clipping has reduced the polygon below a renderable triangle.
    pub fn is_degenerate(&self) -> bool {
        self.len < 3
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices[..self.len]
    }

    fn empty() -> Self {
        Self {
            vertices: [Vertex::new(Vec3::ZERO, Vec3::ZERO, crate::math::Vec2::ZERO, 0);
                MAX_POLYGON_VERTICES],
            len: 0,
        }
    }

    // Pushes beyond capacity are dropped silently.
    #[inline]
    fn push(&mut self, v: Vertex) {
        if self.len < MAX_POLYGON_VERTICES {
            self.vertices[self.len] = v;
            self.len += 1;
        }
    }

    /// Clip this polygon against a single plane (Sutherland-Hodgman).
    ///
    /// Walks each edge prev->current cyclically: an inside vertex is kept,
    /// and whenever the edge crosses the plane the intersection vertex is
    /// synthesized at `t = d1 / (d1 - d2)` with every attribute lerped.
    pub fn clip_against_plane(&self, plane: &Plane) -> Self {
        let mut output = Self::empty();

        for i in 0..self.len {
            let current = &self.vertices[i];
            let prev = &self.vertices[(i + self.len - 1) % self.len];

            let d_current = plane.signed_distance(current.position);
            let d_prev = plane.signed_distance(prev.position);

            let current_inside = d_current >= 0.0;
            let prev_inside = d_prev >= 0.0;

            if current_inside {
                if !prev_inside {
                    let t = d_prev / (d_prev - d_current);
                    output.push(prev.lerp(current, t));
                }
                output.push(*current);
            } else if prev_inside {
                let t = d_prev / (d_prev - d_current);
                output.push(prev.lerp(current, t));
            }
            // both outside: emit nothing
        }

        output
    }

    /// Fan-triangulate: vertex 0 paired with each consecutive edge.
    /// Assumes convexity, which clipping preserves.
    pub fn triangulate(&self) -> impl Iterator<Item = (&Vertex, &Vertex, &Vertex)> {
        (1..self.len.saturating_sub(1))
            .map(move |i| (&self.vertices[0], &self.vertices[i], &self.vertices[i + 1]))
    }
}

/// The six view-space frustum planes, rebuilt only when the projection
/// parameters change and immutable during a frame.
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Build the frustum from projection parameters.
    ///
    /// Side-plane normals come from the half [field of view] angles; the
    /// horizontal FOV is derived from the vertical one and the aspect ratio.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near`, `z_far` - Clip distances along +Z (view space)
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        let fov_x = 2.0 * (aspect_ratio * (fov_y / 2.0).tan()).atan();
        let (sin_hx, cos_hx) = (fov_x / 2.0).sin_cos();
        let (sin_hy, cos_hy) = (fov_y / 2.0).sin_cos();
        let origin = Vec3::ZERO;

        Self {
            planes: [
                Plane::new(origin, Vec3::new(cos_hx, 0.0, sin_hx)),
                Plane::new(origin, Vec3::new(-cos_hx, 0.0, sin_hx)),
                Plane::new(origin, Vec3::new(0.0, -cos_hy, sin_hy)),
                Plane::new(origin, Vec3::new(0.0, cos_hy, sin_hy)),
                Plane::new(Vec3::new(0.0, 0.0, z_near), Vec3::new(0.0, 0.0, 1.0)),
                Plane::new(Vec3::new(0.0, 0.0, z_far), Vec3::new(0.0, 0.0, -1.0)),
            ],
        }
    }

    /// Clip a polygon against all six planes sequentially.
    ///
    /// A polygon fully outside any one plane collapses to zero vertices and
    /// the remaining planes are skipped.
    pub fn clip_polygon(&self, polygon: Polygon) -> Polygon {
        let mut result = polygon;

        for plane in &self.planes {
            if result.is_degenerate() {
                break;
            }
            result = result.clip_against_plane(plane);
        }

        result
    }
}
