//! The vertex format shared by meshes, the clipper, and the rasterizer.

use crate::colors;
use crate::math::{Vec2, Vec3};

/// A single mesh vertex.
///
/// The layout is the crate's binary vertex contract: position (12 bytes),
/// normal (12 bytes), texcoord (8 bytes), packed `0xAARRGGBB` color (4
/// bytes). Source vertices are never mutated in place; transforms and
/// clipping always produce new values.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
    pub color: u32,
}

impl Vertex {
    pub const fn new(position: Vec3, normal: Vec3, texcoord: Vec2, color: u32) -> Self {
        Self {
            position,
            normal,
            texcoord,
            color,
        }
    }

    /// Linearly interpolate every attribute between two vertices.
    /// Used when a polygon edge crosses a clipping plane.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            normal: self.normal.lerp(other.normal, t),
            texcoord: self.texcoord.lerp(other.texcoord, t),
            color: colors::lerp(self.color, other.color, t),
        }
    }
}
