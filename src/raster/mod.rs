//! Triangle rasterization.
//!
//! Two families of fill routines share the same edge-function coverage and
//! reciprocal-depth test:
//!
//! * [`fill_triangle`] dispatches to compile-time-specialized paths for the
//!   common shading combinations (flat/gouraud, colored/textured,
//!   nearest/bilinear).
//! * [`shaded::fill_triangle_shaded`] drives arbitrary per-vertex attribute
//!   lists through a [`shaded::FragmentShader`] for everything else.

mod fill;
pub mod shaded;

pub use shaded::{fill_triangle_shaded, FragmentShader, ShadedVertex};

use crate::framebuffer::Framebuffer;
use crate::math::Vec2;
use crate::texture::Texture;

/// How vertex colors spread across a triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadingMode {
    /// The first vertex's color covers the whole face.
    Flat,
    /// Colors interpolate (perspective-correct) between vertices.
    Gouraud,
}

/// Texture filtering for the textured paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleMode {
    Nearest,
    Bilinear,
}

/// A projected vertex ready for rasterization: viewport-mapped x/y, the
/// view-space w kept for perspective correction, texcoords, and a packed
/// `0xAARRGGBB` lit color.
#[derive(Clone, Copy, Debug)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub uv: Vec2,
    pub color: u32,
}

/// Rasterize one triangle through the specialized path matching the
/// requested modes. `SampleMode` only matters when a texture is present.
pub fn fill_triangle(
    fb: &mut Framebuffer,
    v0: ScreenVertex,
    v1: ScreenVertex,
    v2: ScreenVertex,
    shading: ShadingMode,
    sampling: SampleMode,
    texture: Option<&Texture>,
) {
    use SampleMode::*;
    use ShadingMode::*;

    match (shading, texture.is_some(), sampling) {
        (Flat, false, _) => fill::fill::<false, false, false>(fb, v0, v1, v2, None),
        (Gouraud, false, _) => fill::fill::<true, false, false>(fb, v0, v1, v2, None),
        (Flat, true, Nearest) => fill::fill::<false, true, false>(fb, v0, v1, v2, texture),
        (Flat, true, Bilinear) => fill::fill::<false, true, true>(fb, v0, v1, v2, texture),
        (Gouraud, true, Nearest) => fill::fill::<true, true, false>(fb, v0, v1, v2, texture),
        (Gouraud, true, Bilinear) => fill::fill::<true, true, true>(fb, v0, v1, v2, texture),
    }
}
