//! A CPU-based 3D triangle renderer.
//!
//! Geometry is transformed, lit, clipped against the view frustum, and
//! rasterized with perspective-correct attribute interpolation, entirely on
//! the CPU. SDL2 is used only to present the finished framebuffer.
//!
//! # Quick Start
//!
//! ```ignore
//! use rastly::prelude::*;
//!
//! let mut ctx = RenderContext::new(800, 600,
//!     Projection::from_degrees(70.0, 800.0 / 600.0, 0.1, 100.0));
//! ctx.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
//! ctx.begin_frame(colors::BACKGROUND);
//! ctx.draw_mesh(&Mesh::cube());
//! ```

pub mod clipping;
pub mod colors;
pub mod framebuffer;
pub mod interpolate;
pub mod light;
pub mod material;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod raster;
pub mod texture;
pub mod transform;
pub mod vertex;
pub mod window;

pub use mesh::{LoadError, Mesh};
pub use pipeline::{RenderContext, RenderMode};
pub use projection::Projection;
pub use raster::{SampleMode, ShadingMode};
pub use transform::Transform;
pub use vertex::Vertex;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::colors;
    pub use crate::framebuffer::Framebuffer;
    pub use crate::light::DirectionalLight;
    pub use crate::material::{Material, MaterialManager};
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};
    pub use crate::mesh::{Mesh, Submesh};
    pub use crate::pipeline::{RenderContext, RenderMode};
    pub use crate::projection::Projection;
    pub use crate::raster::{SampleMode, ShadingMode};
    pub use crate::texture::Texture;
    pub use crate::transform::Transform;
    pub use crate::vertex::Vertex;
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}
