//! Minimal vector/matrix arithmetic for the rendering pipeline.
//!
//! Column-vector matrix convention, left-handed coordinates. The renderer treats these
//! types as plain arithmetic primitives; nothing here knows about pixels.

pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
