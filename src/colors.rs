//! Packed color helpers.
//!
//! All packed colors in this crate use the `0xAARRGGBB` byte order: alpha in
//! the most significant byte, then red, green, blue. The same order is used
//! by the clipper's interpolation, the rasterizer's writes, and the bytes
//! handed to the present layer (SDL2 ARGB8888).

use crate::math::vec3::Vec3;

pub const BACKGROUND: u32 = 0xFF222222;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const RED: u32 = 0xFFFF0000;
pub const GREEN: u32 = 0xFF00FF00;
pub const BLUE: u32 = 0xFF0000FF;

#[inline]
pub const fn pack(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Pack an RGB triple in [0, 1] with full alpha, clamping out-of-range values.
#[inline]
pub fn pack_rgb(c: Vec3) -> u32 {
    let r = (c.x.clamp(0.0, 1.0) * 255.0) as u8;
    let g = (c.y.clamp(0.0, 1.0) * 255.0) as u8;
    let b = (c.z.clamp(0.0, 1.0) * 255.0) as u8;
    pack(0xFF, r, g, b)
}

#[inline]
pub const fn alpha(c: u32) -> u8 {
    (c >> 24) as u8
}

#[inline]
pub const fn red(c: u32) -> u8 {
    (c >> 16) as u8
}

#[inline]
pub const fn green(c: u32) -> u8 {
    (c >> 8) as u8
}

#[inline]
pub const fn blue(c: u32) -> u8 {
    c as u8
}

/// Linearly interpolate two packed colors, per byte channel (alpha included).
#[inline]
pub fn lerp(c1: u32, c2: u32, t: f32) -> u32 {
    let ch = |a: u8, b: u8| -> u8 { (a as f32 + (b as f32 - a as f32) * t) as u8 };
    pack(
        ch(alpha(c1), alpha(c2)),
        ch(red(c1), red(c2)),
        ch(green(c1), green(c2)),
        ch(blue(c1), blue(c2)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_is_argb_ordered() {
        assert_eq!(pack(0xAA, 0xBB, 0xCC, 0xDD), 0xAABBCCDD);
        assert_eq!(red(RED), 0xFF);
        assert_eq!(green(RED), 0x00);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(RED, BLUE, 0.0), RED);
        assert_eq!(lerp(RED, BLUE, 1.0), BLUE);
        let mid = lerp(pack(0xFF, 0, 0, 0), pack(0xFF, 200, 100, 50), 0.5);
        assert_eq!(red(mid), 100);
        assert_eq!(green(mid), 50);
        assert_eq!(blue(mid), 25);
        assert_eq!(alpha(mid), 0xFF);
    }

    #[test]
    fn pack_rgb_clamps() {
        assert_eq!(pack_rgb(Vec3::new(2.0, -1.0, 1.0)), 0xFFFF00FF);
    }
}
