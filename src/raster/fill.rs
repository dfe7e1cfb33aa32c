//! Specialized triangle fill paths.
//!
//! One const-generic function monomorphizes into the six hot paths:
//! {flat, gouraud} x {colored, textured}, with textured paths further split
//! by {nearest, bilinear}. Everything is interpolated incrementally: each
//! attribute keeps a row-start value and constant x/y deltas, so the inner
//! loop is adds plus one reciprocal per covered pixel.

use crate::colors;
use crate::framebuffer::Framebuffer;
use crate::texture::Texture;

use super::ScreenVertex;

pub(super) fn fill<const GOURAUD: bool, const TEXTURED: bool, const BILINEAR: bool>(
    fb: &mut Framebuffer,
    mut v0: ScreenVertex,
    mut v1: ScreenVertex,
    mut v2: ScreenVertex,
    texture: Option<&Texture>,
) {
    if TEXTURED && texture.is_none() {
        return;
    }

    // Normalize winding so all three edge functions are non-negative inside.
    let mut area = (v2.x - v0.x) * (v1.y - v0.y) - (v2.y - v0.y) * (v1.x - v0.x);
    if area < 0.0 {
        area = -area;
        std::mem::swap(&mut v1, &mut v2);
    }
    if area < 1e-6 {
        return;
    }

    let width = fb.width() as i32;
    let height = fb.height() as i32;

    let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
    let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
    let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(width - 1);
    let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(height - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    let rcp_area = 1.0 / area;
    let rcp_w = [1.0 / v0.w, 1.0 / v1.w, 1.0 / v2.w];

    // Edge-function gradients; edge i is opposite vertex i.
    let dx = [v2.y - v1.y, v0.y - v2.y, v1.y - v0.y];
    let dy = [v1.x - v2.x, v2.x - v0.x, v0.x - v1.x];

    let grad_x = |a: [f32; 3]| rcp_area * (a[0] * dx[0] + a[1] * dx[1] + a[2] * dx[2]);
    let grad_y = |a: [f32; 3]| rcp_area * (a[0] * dy[0] + a[1] * dy[1] + a[2] * dy[2]);

    // Sample point of the top-left covered pixel.
    let px = min_x as f32 + 0.5;
    let py = min_y as f32 + 0.5;
    let mut e_row = [
        (px - v1.x) * (v2.y - v1.y) - (py - v1.y) * (v2.x - v1.x),
        (px - v2.x) * (v0.y - v2.y) - (py - v2.y) * (v0.x - v2.x),
        (px - v0.x) * (v1.y - v0.y) - (py - v0.y) * (v1.x - v0.x),
    ];
    let row_at = |a: [f32; 3], e: [f32; 3]| rcp_area * (a[0] * e[0] + a[1] * e[1] + a[2] * e[2]);

    let depth_dx = grad_x(rcp_w);
    let depth_dy = grad_y(rcp_w);
    let mut depth_row = row_at(rcp_w, e_row);

    // Gouraud color channels, pre-divided by w for perspective correction.
    let channels: [[f32; 3]; 3] = if GOURAUD {
        let verts = [&v0, &v1, &v2];
        let channel = |get: fn(u32) -> u8| {
            [
                get(verts[0].color) as f32 * rcp_w[0],
                get(verts[1].color) as f32 * rcp_w[1],
                get(verts[2].color) as f32 * rcp_w[2],
            ]
        };
        [channel(colors::red), channel(colors::green), channel(colors::blue)]
    } else {
        [[0.0; 3]; 3]
    };
    let rgb_dx = channels.map(grad_x);
    let rgb_dy = channels.map(grad_y);
    let mut rgb_row = channels.map(|c| row_at(c, e_row));

    // Texcoords, also pre-divided by w.
    let us = [
        v0.uv.x * rcp_w[0],
        v1.uv.x * rcp_w[1],
        v2.uv.x * rcp_w[2],
    ];
    let vs = [
        v0.uv.y * rcp_w[0],
        v1.uv.y * rcp_w[1],
        v2.uv.y * rcp_w[2],
    ];
    let (u_dx, u_dy, v_dx, v_dy) = (grad_x(us), grad_y(us), grad_x(vs), grad_y(vs));
    let mut u_row = row_at(us, e_row);
    let mut v_row = row_at(vs, e_row);

    let flat_r = colors::red(v0.color) as i32;
    let flat_g = colors::green(v0.color) as i32;
    let flat_b = colors::blue(v0.color) as i32;

    let (color_buf, depth_buf) = fb.planes_mut();

    let mut row_offset = (min_y * width) as usize;
    for _y in min_y..=max_y {
        let mut e = e_row;
        let mut depth = depth_row;
        let mut rgb = rgb_row;
        let mut u = u_row;
        let mut v = v_row;

        for x in min_x..=max_x {
            let idx = row_offset + x as usize;
            if e[0] >= 0.0 && e[1] >= 0.0 && e[2] >= 0.0 && depth > depth_buf[idx] {
                if TEXTURED {
                    if let Some(tex) = texture {
                        let inv_w = 1.0 / depth;
                        let texel = if BILINEAR {
                            tex.sample_bilinear(u * inv_w, v * inv_w)
                        } else {
                            tex.sample_nearest(u * inv_w, v * inv_w)
                        };
                        // Fully transparent texels leave color and depth alone.
                        if texel[3] != 0x00 {
                            let (vr, vg, vb) = if GOURAUD {
                                (
                                    (rgb[0] * inv_w) as i32,
                                    (rgb[1] * inv_w) as i32,
                                    (rgb[2] * inv_w) as i32,
                                )
                            } else {
                                (flat_r, flat_g, flat_b)
                            };
                            let r = ((texel[0] as i32 * vr) >> 8).clamp(0, 255) as u8;
                            let g = ((texel[1] as i32 * vg) >> 8).clamp(0, 255) as u8;
                            let b = ((texel[2] as i32 * vb) >> 8).clamp(0, 255) as u8;
                            depth_buf[idx] = depth;
                            color_buf[idx] = colors::pack(0xFF, r, g, b);
                        }
                    }
                } else if GOURAUD {
                    let inv_w = 1.0 / depth;
                    let r = ((rgb[0] * inv_w) as i32).clamp(0, 255) as u8;
                    let g = ((rgb[1] * inv_w) as i32).clamp(0, 255) as u8;
                    let b = ((rgb[2] * inv_w) as i32).clamp(0, 255) as u8;
                    depth_buf[idx] = depth;
                    color_buf[idx] = colors::pack(0xFF, r, g, b);
                } else {
                    depth_buf[idx] = depth;
                    color_buf[idx] = v0.color | 0xFF00_0000;
                }
            }

            e[0] += dx[0];
            e[1] += dx[1];
            e[2] += dx[2];
            depth += depth_dx;
            if GOURAUD {
                rgb[0] += rgb_dx[0];
                rgb[1] += rgb_dx[1];
                rgb[2] += rgb_dx[2];
            }
            if TEXTURED {
                u += u_dx;
                v += v_dx;
            }
        }

        e_row[0] += dy[0];
        e_row[1] += dy[1];
        e_row[2] += dy[2];
        depth_row += depth_dy;
        if GOURAUD {
            rgb_row[0] += rgb_dy[0];
            rgb_row[1] += rgb_dy[1];
            rgb_row[2] += rgb_dy[2];
        }
        if TEXTURED {
            u_row += u_dy;
            v_row += v_dy;
        }
        row_offset += width as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::super::{fill_triangle, SampleMode, ScreenVertex, ShadingMode};
    use crate::colors;
    use crate::framebuffer::Framebuffer;
    use crate::math::Vec2;
    use crate::texture::Texture;
    use approx::assert_relative_eq;

    fn vert(x: f32, y: f32, w: f32, color: u32) -> ScreenVertex {
        ScreenVertex {
            x,
            y,
            w,
            uv: Vec2::ZERO,
            color,
        }
    }

    fn uv_vert(x: f32, y: f32, w: f32, u: f32, v: f32) -> ScreenVertex {
        ScreenVertex {
            x,
            y,
            w,
            uv: Vec2::new(u, v),
            color: colors::WHITE,
        }
    }

    #[test]
    fn flat_red_triangle_covers_expected_pixels() {
        let mut fb = Framebuffer::new(20, 20);
        fb.clear(colors::BACKGROUND);
        fb.clear_depth();

        fill_triangle(
            &mut fb,
            vert(0.0, 0.0, 1.0, colors::RED),
            vert(10.0, 0.0, 1.0, colors::RED),
            vert(0.0, 10.0, 1.0, colors::RED),
            ShadingMode::Flat,
            SampleMode::Nearest,
            None,
        );

        // Pixel centers with x + y <= 8 are strictly inside the hypotenuse.
        for y in 0..8 {
            for x in 0..(8 - y) {
                assert_eq!(fb.pixel(x, y), Some(colors::RED), "pixel ({x},{y})");
                assert_relative_eq!(fb.depth_at(x, y).unwrap(), 1.0, epsilon = 1e-5);
            }
        }
        // Outside the triangle nothing is written.
        assert_eq!(fb.pixel(15, 15), Some(colors::BACKGROUND));
        assert_eq!(fb.depth_at(15, 15), Some(0.0));
    }

    #[test]
    fn degenerate_triangle_writes_nothing() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(colors::BACKGROUND);
        fb.clear_depth();

        fill_triangle(
            &mut fb,
            vert(0.0, 0.0, 1.0, colors::RED),
            vert(2.0, 2.0, 1.0, colors::RED),
            vert(4.0, 4.0, 1.0, colors::RED),
            ShadingMode::Flat,
            SampleMode::Nearest,
            None,
        );

        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(fb.pixel(x, y), Some(colors::BACKGROUND));
            }
        }
    }

    #[test]
    fn winding_does_not_change_coverage() {
        let mut a = Framebuffer::new(16, 16);
        let mut b = Framebuffer::new(16, 16);
        for fb in [&mut a, &mut b] {
            fb.clear(colors::BACKGROUND);
            fb.clear_depth();
        }

        let (v0, v1, v2) = (
            vert(1.0, 1.0, 1.0, colors::GREEN),
            vert(12.0, 3.0, 1.0, colors::GREEN),
            vert(4.0, 13.0, 1.0, colors::GREEN),
        );
        fill_triangle(&mut a, v0, v1, v2, ShadingMode::Flat, SampleMode::Nearest, None);
        fill_triangle(&mut b, v0, v2, v1, ShadingMode::Flat, SampleMode::Nearest, None);

        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(a.pixel(x, y), b.pixel(x, y), "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn depth_test_is_order_independent() {
        let near = [
            vert(0.0, 0.0, 1.0, colors::RED),
            vert(12.0, 0.0, 1.0, colors::RED),
            vert(0.0, 12.0, 1.0, colors::RED),
        ];
        let far = [
            vert(0.0, 0.0, 2.0, colors::BLUE),
            vert(12.0, 0.0, 2.0, colors::BLUE),
            vert(0.0, 12.0, 2.0, colors::BLUE),
        ];

        let draw = |first: &[ScreenVertex; 3], second: &[ScreenVertex; 3]| {
            let mut fb = Framebuffer::new(16, 16);
            fb.clear(colors::BACKGROUND);
            fb.clear_depth();
            for tri in [first, second] {
                fill_triangle(
                    &mut fb,
                    tri[0],
                    tri[1],
                    tri[2],
                    ShadingMode::Flat,
                    SampleMode::Nearest,
                    None,
                );
            }
            fb
        };

        let near_first = draw(&near, &far);
        let far_first = draw(&far, &near);
        assert_eq!(near_first.pixel(2, 2), Some(colors::RED));
        assert_eq!(far_first.pixel(2, 2), Some(colors::RED));
    }

    #[test]
    fn gouraud_uniform_color_fills_flat() {
        let mut fb = Framebuffer::new(16, 16);
        fb.clear(colors::BACKGROUND);
        fb.clear_depth();

        fill_triangle(
            &mut fb,
            vert(0.0, 0.0, 1.0, colors::GREEN),
            vert(12.0, 0.0, 1.0, colors::GREEN),
            vert(0.0, 12.0, 1.0, colors::GREEN),
            ShadingMode::Gouraud,
            SampleMode::Nearest,
            None,
        );

        assert_eq!(fb.pixel(1, 1), Some(colors::GREEN));
        assert_eq!(fb.pixel(4, 4), Some(colors::GREEN));
    }

    #[test]
    fn transparent_texels_are_skipped() {
        // 1x1 fully transparent texture.
        let tex = Texture::from_rgba8(1, 1, vec![255, 255, 255, 0]);
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(colors::BACKGROUND);
        fb.clear_depth();

        fill_triangle(
            &mut fb,
            uv_vert(0.0, 0.0, 1.0, 0.0, 0.0),
            uv_vert(8.0, 0.0, 1.0, 1.0, 0.0),
            uv_vert(0.0, 8.0, 1.0, 0.0, 1.0),
            ShadingMode::Flat,
            SampleMode::Nearest,
            Some(&tex),
        );

        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(fb.pixel(x, y), Some(colors::BACKGROUND));
                assert_eq!(fb.depth_at(x, y), Some(0.0));
            }
        }
    }

    #[test]
    fn texture_sampling_is_perspective_correct() {
        // A 2x2 checkerboard mapped across a triangle whose right vertex is
        // four times farther away. At screen midpoint the affine texcoord
        // would land on the dark texel; the corrected one stays on the light
        // texel nearer the close vertex.
        let tex = Texture::checkerboard();
        let mut fb = Framebuffer::new(24, 24);
        fb.clear(colors::BACKGROUND);
        fb.clear_depth();

        fill_triangle(
            &mut fb,
            uv_vert(0.0, 0.0, 1.0, 0.0, 0.0),
            uv_vert(20.0, 0.0, 4.0, 1.0, 0.0),
            uv_vert(0.0, 20.0, 1.0, 0.0, 0.0),
            ShadingMode::Flat,
            SampleMode::Nearest,
            Some(&tex),
        );

        // Affine u at x=10.5 would be ~0.52 -> texel 1 (dark). The corrected
        // u is ~0.22 -> texel 0 (light).
        let c = fb.pixel(10, 2).unwrap();
        assert!(colors::red(c) > 200, "expected light texel, got {c:#010x}");
    }
}
