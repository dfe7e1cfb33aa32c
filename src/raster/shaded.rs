//! Generic rasterization path with a per-fragment callback.
//!
//! Where the specialized paths hard-code "uv + color", this path carries an
//! arbitrary ordered attribute list per vertex through the incremental
//! interpolation engine and hands the recovered values to a
//! [`FragmentShader`]. It is the slow path; the pipeline only takes it when
//! a custom shader is installed.

use crate::colors;
use crate::framebuffer::Framebuffer;
use crate::interpolate::{self, Attribute, Interpolator, TriangleBasis, VertexAttributes};

/// Computes the packed `0xAARRGGBB` color of one fragment.
///
/// `attributes` follows the vertex attribute order; perspective-flagged
/// entries arrive already corrected. Returning a color with zero alpha
/// leaves the pixel (and its depth) untouched.
pub trait FragmentShader {
    fn shade(&self, attributes: &[Attribute], rcp_depth: f32) -> u32;
}

impl<F> FragmentShader for F
where
    F: Fn(&[Attribute], f32) -> u32,
{
    fn shade(&self, attributes: &[Attribute], rcp_depth: f32) -> u32 {
        self(attributes, rcp_depth)
    }
}

/// A projected vertex plus its attribute list for the generic path.
#[derive(Clone, Debug)]
pub struct ShadedVertex {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub attributes: VertexAttributes,
}

/// Rasterize one triangle, invoking `shader` for every covered pixel that
/// passes the depth test.
pub fn fill_triangle_shaded(
    fb: &mut Framebuffer,
    mut v0: ShadedVertex,
    mut v1: ShadedVertex,
    mut v2: ShadedVertex,
    shader: &dyn FragmentShader,
) {
    interpolate::debug_validate_layout(&v0.attributes, &v1.attributes, &v2.attributes);

    // Winding normalization swaps whole vertices so attributes stay with
    // their positions.
    let area = (v2.x - v0.x) * (v1.y - v0.y) - (v2.y - v0.y) * (v1.x - v0.x);
    if area < 0.0 {
        std::mem::swap(&mut v1, &mut v2);
    }
    let basis = match TriangleBasis::new(
        (v0.x, v0.y, v0.w),
        (v1.x, v1.y, v1.w),
        (v2.x, v2.y, v2.w),
    ) {
        Some(b) => b,
        None => return,
    };

    let width = fb.width() as i32;
    let height = fb.height() as i32;

    let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
    let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
    let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(width - 1);
    let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(height - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    let start_x = min_x as f32 + 0.5;
    let start_y = min_y as f32 + 0.5;

    let mut depth = basis.rcp_depth(start_x, start_y);
    let mut interpolators: Vec<Interpolator> = (0..v0.attributes.len())
        .map(|i| {
            Interpolator::new(
                &basis,
                [
                    v0.attributes[i].value,
                    v1.attributes[i].value,
                    v2.attributes[i].value,
                ],
                v0.attributes[i].perspective,
                start_x,
                start_y,
            )
        })
        .collect();

    let mut e_row = basis.edge_values(start_x, start_y);
    let mut fragment: Vec<Attribute> = Vec::with_capacity(interpolators.len());

    let (color_buf, depth_buf) = fb.planes_mut();

    let mut row_offset = (min_y * width) as usize;
    for _y in min_y..=max_y {
        let mut e = e_row;

        for x in min_x..=max_x {
            let idx = row_offset + x as usize;
            let rcp_depth = depth.raw()[0];
            if e[0] >= 0.0 && e[1] >= 0.0 && e[2] >= 0.0 && rcp_depth > depth_buf[idx] {
                let w = 1.0 / rcp_depth;
                fragment.clear();
                fragment.extend(interpolators.iter().map(|interp| interp.sample(w)));

                let color = shader.shade(&fragment, rcp_depth);
                if colors::alpha(color) != 0x00 {
                    depth_buf[idx] = rcp_depth;
                    color_buf[idx] = color;
                }
            }

            e[0] += basis.dx[0];
            e[1] += basis.dx[1];
            e[2] += basis.dx[2];
            depth.step_x();
            for interp in interpolators.iter_mut() {
                interp.step_x();
            }
        }

        e_row[0] += basis.dy[0];
        e_row[1] += basis.dy[1];
        e_row[2] += basis.dy[2];
        depth.step_y();
        for interp in interpolators.iter_mut() {
            interp.step_y();
        }
        row_offset += width as usize;
    }
}
