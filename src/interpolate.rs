//! Perspective-correct incremental attribute interpolation.
//!
//! For each attribute of a screen-space triangle this module produces a
//! row-start value plus constant per-pixel x/y increments, derived from the
//! three edge-function gradients and the reciprocal triangle area — the same
//! scheme the specialized rasterizer paths hand-unroll. A perspective-correct
//! attribute is interpolated as `value / w` and recovered at sample time by
//! multiplying with the interpolated `w` (one reciprocal per pixel, shared by
//! every attribute).

use crate::colors;
use crate::math::{Vec2, Vec3, Vec4};

/// Type tag for a closed set of interpolatable payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    /// Packed `0xAARRGGBB`; interpolated per channel in [0, 255] floats.
    Color,
}

/// One attribute value at one vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Attribute {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Color(u32),
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Scalar(_) => AttributeKind::Scalar,
            Attribute::Vec2(_) => AttributeKind::Vec2,
            Attribute::Vec3(_) => AttributeKind::Vec3,
            Attribute::Vec4(_) => AttributeKind::Vec4,
            Attribute::Color(_) => AttributeKind::Color,
        }
    }

    pub fn components(&self) -> usize {
        match self {
            Attribute::Scalar(_) => 1,
            Attribute::Vec2(_) => 2,
            Attribute::Vec3(_) => 3,
            Attribute::Vec4(_) | Attribute::Color(_) => 4,
        }
    }

    fn to_components(self) -> [f32; 4] {
        match self {
            Attribute::Scalar(s) => [s, 0.0, 0.0, 0.0],
            Attribute::Vec2(v) => [v.x, v.y, 0.0, 0.0],
            Attribute::Vec3(v) => [v.x, v.y, v.z, 0.0],
            Attribute::Vec4(v) => [v.x, v.y, v.z, v.w],
            Attribute::Color(c) => [
                colors::red(c) as f32,
                colors::green(c) as f32,
                colors::blue(c) as f32,
                colors::alpha(c) as f32,
            ],
        }
    }

    fn from_components(kind: AttributeKind, c: [f32; 4]) -> Self {
        match kind {
            AttributeKind::Scalar => Attribute::Scalar(c[0]),
            AttributeKind::Vec2 => Attribute::Vec2(Vec2::new(c[0], c[1])),
            AttributeKind::Vec3 => Attribute::Vec3(Vec3::new(c[0], c[1], c[2])),
            AttributeKind::Vec4 => Attribute::Vec4(Vec4::new(c[0], c[1], c[2], c[3])),
            AttributeKind::Color => Attribute::Color(colors::pack(
                c[3].clamp(0.0, 255.0) as u8,
                c[0].clamp(0.0, 255.0) as u8,
                c[1].clamp(0.0, 255.0) as u8,
                c[2].clamp(0.0, 255.0) as u8,
            )),
        }
    }
}

/// One shading channel of a vertex: a value plus its correction mode.
#[derive(Clone, Copy, Debug)]
pub struct FragmentAttribute {
    pub value: Attribute,
    /// When set, the attribute is pre-divided by its vertex w and recovered
    /// with the pixel's interpolated w. Affine otherwise.
    pub perspective: bool,
}

impl FragmentAttribute {
    pub fn perspective(value: Attribute) -> Self {
        Self {
            value,
            perspective: true,
        }
    }

    pub fn affine(value: Attribute) -> Self {
        Self {
            value,
            perspective: false,
        }
    }
}

/// The ordered attribute list of one vertex. All three vertices of a
/// triangle must carry the same sequence of kinds and correction flags.
pub type VertexAttributes = Vec<FragmentAttribute>;

/// Debug-build check that three vertices carry an identical attribute layout.
pub fn debug_validate_layout(a: &VertexAttributes, b: &VertexAttributes, c: &VertexAttributes) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), c.len());
    for i in 0..a.len() {
        debug_assert_eq!(a[i].value.kind(), b[i].value.kind());
        debug_assert_eq!(a[i].value.kind(), c[i].value.kind());
        debug_assert_eq!(a[i].perspective, b[i].perspective);
        debug_assert_eq!(a[i].perspective, c[i].perspective);
    }
}

/// Per-triangle interpolation setup: edge-function gradients, reciprocal
/// area, and per-vertex reciprocal w. Computed once per triangle and shared
/// by every attribute interpolator.
pub struct TriangleBasis {
    x: [f32; 3],
    y: [f32; 3],
    /// Per-edge x gradient of the three edge functions.
    pub dx: [f32; 3],
    /// Per-edge y gradient of the three edge functions.
    pub dy: [f32; 3],
    pub rcp_area: f32,
    pub rcp_w: [f32; 3],
}

impl TriangleBasis {
    /// Build the basis from three screen-space vertices `(x, y, w)`.
    ///
    /// Vertices must already be wound so the signed area is positive (the
    /// rasterizer normalizes winding before this point). Returns `None` for
    /// near-zero area.
    pub fn new(v0: (f32, f32, f32), v1: (f32, f32, f32), v2: (f32, f32, f32)) -> Option<Self> {
        let (x0, y0, w0) = v0;
        let (x1, y1, w1) = v1;
        let (x2, y2, w2) = v2;

        let area = (x2 - x0) * (y1 - y0) - (y2 - y0) * (x1 - x0);
        if area.abs() < 1e-6 {
            return None;
        }

        Some(Self {
            x: [x0, x1, x2],
            y: [y0, y1, y2],
            dx: [y2 - y1, y0 - y2, y1 - y0],
            dy: [x1 - x2, x2 - x0, x0 - x1],
            rcp_area: 1.0 / area,
            rcp_w: [1.0 / w0, 1.0 / w1, 1.0 / w2],
        })
    }

    /// The three edge-function values at an arbitrary sample point.
    /// All non-negative exactly when the point is inside the triangle.
    #[inline]
    pub fn edge_values(&self, px: f32, py: f32) -> [f32; 3] {
        let [x0, x1, x2] = self.x;
        let [y0, y1, y2] = self.y;
        [
            (px - x1) * (y2 - y1) - (py - y1) * (x2 - x1),
            (px - x2) * (y0 - y2) - (py - y2) * (x0 - x2),
            (px - x0) * (y1 - y0) - (py - y0) * (x1 - x0),
        ]
    }

    /// Interpolator for reciprocal depth (1/w), used for the depth test and
    /// for recovering perspective-correct attributes.
    pub fn rcp_depth(&self, start_x: f32, start_y: f32) -> Interpolator {
        Interpolator::from_components(
            self,
            [
                [self.rcp_w[0], 0.0, 0.0, 0.0],
                [self.rcp_w[1], 0.0, 0.0, 0.0],
                [self.rcp_w[2], 0.0, 0.0, 0.0],
            ],
            AttributeKind::Scalar,
            1,
            false,
            start_x,
            start_y,
        )
    }
}

/// Incremental interpolation state for one attribute across one triangle.
///
/// Holds the value at the current pixel, the value at the current row start,
/// and the constant x/y increments. Stepping is a handful of adds per pixel;
/// nothing is recomputed from the edge functions.
pub struct Interpolator {
    kind: AttributeKind,
    components: usize,
    perspective: bool,
    dx: [f32; 4],
    dy: [f32; 4],
    row: [f32; 4],
    value: [f32; 4],
    // prepared (possibly w-divided) per-vertex components, kept for value_at
    prepared: [[f32; 4]; 3],
}

impl Interpolator {
    /// Build the interpolator for one attribute slot, with the running value
    /// positioned at the sample point `(start_x, start_y)`.
    pub fn new(
        basis: &TriangleBasis,
        values: [Attribute; 3],
        perspective: bool,
        start_x: f32,
        start_y: f32,
    ) -> Self {
        debug_assert_eq!(values[0].kind(), values[1].kind());
        debug_assert_eq!(values[0].kind(), values[2].kind());

        let kind = values[0].kind();
        let components = values[0].components();
        let raw = [
            values[0].to_components(),
            values[1].to_components(),
            values[2].to_components(),
        ];
        Self::from_components(basis, raw, kind, components, perspective, start_x, start_y)
    }

    fn from_components(
        basis: &TriangleBasis,
        raw: [[f32; 4]; 3],
        kind: AttributeKind,
        components: usize,
        perspective: bool,
        start_x: f32,
        start_y: f32,
    ) -> Self {
        let mut prepared = raw;
        if perspective {
            for (vert, rcp_w) in prepared.iter_mut().zip(basis.rcp_w) {
                for c in vert.iter_mut() {
                    *c *= rcp_w;
                }
            }
        }

        let mut dx = [0.0f32; 4];
        let mut dy = [0.0f32; 4];
        for c in 0..components {
            dx[c] = basis.rcp_area
                * (prepared[0][c] * basis.dx[0]
                    + prepared[1][c] * basis.dx[1]
                    + prepared[2][c] * basis.dx[2]);
            dy[c] = basis.rcp_area
                * (prepared[0][c] * basis.dy[0]
                    + prepared[1][c] * basis.dy[1]
                    + prepared[2][c] * basis.dy[2]);
        }

        let mut interp = Self {
            kind,
            components,
            perspective,
            dx,
            dy,
            row: [0.0; 4],
            value: [0.0; 4],
            prepared,
        };
        interp.row = interp.value_at(basis, start_x, start_y);
        interp.value = interp.row;
        interp
    }

    /// Evaluate the (pre-divided, not yet recovered) interpolated components
    /// directly at an arbitrary sample point.
    pub fn value_at(&self, basis: &TriangleBasis, px: f32, py: f32) -> [f32; 4] {
        let e = basis.edge_values(px, py);
        let mut out = [0.0f32; 4];
        for (c, slot) in out.iter_mut().enumerate().take(self.components) {
            *slot = basis.rcp_area
                * (self.prepared[0][c] * e[0]
                    + self.prepared[1][c] * e[1]
                    + self.prepared[2][c] * e[2]);
        }
        out
    }

    /// Advance one pixel to the right.
    #[inline]
    pub fn step_x(&mut self) {
        for c in 0..self.components {
            self.value[c] += self.dx[c];
        }
    }

    /// Advance the row start one pixel down and reset the running value.
    #[inline]
    pub fn step_y(&mut self) {
        for c in 0..self.components {
            self.row[c] += self.dy[c];
            self.value[c] = self.row[c];
        }
    }

    /// Raw interpolated components at the current pixel (still divided by w
    /// for perspective attributes).
    #[inline]
    pub fn raw(&self) -> &[f32; 4] {
        &self.value
    }

    /// Recover the attribute at the current pixel. `w` is the reciprocal of
    /// the pixel's interpolated reciprocal-depth, shared across attributes.
    #[inline]
    pub fn sample(&self, w: f32) -> Attribute {
        let mut c = self.value;
        if self.perspective {
            for v in c.iter_mut().take(self.components) {
                *v *= w;
            }
        }
        Attribute::from_components(self.kind, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn basis() -> TriangleBasis {
        // Positive area ordering for these coordinates is (0,0), (0,10), (10,0).
        TriangleBasis::new((0.0, 0.0, 1.0), (0.0, 10.0, 2.0), (10.0, 0.0, 4.0)).unwrap()
    }

    #[test]
    fn degenerate_triangle_has_no_basis() {
        assert!(TriangleBasis::new((0.0, 0.0, 1.0), (5.0, 5.0, 1.0), (10.0, 10.0, 1.0)).is_none());
    }

    #[test]
    fn interpolation_is_exact_at_vertices() {
        let b = basis();
        let values = [
            Attribute::Vec2(Vec2::new(0.0, 0.0)),
            Attribute::Vec2(Vec2::new(0.0, 1.0)),
            Attribute::Vec2(Vec2::new(1.0, 0.0)),
        ];
        let interp = Interpolator::new(&b, values, true, 0.0, 0.0);

        for (i, expected) in values.iter().enumerate() {
            let raw = interp.value_at(&b, b.x[i], b.y[i]);
            // recover with the analytically known w at this vertex
            let w = 1.0 / b.rcp_w[i];
            let Attribute::Vec2(src) = expected else { unreachable!() };
            assert_relative_eq!(raw[0] * w, src.x, epsilon = 1e-4);
            assert_relative_eq!(raw[1] * w, src.y, epsilon = 1e-4);
        }
    }

    #[test]
    fn incremental_stepping_matches_direct_evaluation() {
        let b = basis();
        let values = [
            Attribute::Scalar(0.25),
            Attribute::Scalar(0.5),
            Attribute::Scalar(1.0),
        ];
        let mut interp = Interpolator::new(&b, values, true, 0.5, 0.5);

        interp.step_x();
        interp.step_x();
        interp.step_y();
        let marched = interp.raw()[0];

        // After two x-steps and one y-step the row has reset x to the start.
        let direct = interp.value_at(&b, 0.5, 1.5)[0];
        assert_relative_eq!(marched, direct, epsilon = 1e-5);
    }

    #[test]
    fn perspective_and_affine_disagree_when_w_varies() {
        let b = basis();
        let uv = [
            Attribute::Scalar(0.0),
            Attribute::Scalar(0.0),
            Attribute::Scalar(1.0),
        ];
        let persp = Interpolator::new(&b, uv, true, 0.0, 0.0);
        let affine = Interpolator::new(&b, uv, false, 0.0, 0.0);

        // Midpoint of the w=1 / w=4 edge.
        let (mx, my) = (5.0, 0.0);
        let rcp_depth = b.rcp_depth(mx, my).raw()[0];
        let w = 1.0 / rcp_depth;

        let corrected = persp.value_at(&b, mx, my)[0] * w;
        let uncorrected = affine.value_at(&b, mx, my)[0];

        // u/w interpolates to 0.125, 1/w to 0.625: u = 0.2 exactly.
        assert_relative_eq!(corrected, 0.2, epsilon = 1e-4);
        assert_relative_eq!(uncorrected, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn color_attributes_round_trip_per_channel() {
        let b = basis();
        let c = crate::colors::pack(0xFF, 200, 100, 50);
        let interp = Interpolator::new(
            &b,
            [
                Attribute::Color(c),
                Attribute::Color(c),
                Attribute::Color(c),
            ],
            false,
            0.5,
            0.5,
        );
        assert_eq!(interp.sample(1.0), Attribute::Color(c));
    }
}
