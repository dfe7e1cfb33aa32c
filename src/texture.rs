//! RGBA8 textures with nearest and bilinear sampling.

use std::path::Path;

/// A 2D texture stored as tightly packed RGBA8 bytes, row-major, top-left
/// origin.
///
/// Texel addressing wraps with a power-of-two mask, so repeat-wrap is only
/// exact for power-of-two dimensions (the same contract as the texel loop in
/// the rasterizer's fast paths).
pub struct Texture {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u32,
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, BMP, ...), converting to
    /// RGBA8.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
            channels: 4,
        })
    }

    /// Wrap existing RGBA8 bytes. Length must be `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        Self {
            data,
            width,
            height,
            channels: 4,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    #[inline]
    fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Nearest-neighbor sample at normalized UV. Wraps with a power-of-two
    /// mask.
    #[inline]
    pub fn sample_nearest(&self, u: f32, v: f32) -> [u8; 4] {
        let x = (u * self.width as f32) as i32 as u32 & (self.width - 1);
        let y = (v * self.height as f32) as i32 as u32 & (self.height - 1);
        self.texel(x, y)
    }

    /// Bilinear sample at normalized UV: blends the 4 neighboring texels by
    /// the fractional texel offset, per channel, with wrap-around addressing.
    #[inline]
    pub fn sample_bilinear(&self, u: f32, v: f32) -> [u8; 4] {
        let w_mask = self.width - 1;
        let h_mask = self.height - 1;

        let tex_u = u * self.width as f32;
        let tex_v = v * self.height as f32;
        let x0 = tex_u as i32 as u32 & w_mask;
        let y0 = tex_v as i32 as u32 & h_mask;
        let x1 = (x0 + 1) & w_mask;
        let y1 = (y0 + 1) & h_mask;
        let frac_u = tex_u - tex_u.floor();
        let frac_v = tex_v - tex_v.floor();

        let t00 = self.texel(x0, y0);
        let t10 = self.texel(x1, y0);
        let t01 = self.texel(x0, y1);
        let t11 = self.texel(x1, y1);

        let mut out = [0u8; 4];
        for c in 0..4 {
            let top = t00[c] as f32 * (1.0 - frac_u) + t10[c] as f32 * frac_u;
            let bottom = t01[c] as f32 * (1.0 - frac_u) + t11[c] as f32 * frac_u;
            out[c] = (top * (1.0 - frac_v) + bottom * frac_v + 0.5) as u8;
        }
        out
    }

    /// 2x2 checkerboard: white/black over black/white.
    #[cfg(test)]
    pub(crate) fn checkerboard() -> Texture {
        #[rustfmt::skip]
        let data = vec![
            255, 255, 255, 255,   0, 0, 0, 255,
            0, 0, 0, 255,         255, 255, 255, 255,
        ];
        Texture::from_rgba8(2, 2, data)
    }
}
