//! Color and reciprocal-depth buffers.

use crate::colors;

/// The render target: a packed `0xAARRGGBB` color buffer and a reciprocal
/// depth buffer, both row-major and owned exclusively by the render context.
///
/// # Depth buffer
///
/// Depth is stored as 1/w (reciprocal of clip-space w), which interpolates
/// linearly in screen space. Larger values are nearer, so the buffer clears
/// to 0.0 ("infinitely far") and the test is "strictly greater wins".
pub struct Framebuffer {
    color: Vec<u32>,
    depth: Vec<f32>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color: vec![colors::BACKGROUND; size],
            depth: vec![0.0; size],
            width,
            height,
        }
    }

    /// Reallocate both buffers. Only called on init/resize, never mid-frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.color = vec![colors::BACKGROUND; size];
        self.depth = vec![0.0; size];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color.fill(color);
    }

    /// Reset all depths to "infinitely far" for a new frame.
    pub fn clear_depth(&mut self) {
        self.depth.fill(0.0);
    }

    /// Write a pixel unconditionally. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.color[(y as u32 * self.width + x as u32) as usize] = color;
        }
    }

    /// Write a pixel if it passes the depth test (new reciprocal depth
    /// strictly greater than the stored one). Out-of-bounds writes are
    /// ignored.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, rcp_depth: f32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let idx = (y as u32 * self.width + x as u32) as usize;
            if rcp_depth > self.depth[idx] {
                self.depth[idx] = rcp_depth;
                self.color[idx] = color;
            }
        }
    }

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.color[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.depth[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    /// Mutable access to both planes at once, for the rasterizer's
    /// incremental row walk.
    #[inline]
    pub(crate) fn planes_mut(&mut self) -> (&mut [u32], &mut [f32]) {
        (&mut self.color, &mut self.depth)
    }

    /// The color buffer as bytes for the present layer (ARGB8888, native
    /// endian, 4 bytes per pixel).
    pub fn as_bytes(&self) -> &[u8] {
        // Vec<u32> is always 4-byte aligned; the transmute-free view keeps
        // the buffer read-only.
        unsafe { std::slice::from_raw_parts(self.color.as_ptr() as *const u8, self.color.len() * 4) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_test_nearer_wins() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel_with_depth(1, 1, 0.5, colors::RED);
        assert_eq!(fb.pixel(1, 1), Some(colors::RED));

        // farther fragment is rejected
        fb.set_pixel_with_depth(1, 1, 0.25, colors::BLUE);
        assert_eq!(fb.pixel(1, 1), Some(colors::RED));
        assert_eq!(fb.depth_at(1, 1), Some(0.5));

        // nearer fragment replaces
        fb.set_pixel_with_depth(1, 1, 0.75, colors::GREEN);
        assert_eq!(fb.pixel(1, 1), Some(colors::GREEN));
    }

    #[test]
    fn equal_depth_does_not_overwrite() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_pixel_with_depth(0, 0, 0.5, colors::RED);
        fb.set_pixel_with_depth(0, 0, 0.5, colors::BLUE);
        assert_eq!(fb.pixel(0, 0), Some(colors::RED));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_pixel(-1, 0, colors::RED);
        fb.set_pixel(2, 5, colors::RED);
        fb.set_pixel_with_depth(-3, -3, 1.0, colors::RED);
        assert_eq!(fb.pixel(-1, 0), None);
    }
}
