//! 8-bit RGB frame buffer.
//!
//! Rows are stored bottom to top: row 0 is the bottom of the image, matching
//! the window coordinate convention used by the camera.

use std::path::Path;

use image::{ImageResult, RgbImage};
use rayon::prelude::*;

/// Width x height x 3 bytes of packed RGB.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a zero-filled buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; Self::byte_len(width, height)],
        }
    }

    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// Prepare for a frame of `width x height`.
    ///
    /// Reallocates only when the dimensions change and always leaves every
    /// byte zero. Returns true if the storage was reallocated.
    pub fn setup(&mut self, width: u32, height: u32) -> bool {
        let resized = width != self.width || height != self.height;
        if resized {
            self.width = width;
            self.height = height;
            self.data = vec![0; Self::byte_len(width, height)];
        } else {
            self.clear();
        }
        resized
    }

    /// Zero every byte.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw bytes, bottom row first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, i: u32, j: u32) -> usize {
        (j as usize * self.width as usize + i as usize) * 3
    }

    /// Pixel `(i, j)`, with `j` counted from the bottom row.
    pub fn pixel(&self, i: u32, j: u32) -> Option<[u8; 3]> {
        if i >= self.width || j >= self.height {
            return None;
        }
        let o = self.offset(i, j);
        Some([self.data[o], self.data[o + 1], self.data[o + 2]])
    }

    /// Store pixel `(i, j)`. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, i: u32, j: u32, rgb: [u8; 3]) {
        if i >= self.width || j >= self.height {
            return;
        }
        let o = self.offset(i, j);
        self.data[o..o + 3].copy_from_slice(&rgb);
    }

    /// Parallel iterator over rows, bottom row first.
    ///
    /// Must not be called on a buffer with zero width.
    pub(crate) fn rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, u8> {
        let stride = (self.width as usize * 3).max(1);
        self.data.par_chunks_mut(stride)
    }

    /// Copy into an image with the conventional top-row-first layout.
    pub fn to_image(&self) -> RgbImage {
        let mut img = RgbImage::new(self.width, self.height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let j = self.height - 1 - y;
            if let Some(rgb) = self.pixel(x, j) {
                pixel.0 = rgb;
            }
        }
        img
    }

    /// Save as an image file; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        log::info!(
            "Saving {}x{} image to {}",
            self.width,
            self.height,
            path.display()
        );
        self.to_image().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_reallocates_on_resize() {
        let mut fb = FrameBuffer::new(4, 4);
        assert!(fb.setup(8, 2));
        assert_eq!(fb.as_bytes().len(), 8 * 2 * 3);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_setup_same_size_zero_fills() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(1, 1, [9, 8, 7]);

        assert!(!fb.setup(2, 2));
        assert_eq!(fb.as_bytes().len(), 12);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pixel_addressing() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set_pixel(2, 1, [1, 2, 3]);

        assert_eq!(fb.pixel(2, 1), Some([1, 2, 3]));
        // Row 1 starts after one row of 3 pixels
        assert_eq!(&fb.as_bytes()[(3 + 2) * 3..][..3], &[1, 2, 3]);
        assert_eq!(fb.pixel(3, 0), None);
    }

    #[test]
    fn test_to_image_flips_rows() {
        let mut fb = FrameBuffer::new(1, 2);
        fb.set_pixel(0, 0, [255, 0, 0]);

        let img = fb.to_image();
        // Bottom buffer row lands on the last image row
        assert_eq!(img.get_pixel(0, 1).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
