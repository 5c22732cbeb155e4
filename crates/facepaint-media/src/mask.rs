//! Overlay and selector buffers.
//!
//! A [`Mask`] is a color buffer the size of the image, zero outside the
//! affected region. It is built by one of the region builders and moved into
//! the blend operator, which drops it.
//!
//! A [`SkinMask`] is a binary per-pixel selector: it says *where* an effect
//! may apply but carries no color.

use image::{GrayImage, Rgb, RgbImage};

/// Same-size color overlay for additive compositing.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    buffer: RgbImage,
}

impl Mask {
    /// All-zero mask.
    pub fn zeroed(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbImage::new(width, height),
        }
    }

    pub fn from_image(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// True when every sample is zero, i.e. blending it is a no-op.
    pub fn is_blank(&self) -> bool {
        self.buffer.as_raw().iter().all(|&v| v == 0)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    pub fn as_image_mut(&mut self) -> &mut RgbImage {
        &mut self.buffer
    }

    pub fn into_image(self) -> RgbImage {
        self.buffer
    }

    /// Raise each channel of `(x, y)` to at least `value`.
    pub(crate) fn max_assign(&mut self, x: u32, y: u32, value: [u8; 3]) {
        let Rgb(px) = self.buffer.get_pixel_mut(x, y);
        for c in 0..3 {
            px[c] = px[c].max(value[c]);
        }
    }
}

/// Binary skin/non-skin selector, one byte per pixel holding 0 or 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SkinMask {
    /// Selector covering the whole image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![1; (width as usize) * (height as usize)],
        }
    }

    /// Selector covering nothing.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Any non-zero sample of `gray` marks skin.
    pub fn from_gray(gray: &GrayImage) -> Self {
        Self {
            width: gray.width(),
            height: gray.height(),
            data: gray.as_raw().iter().map(|&v| u8::from(v > 0)).collect(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_skin(&self, x: u32, y: u32) -> bool {
        self.data[(y as usize) * (self.width as usize) + x as usize] == 1
    }

    pub fn set(&mut self, x: u32, y: u32, skin: bool) {
        self.data[(y as usize) * (self.width as usize) + x as usize] = u8::from(skin);
    }

    /// Number of pixels classified as skin.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Raw 0/1 samples in row-major order.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }
}
