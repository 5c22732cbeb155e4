//! Chrominance-based skin segmentation.

use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use tracing::debug;

use crate::mask::SkinMask;

/// Inclusive Cr range classified as skin.
pub const CR_RANGE: (u8, u8) = (133, 173);
/// Inclusive Cb range classified as skin.
pub const CB_RANGE: (u8, u8) = (77, 127);

/// Chebyshev radius 2 is a 5x5 square footprint.
const DILATE_RADIUS: u8 = 2;
const DILATE_PASSES: usize = 2;

/// Full-range BT.601 chroma of an RGB pixel, as `(Cr, Cb)`.
pub fn chroma(px: [u8; 3]) -> (u8, u8) {
    let [r, g, b] = px.map(f64::from);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cr = (r - y) * 0.713 + 128.0;
    let cb = (b - y) * 0.564 + 128.0;
    (
        cr.round().clamp(0.0, 255.0) as u8,
        cb.round().clamp(0.0, 255.0) as u8,
    )
}

pub fn is_skin_tone(px: [u8; 3]) -> bool {
    let (cr, cb) = chroma(px);
    (CR_RANGE.0..=CR_RANGE.1).contains(&cr) && (CB_RANGE.0..=CB_RANGE.1).contains(&cb)
}

/// Classify every pixel by chroma, then grow the selection with two 5x5
/// dilations to close small gaps.
pub fn segment_skin(image: &RgbImage) -> SkinMask {
    let (width, height) = image.dimensions();
    let mut raw = GrayImage::from_fn(width, height, |x, y| {
        Luma([if is_skin_tone(image.get_pixel(x, y).0) { 255 } else { 0 }])
    });

    for _ in 0..DILATE_PASSES {
        raw = dilate(&raw, Norm::LInf, DILATE_RADIUS);
    }

    let mask = SkinMask::from_gray(&raw);
    debug!(
        width,
        height,
        skin_pixels = mask.count(),
        "Segmented skin"
    );
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const SKIN: [u8; 3] = [220, 170, 140];

    #[test]
    fn test_chroma_of_neutral_is_centered() {
        assert_eq!(chroma([128, 128, 128]), (128, 128));
        assert_eq!(chroma([0, 0, 0]), (128, 128));
        assert!(!is_skin_tone([128, 128, 128]));
    }

    #[test]
    fn test_classifies_typical_tones() {
        assert!(is_skin_tone(SKIN));
        assert!(!is_skin_tone([0, 0, 255]));
        assert!(!is_skin_tone([0, 200, 0]));
    }

    #[test]
    fn test_dilation_grows_single_pixel() {
        let mut img = RgbImage::new(11, 11);
        img.put_pixel(5, 5, Rgb(SKIN));
        let mask = segment_skin(&img);

        // Two 5x5 dilations reach four pixels out in every direction.
        assert_eq!(mask.count(), 81);
        assert!(mask.is_skin(1, 1));
        assert!(mask.is_skin(9, 9));
        assert!(!mask.is_skin(0, 5));
        assert!(!mask.is_skin(5, 10));
    }

    #[test]
    fn test_no_skin_yields_empty_mask() {
        let img = RgbImage::from_pixel(6, 4, Rgb([128, 128, 128]));
        let mask = segment_skin(&img);
        assert_eq!(mask.dimensions(), (6, 4));
        assert_eq!(mask.count(), 0);
    }
}
