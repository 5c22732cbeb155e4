//! Compositing operators.

use image::RgbImage;
use tracing::trace;

use crate::error::{MediaError, MediaResult};
use crate::mask::{Mask, SkinMask};

/// Additive weighted blend: `clamp(round(base + mask * weight), 0, 255)`.
///
/// This is not an interpolation: the base always keeps full weight, so the
/// mask must be zero wherever the image should stay untouched. The mask is
/// consumed.
pub fn add_weighted(base: &RgbImage, mask: Mask, weight: f32) -> MediaResult<RgbImage> {
    MediaError::check_dimensions(base.dimensions(), mask.dimensions())?;

    if weight == 0.0 || mask.is_blank() {
        trace!(weight, "Blend is a no-op");
        return Ok(base.clone());
    }

    let overlay = mask.into_image();
    let mut out = base.clone();
    for (dst, &m) in out.iter_mut().zip(overlay.as_raw()) {
        let v = *dst as f32 + m as f32 * weight;
        *dst = v.round().clamp(0.0, 255.0) as u8;
    }
    Ok(out)
}

/// Convex blend confined to skin pixels.
///
/// For every pixel selected by `skin`, the result is
/// `round(original * (1 - weight) + correct(original) * weight)`. Pixels
/// outside the selector are copied unchanged and `correct` is never called
/// for them.
pub fn blend_confined<F>(
    original: &RgbImage,
    skin: &SkinMask,
    weight: f32,
    mut correct: F,
) -> MediaResult<RgbImage>
where
    F: FnMut([u8; 3]) -> [u8; 3],
{
    MediaError::check_dimensions(original.dimensions(), skin.dimensions())?;

    let mut out = original.clone();
    if weight == 0.0 {
        return Ok(out);
    }

    let keep = 1.0 - weight;
    for (x, y, px) in out.enumerate_pixels_mut() {
        if !skin.is_skin(x, y) {
            continue;
        }
        let corrected = correct(px.0);
        for c in 0..3 {
            let v = px.0[c] as f32 * keep + corrected[c] as f32 * weight;
            px.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_image(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 20) as u8, (y * 30) as u8, 77]))
    }

    #[test]
    fn test_zero_weight_is_identity() {
        let img = gradient_image(8, 5);
        let mask = Mask::from_image(RgbImage::from_pixel(8, 5, Rgb([255, 255, 255])));
        assert_eq!(add_weighted(&img, mask, 0.0).unwrap(), img);
    }

    #[test]
    fn test_blank_mask_is_identity() {
        let img = gradient_image(8, 5);
        assert_eq!(add_weighted(&img, Mask::zeroed(8, 5), 0.4).unwrap(), img);
    }

    #[test]
    fn test_additive_rounding_and_saturation() {
        let img = RgbImage::from_pixel(1, 1, Rgb([100, 250, 0]));
        let mask = Mask::from_image(RgbImage::from_pixel(1, 1, Rgb([101, 100, 3])));
        let out = add_weighted(&img, mask, 0.5).unwrap();
        // 100 + 50.5 rounds up, 250 + 50 saturates, 0 + 1.5 rounds up
        assert_eq!(out.get_pixel(0, 0).0, [151, 255, 2]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let img = gradient_image(4, 4);
        let err = add_weighted(&img, Mask::zeroed(4, 3), 1.0).unwrap_err();
        assert!(matches!(err, MediaError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_confined_blend_skips_non_skin() {
        let img = gradient_image(4, 4);
        let mut skin = SkinMask::empty(4, 4);
        skin.set(1, 1, true);

        let mut calls = 0;
        let out = blend_confined(&img, &skin, 0.5, |_| {
            calls += 1;
            [0, 0, 0]
        })
        .unwrap();

        assert_eq!(calls, 1);
        for (x, y, px) in out.enumerate_pixels() {
            let src = img.get_pixel(x, y).0;
            if (x, y) == (1, 1) {
                let expected = src.map(|v| (v as f32 * 0.5).round() as u8);
                assert_eq!(px.0, expected);
            } else {
                assert_eq!(px.0, src);
            }
        }
    }
}
