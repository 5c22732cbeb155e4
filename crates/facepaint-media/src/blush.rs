//! Blush region compositor.
//!
//! Each cheek anchor gets a cosine falloff disc of the blush color. Discs
//! are merged with a per-channel maximum, softened with a Gaussian blur and
//! optionally feathered with a vignette before being added to the image.

use std::f64::consts::PI;

use image::RgbImage;
use tracing::debug;

use facepaint_models::Rgb as Color;

use crate::blend::add_weighted;
use crate::error::MediaResult;
use crate::filters::{gaussian_blur, vignette_weights};
use crate::landmarks::PixelPoint;
use crate::mask::Mask;

/// Shape parameters of the blush discs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlushParams {
    /// Disc radius in pixels
    pub radius: u32,
    /// Vignette sigma; `None` disables feathering
    pub vignette_sigma: Option<f64>,
}

impl Default for BlushParams {
    fn default() -> Self {
        Self {
            radius: 40,
            vignette_sigma: None,
        }
    }
}

impl BlushParams {
    /// Odd blur kernel size, at least 3.
    pub fn blur_kernel(&self) -> usize {
        let k = (self.radius as f64 * 0.4) as usize;
        let k = if k % 2 == 0 { k + 1 } else { k };
        k.max(3)
    }

    pub fn blur_sigma(&self) -> f64 {
        f64::from(self.radius / 3)
    }
}

/// Opacity at distance `d` from the anchor: 1 at the center, 0 at `radius`
/// and beyond.
pub fn falloff(d: f64, radius: u32) -> f64 {
    let r = f64::from(radius);
    if radius == 0 || d > r {
        return if d == 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 + (PI * d / r).cos()) / 2.0
}

/// Build the blush overlay for a `width x height` image.
pub fn blush_mask(
    width: u32,
    height: u32,
    anchors: &[PixelPoint],
    color: Color,
    params: &BlushParams,
) -> Mask {
    let mut mask = Mask::zeroed(width, height);
    if anchors.is_empty() || width == 0 || height == 0 {
        return mask;
    }

    let r = params.radius as i64;
    let (w, h) = (i64::from(width), i64::from(height));
    let rgb = color.channels().map(f64::from);

    for anchor in anchors {
        let (px, py) = (i64::from(anchor.x), i64::from(anchor.y));
        let (x0, x1) = ((px - r).max(0), (px + r + 1).min(w));
        let (y0, y1) = ((py - r).max(0), (py + r + 1).min(h));

        for y in y0..y1 {
            for x in x0..x1 {
                let (dx, dy) = ((x - px) as f64, (y - py) as f64);
                let g = falloff((dx * dx + dy * dy).sqrt(), params.radius);
                if g <= 0.0 {
                    continue;
                }
                let value = rgb.map(|c| (c * g) as u8);
                mask.max_assign(x as u32, y as u32, value);
            }
        }
    }

    let blurred = gaussian_blur(mask.as_image(), params.blur_kernel(), params.blur_sigma());
    let mut mask = Mask::from_image(blurred);

    if let Some(sigma) = params.vignette_sigma {
        for anchor in anchors {
            apply_vignette(&mut mask, anchor, params.radius, sigma);
        }
    }

    mask
}

/// Scale the `2r x 2r` window starting at `anchor - r` by a Gaussian vignette.
fn apply_vignette(mask: &mut Mask, anchor: &PixelPoint, radius: u32, sigma: f64) {
    let (width, height) = mask.dimensions();
    let r = radius as i64;
    let x0 = (i64::from(anchor.x) - r).max(0);
    let y0 = (i64::from(anchor.y) - r).max(0);
    let x1 = (x0 + 2 * r).min(i64::from(width));
    let y1 = (y0 + 2 * r).min(i64::from(height));
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let (ww, wh) = ((x1 - x0) as usize, (y1 - y0) as usize);
    let weights = vignette_weights(ww, wh, sigma);
    let buffer = mask.as_image_mut();

    for (j, y) in (y0..y1).enumerate() {
        for (i, x) in (x0..x1).enumerate() {
            let k = weights[j * ww + i];
            let px = buffer.get_pixel_mut(x as u32, y as u32);
            for c in px.0.iter_mut() {
                *c = (f64::from(*c) * k).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Blend weight for a blush intensity in [0, 1].
pub fn blush_alpha(intensity: f32) -> f32 {
    intensity.clamp(0.0, 1.0) * 0.5
}

/// Apply blush discs around the cheek anchors.
pub fn apply_blush(
    image: &RgbImage,
    anchors: &[PixelPoint],
    color: Color,
    intensity: f32,
    params: &BlushParams,
) -> MediaResult<RgbImage> {
    let alpha = blush_alpha(intensity);
    if anchors.is_empty() || alpha == 0.0 {
        return Ok(image.clone());
    }

    let (width, height) = image.dimensions();
    let mask = blush_mask(width, height, anchors, color, params);
    debug!(%color, anchors = anchors.len(), alpha, radius = params.radius, "Applying blush");
    add_weighted(image, mask, alpha)
}
