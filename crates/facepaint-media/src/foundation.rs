//! Foundation: skin-confined tone correction.

use image::RgbImage;
use tracing::debug;

use facepaint_models::FoundationParams;

use crate::blend::blend_confined;
use crate::error::MediaResult;
use crate::mask::SkinMask;
use crate::skin::segment_skin;
use crate::tone::ToneCorrector;

/// Segment skin and blend the tone-corrected image into it.
pub fn apply_foundation(image: &RgbImage, params: &FoundationParams) -> MediaResult<RgbImage> {
    if params.intensity <= 0.0 {
        return Ok(image.clone());
    }
    let skin = segment_skin(image);
    apply_foundation_masked(image, &skin, params)
}

/// Blend the tone-corrected image into the pixels selected by `skin`.
pub fn apply_foundation_masked(
    image: &RgbImage,
    skin: &SkinMask,
    params: &FoundationParams,
) -> MediaResult<RgbImage> {
    let intensity = params.intensity.clamp(0.0, 1.0);
    let corrector = ToneCorrector::new(params);
    debug!(
        intensity,
        gamma = params.gamma,
        warm_shift = params.warm_shift,
        skin_pixels = skin.count(),
        "Applying foundation"
    );
    blend_confined(image, skin, intensity, |px| corrector.correct(px))
}
