//! Image transport: decoding uploads, base64 payloads and PNG data URIs.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage};

use crate::error::{MediaError, MediaResult};

const DATA_URI_PNG_PREFIX: &str = "data:image/png;base64,";

/// Decode encoded image bytes (png, jpeg) to RGB.
pub fn decode_image(bytes: &[u8]) -> MediaResult<RgbImage> {
    if bytes.is_empty() {
        return Err(MediaError::decode("empty image payload"));
    }
    let img = image::load_from_memory(bytes).map_err(|e| MediaError::decode(e.to_string()))?;
    Ok(img.to_rgb8())
}

/// Strip an optional `data:<mime>;base64,` prefix.
pub fn strip_data_uri(payload: &str) -> &str {
    let payload = payload.trim();
    if payload.starts_with("data:") {
        if let Some((_, body)) = payload.split_once(',') {
            return body;
        }
    }
    payload
}

/// Decode a base64 image, with or without a data URI prefix.
pub fn decode_base64_image(payload: &str) -> MediaResult<RgbImage> {
    let bytes = STANDARD.decode(strip_data_uri(payload))?;
    decode_image(&bytes)
}

/// Encode an RGB image as PNG bytes.
pub fn encode_png(image: &RgbImage) -> MediaResult<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)
        .map_err(|e| MediaError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Encode an RGB image as a `data:image/png;base64,...` URI.
pub fn encode_png_data_uri(image: &RgbImage) -> MediaResult<String> {
    let png = encode_png(image)?;
    Ok(format!("{DATA_URI_PNG_PREFIX}{}", STANDARD.encode(png)))
}
