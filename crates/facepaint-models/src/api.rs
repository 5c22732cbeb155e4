//! HTTP payloads shared between the service and its clients.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::EffectConfig;
use crate::landmark::Landmark;
use crate::preset::PresetCatalog;

/// Status reported when the detector finds no face.
pub const NO_FACE_STATUS: &str = "No face detected in the image";

/// Available preset names, for discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColorInfo {
    pub lipstick: Vec<String>,
    pub blush: Vec<String>,
    pub foundation: Vec<String>,
}

impl ColorInfo {
    pub fn from_catalog(catalog: &PresetCatalog) -> Self {
        Self {
            lipstick: catalog.lipstick_names(),
            blush: catalog.blush_names(),
            foundation: catalog.foundation_names(),
        }
    }
}

/// Result of a makeup request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessResponse {
    pub success: bool,
    /// PNG data URI of the processed image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl ProcessResponse {
    pub fn applied(image: String, status: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            image: Some(image),
            status: status.into(),
            processing_time_ms: Some(processing_time_ms),
        }
    }

    pub fn no_face(processing_time_ms: u64) -> Self {
        Self {
            success: false,
            image: None,
            status: NO_FACE_STATUS.to_string(),
            processing_time_ms: Some(processing_time_ms),
        }
    }
}

/// JSON body of `POST /api/makeup/apply-base64`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyBase64Request {
    #[serde(default)]
    pub config: EffectConfig,
    /// Base64 image, with or without a `data:image/...;base64,` prefix
    pub image_base64: String,
    /// Client-side landmarks; when absent the server detector is used
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_face_response_omits_image() {
        let json = serde_json::to_value(ProcessResponse::no_face(12)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["status"], NO_FACE_STATUS);
        assert!(json.get("image").is_none());
        assert_eq!(json["processing_time_ms"], 12);
    }

    #[test]
    fn test_color_info_matches_catalog() {
        let info = ColorInfo::from_catalog(&PresetCatalog::builtin());
        assert_eq!(info.lipstick[0], "Red");
        assert_eq!(info.blush.len(), 6);
        assert_eq!(info.foundation.last().map(String::as_str), Some("Warm"));
    }

    #[test]
    fn test_base64_request_defaults() {
        let req: ApplyBase64Request = serde_json::from_str(r#"{"image_base64": "abc"}"#).unwrap();
        assert_eq!(req.config, EffectConfig::default());
        assert!(req.landmarks.is_none());
    }
}
