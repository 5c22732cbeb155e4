//! Landmark detector seam.
//!
//! The engine never runs a model itself: it is handed landmarks, or a
//! detector that produces them. An ONNX face mesh implementation lives in
//! [`crate::face_mesh`] behind the `face-mesh` feature.

use image::RgbImage;

use facepaint_models::LandmarkSet;

use crate::error::MediaResult;

/// Produces one face's landmarks for an image.
pub trait LandmarkDetector: Send + Sync {
    /// `Ok(None)` means the image contains no face.
    fn detect(&self, image: &RgbImage) -> MediaResult<Option<LandmarkSet>>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Detector returning a preset answer regardless of the image.
///
/// Used when the client already supplied landmarks, and in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedLandmarks {
    landmarks: Option<LandmarkSet>,
}

impl FixedLandmarks {
    pub fn new(landmarks: LandmarkSet) -> Self {
        Self {
            landmarks: Some(landmarks),
        }
    }

    /// A detector that never finds a face.
    pub fn no_face() -> Self {
        Self { landmarks: None }
    }
}

impl LandmarkDetector for FixedLandmarks {
    fn detect(&self, _image: &RgbImage) -> MediaResult<Option<LandmarkSet>> {
        Ok(self.landmarks.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
