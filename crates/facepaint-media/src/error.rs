//! Error types for image operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while decoding, detecting or compositing.
///
/// A missing face is not an error: detectors return `Ok(None)` and the
/// pipeline reports it as a status.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid image data: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Buffer size mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Invalid landmarks: {0}")]
    InvalidLandmarks(#[from] facepaint_models::LandmarkError),

    #[error("Face detection failed: {0}")]
    DetectionFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a detection failure error.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }

    /// Create a model not found error.
    pub fn model_not_found(path: impl Into<String>) -> Self {
        Self::ModelNotFound(path.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check two buffers have the same dimensions.
    pub(crate) fn check_dimensions(expected: (u32, u32), actual: (u32, u32)) -> MediaResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::DimensionMismatch { expected, actual })
        }
    }

    /// Whether the caller supplied bad input (as opposed to a server fault).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MediaError::Decode(_) | MediaError::InvalidBase64(_) | MediaError::InvalidLandmarks(_)
        )
    }
}
