#![deny(unreachable_patterns)]
//! Landmark-driven cosmetic compositing engine.
//!
//! This crate provides:
//! - Landmark normalization to pixel coordinates
//! - Region compositors for lipstick, blush and foundation
//! - Gaussian blur, elliptical erosion and vignette filters
//! - Chrominance skin segmentation and gamma tone correction
//! - The effect pipeline and its status summary
//! - PNG/JPEG/base64 image transport
//! - A pluggable landmark detector, with an ONNX face mesh behind `face-mesh`

pub mod blend;
pub mod blush;
pub mod codec;
pub mod detector;
pub mod error;
#[cfg(feature = "face-mesh")]
pub mod face_mesh;
pub mod filters;
pub mod foundation;
pub mod landmarks;
pub mod lips;
pub mod mask;
pub mod pipeline;
pub mod skin;
pub mod tone;

pub use blend::{add_weighted, blend_confined};
pub use blush::{apply_blush, blush_mask, BlushParams};
pub use codec::{decode_base64_image, decode_image, encode_png, encode_png_data_uri};
pub use detector::{FixedLandmarks, LandmarkDetector};
pub use error::{MediaError, MediaResult};
#[cfg(feature = "face-mesh")]
pub use face_mesh::FaceMeshDetector;
pub use foundation::{apply_foundation, apply_foundation_masked};
pub use landmarks::{normalize_landmarks, PixelPoint};
pub use lips::{apply_lipstick, lip_mask};
pub use mask::{Mask, SkinMask};
pub use pipeline::{AppliedFeature, EffectPipeline, PipelineOutcome, PipelineStage, PipelineStatus};
pub use skin::segment_skin;
pub use tone::{GammaLut, ToneCorrector};
