//! Shared data models for the facepaint makeup engine.
//!
//! This crate provides Serde-serializable types for:
//! - Colors and the cosmetic preset tables (lipstick, blush, foundation)
//! - Per-request effect configuration
//! - Facial landmarks and the region selectors that index into them
//! - HTTP request/response payloads

pub mod api;
pub mod color;
pub mod config;
pub mod landmark;
pub mod preset;

// Re-export common types
pub use api::{ApplyBase64Request, ColorInfo, ProcessResponse, NO_FACE_STATUS};
pub use color::Rgb;
pub use config::EffectConfig;
pub use landmark::{regions, Landmark, LandmarkError, LandmarkSet, COORD_RANGE, LANDMARK_COUNT};
pub use preset::{
    BlushColor, FoundationParams, FoundationPreset, LipstickColor, Named, PresetCatalog, Resolved,
};
