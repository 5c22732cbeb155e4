//! Axum HTTP API for the makeup compositing engine.
//!
//! This crate provides:
//! - Makeup endpoints over multipart uploads and base64 JSON
//! - Preset discovery and health endpoints
//! - Per-IP rate limiting, request IDs and security headers

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
