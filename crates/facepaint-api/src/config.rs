//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second, per client IP
    pub rate_limit_rps: u32,
    /// Rate limit burst
    pub rate_limit_burst: u32,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Face mesh ONNX model for server-side landmark detection
    pub face_mesh_model: Option<PathBuf>,
    /// Sigma of the blush vignette; unset leaves it off
    pub blush_vignette_sigma: Option<f64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            rate_limit_burst: 20,
            request_timeout: Duration::from_secs(30),
            max_body_size: 10 * 1024 * 1024, // 10MB
            environment: "development".to_string(),
            face_mesh_model: None,
            blush_vignette_sigma: None,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("API_PORT").unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: parse_env("RATE_LIMIT_RPS").unwrap_or(10),
            rate_limit_burst: parse_env("RATE_LIMIT_BURST").unwrap_or(20),
            request_timeout: Duration::from_secs(parse_env("REQUEST_TIMEOUT").unwrap_or(30)),
            max_body_size: parse_env("MAX_BODY_SIZE").unwrap_or(10 * 1024 * 1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            face_mesh_model: std::env::var("FACE_MESH_MODEL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            blush_vignette_sigma: parse_env::<f64>("BLUSH_VIGNETTE_SIGMA")
                .filter(|s| s.is_finite() && *s > 0.0),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
