//! Service info and health check handlers.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

const SERVICE_NAME: &str = "facepaint-api";

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// One entry of the endpoint listing.
#[derive(Serialize)]
pub struct EndpointInfo {
    pub route: &'static str,
    pub description: &'static str,
}

/// Root response: service identity and available endpoints.
#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
    pub endpoints: Vec<EndpointInfo>,
}

const ENDPOINTS: &[(&str, &str)] = &[
    ("POST /api/makeup/apply", "Apply makeup to an uploaded image"),
    ("POST /api/makeup/apply-base64", "Apply makeup to a base64 encoded image"),
    ("GET /api/makeup/colors", "Get available colors and presets"),
    ("GET /health", "Health check"),
];

/// Root endpoint with API information.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|&(route, description)| EndpointInfo { route, description })
            .collect(),
    })
}
