//! Application state.

use std::sync::Arc;

use facepaint_media::{BlushParams, EffectPipeline, LandmarkDetector};
use facepaint_models::PresetCatalog;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::ApiResult;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub catalog: Arc<PresetCatalog>,
    pub pipeline: Arc<EffectPipeline>,
    /// Server-side detector; requests without landmarks need one
    pub detector: Option<Arc<dyn LandmarkDetector>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let detector = load_detector(&config)?;
        Ok(Self::with_detector(config, detector))
    }

    /// State with an explicit detector (or none).
    pub fn with_detector(config: ApiConfig, detector: Option<Arc<dyn LandmarkDetector>>) -> Self {
        let catalog = Arc::new(PresetCatalog::builtin());
        let blush = BlushParams {
            vignette_sigma: config.blush_vignette_sigma,
            ..BlushParams::default()
        };
        let pipeline = Arc::new(EffectPipeline::new(Arc::clone(&catalog)).with_blush_params(blush));
        Self {
            config,
            catalog,
            pipeline,
            detector,
        }
    }
}

#[cfg(feature = "face-mesh")]
fn load_detector(config: &ApiConfig) -> ApiResult<Option<Arc<dyn LandmarkDetector>>> {
    use facepaint_media::FaceMeshDetector;

    let Some(path) = &config.face_mesh_model else {
        warn!("FACE_MESH_MODEL not set, requests must carry landmarks");
        return Ok(None);
    };

    let detector = FaceMeshDetector::load(path)?;
    info!(model = %path.display(), "Server-side landmark detection enabled");
    Ok(Some(Arc::new(detector)))
}

#[cfg(not(feature = "face-mesh"))]
fn load_detector(config: &ApiConfig) -> ApiResult<Option<Arc<dyn LandmarkDetector>>> {
    if config.face_mesh_model.is_some() {
        warn!("FACE_MESH_MODEL is set but the face-mesh feature is disabled, ignoring");
    } else {
        info!("No landmark detector configured, requests must carry landmarks");
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vignette_sigma_reaches_pipeline() {
        let state = AppState::with_detector(ApiConfig::default(), None);
        assert_eq!(state.pipeline.blush_params(), &BlushParams::default());

        let config = ApiConfig {
            blush_vignette_sigma: Some(8.0),
            ..ApiConfig::default()
        };
        let state = AppState::with_detector(config, None);
        assert_eq!(state.pipeline.blush_params().vignette_sigma, Some(8.0));
        assert_eq!(state.pipeline.blush_params().radius, 40);
    }
}
