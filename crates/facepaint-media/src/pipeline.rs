//! Effect pipeline: lipstick, then blush, then foundation.
//!
//! Each enabled stage consumes the previous stage's output. Missing
//! landmarks short-circuit with the unmodified image. Preset names are
//! resolved against the injected [`PresetCatalog`]; unknown names fall
//! back to the catalog defaults.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;
use tracing::{debug, info};

use facepaint_models::regions::{CHEEKS, LIPS};
use facepaint_models::{EffectConfig, LandmarkSet, PresetCatalog, NO_FACE_STATUS};

use crate::blush::{apply_blush, BlushParams};
use crate::detector::LandmarkDetector;
use crate::error::MediaResult;
use crate::foundation::apply_foundation;
use crate::landmarks::normalize_landmarks;
use crate::lips::apply_lipstick;

/// Pipeline states, in the order they can be visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    LandmarksDetected,
    LipstickApplied,
    BlushApplied,
    FoundationApplied,
    Done,
    /// Terminal: no face, nothing applied.
    NoFaceDetected,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::LandmarksDetected => "landmarks_detected",
            PipelineStage::LipstickApplied => "lipstick_applied",
            PipelineStage::BlushApplied => "blush_applied",
            PipelineStage::FoundationApplied => "foundation_applied",
            PipelineStage::Done => "done",
            PipelineStage::NoFaceDetected => "no_face_detected",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feature that was applied, as listed in the status summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedFeature {
    Lipstick,
    /// Blush with its intensity percentage
    Blush(u8),
    /// Foundation with the canonical preset name
    Foundation(String),
}

impl fmt::Display for AppliedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliedFeature::Lipstick => f.write_str("Lipstick"),
            AppliedFeature::Blush(percent) => write!(f, "Blush ({percent}%)"),
            AppliedFeature::Foundation(preset) => write!(f, "Foundation ({preset})"),
        }
    }
}

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    Applied(Vec<AppliedFeature>),
    NoFaceDetected,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::NoFaceDetected => f.write_str(NO_FACE_STATUS),
            PipelineStatus::Applied(features) if features.is_empty() => f.write_str("Applied: None"),
            PipelineStatus::Applied(features) => {
                f.write_str("Applied: ")?;
                for (i, feature) in features.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{feature}")?;
                }
                Ok(())
            }
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub image: RgbImage,
    pub status: PipelineStatus,
    /// States visited, starting at `Idle`
    pub stages: Vec<PipelineStage>,
    pub elapsed: Duration,
}

impl PipelineOutcome {
    /// Human-readable status line.
    pub fn summary(&self) -> String {
        self.status.to_string()
    }

    pub fn face_found(&self) -> bool {
        !matches!(self.status, PipelineStatus::NoFaceDetected)
    }

    pub fn applied(&self) -> &[AppliedFeature] {
        match &self.status {
            PipelineStatus::Applied(features) => features,
            PipelineStatus::NoFaceDetected => &[],
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// Runs the enabled cosmetic stages over an image.
#[derive(Debug, Clone)]
pub struct EffectPipeline {
    catalog: Arc<PresetCatalog>,
    blush: BlushParams,
}

impl EffectPipeline {
    pub fn new(catalog: Arc<PresetCatalog>) -> Self {
        Self {
            catalog,
            blush: BlushParams::default(),
        }
    }

    /// Pipeline over the built-in preset tables.
    pub fn builtin() -> Self {
        Self::new(Arc::new(PresetCatalog::builtin()))
    }

    pub fn with_blush_params(mut self, params: BlushParams) -> Self {
        self.blush = params;
        self
    }

    pub fn blush_params(&self) -> &BlushParams {
        &self.blush
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// Apply the enabled effects using the given landmarks.
    pub fn apply_effects(
        &self,
        image: &RgbImage,
        landmarks: Option<&LandmarkSet>,
        config: &EffectConfig,
    ) -> MediaResult<PipelineOutcome> {
        let started = Instant::now();
        let mut stages = vec![PipelineStage::Idle];

        let Some(landmarks) = landmarks else {
            stages.push(PipelineStage::NoFaceDetected);
            info!("No face detected, returning image unchanged");
            return Ok(PipelineOutcome {
                image: image.clone(),
                status: PipelineStatus::NoFaceDetected,
                stages,
                elapsed: started.elapsed(),
            });
        };

        let (width, height) = image.dimensions();
        stages.push(PipelineStage::LandmarksDetected);
        debug!(width, height, stage = %PipelineStage::LandmarksDetected, "Pipeline transition");

        let mut current = image.clone();
        let mut applied = Vec::new();

        if config.apply_lipstick {
            let color = self.catalog.lipstick(&config.lipstick_color);
            if color.fell_back {
                debug!(requested = %config.lipstick_color, used = color.name, "Unknown lipstick color");
            }
            let points = normalize_landmarks(Some(landmarks), height, width, LIPS);
            current = apply_lipstick(&current, &points, color.value)?;
            applied.push(AppliedFeature::Lipstick);
            stages.push(PipelineStage::LipstickApplied);
            debug!(color = color.name, stage = %PipelineStage::LipstickApplied, "Pipeline transition");
        }

        if config.apply_blush {
            let color = self.catalog.blush(&config.blush_color);
            if color.fell_back {
                debug!(requested = %config.blush_color, used = color.name, "Unknown blush color");
            }
            let anchors = normalize_landmarks(Some(landmarks), height, width, CHEEKS);
            current = apply_blush(
                &current,
                &anchors,
                color.value,
                config.blush_fraction(),
                &self.blush,
            )?;
            applied.push(AppliedFeature::Blush(config.blush_intensity.min(100)));
            stages.push(PipelineStage::BlushApplied);
            debug!(
                color = color.name,
                intensity = config.blush_intensity,
                stage = %PipelineStage::BlushApplied,
                "Pipeline transition"
            );
        }

        if config.apply_foundation {
            let preset = self.catalog.foundation(&config.foundation_preset);
            if preset.fell_back {
                debug!(requested = %config.foundation_preset, used = preset.name, "Unknown foundation preset");
            }
            current = apply_foundation(&current, &preset.value)?;
            applied.push(AppliedFeature::Foundation(preset.name.to_string()));
            stages.push(PipelineStage::FoundationApplied);
            debug!(preset = preset.name, stage = %PipelineStage::FoundationApplied, "Pipeline transition");
        }

        stages.push(PipelineStage::Done);
        let outcome = PipelineOutcome {
            image: current,
            status: PipelineStatus::Applied(applied),
            stages,
            elapsed: started.elapsed(),
        };

        info!(
            status = %outcome.status,
            elapsed_ms = outcome.elapsed_ms(),
            "Effects applied"
        );

        Ok(outcome)
    }

    /// Detect landmarks, then apply the enabled effects.
    ///
    /// The reported elapsed time covers detection as well.
    pub fn process(
        &self,
        image: &RgbImage,
        detector: &dyn LandmarkDetector,
        config: &EffectConfig,
    ) -> MediaResult<PipelineOutcome> {
        let started = Instant::now();
        let landmarks = detector.detect(image)?;
        debug!(
            detector = detector.name(),
            face_found = landmarks.is_some(),
            "Landmark detection finished"
        );

        let mut outcome = self.apply_effects(image, landmarks.as_ref(), config)?;
        outcome.elapsed = started.elapsed();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::FixedLandmarks;
    use facepaint_models::{FoundationPreset, Landmark};
    use image::Rgb;

    /// Lips on a circle below the center, cheeks left and right.
    fn face() -> LandmarkSet {
        let mut set = LandmarkSet::uniform(Landmark::new(0.5, 0.5, 0.0));
        let n = LIPS.len() as f32;
        for (i, &idx) in LIPS.iter().enumerate() {
            let a = i as f32 / n * std::f32::consts::TAU;
            set = set.with_point(idx, Landmark::new(0.5 + 0.15 * a.cos(), 0.7 + 0.08 * a.sin(), 0.0));
        }
        set.with_point(CHEEKS[0], Landmark::new(0.75, 0.45, 0.0))
            .with_point(CHEEKS[1], Landmark::new(0.25, 0.45, 0.0))
    }

    fn portrait() -> RgbImage {
        RgbImage::from_fn(160, 160, |x, y| {
            if (x + y) % 3 == 0 {
                Rgb([224, 172, 140])
            } else {
                Rgb([210, 160, 130])
            }
        })
    }

    #[test]
    fn test_no_face_short_circuits() {
        let img = portrait();
        let outcome = EffectPipeline::builtin()
            .apply_effects(&img, None, &EffectConfig::default())
            .unwrap();

        assert_eq!(outcome.image, img);
        assert!(!outcome.face_found());
        assert_eq!(outcome.summary(), NO_FACE_STATUS);
        assert_eq!(
            outcome.stages,
            vec![PipelineStage::Idle, PipelineStage::NoFaceDetected]
        );
        assert!(outcome.applied().is_empty());
    }

    #[test]
    fn test_nothing_enabled_is_identity() {
        let img = portrait();
        let outcome = EffectPipeline::builtin()
            .apply_effects(&img, Some(&face()), &EffectConfig::none())
            .unwrap();

        assert_eq!(outcome.image, img);
        assert_eq!(outcome.summary(), "Applied: None");
        assert_eq!(
            outcome.stages,
            vec![
                PipelineStage::Idle,
                PipelineStage::LandmarksDetected,
                PipelineStage::Done
            ]
        );
    }

    #[test]
    fn test_stages_run_in_order_on_previous_output() {
        let img = portrait();
        let landmarks = face();
        let pipeline = EffectPipeline::builtin();
        let outcome = pipeline
            .apply_effects(&img, Some(&landmarks), &EffectConfig::default())
            .unwrap();

        assert_eq!(
            outcome.summary(),
            "Applied: Lipstick, Blush (50%), Foundation (Medium)"
        );
        assert_eq!(
            outcome.stages,
            vec![
                PipelineStage::Idle,
                PipelineStage::LandmarksDetected,
                PipelineStage::LipstickApplied,
                PipelineStage::BlushApplied,
                PipelineStage::FoundationApplied,
                PipelineStage::Done,
            ]
        );

        let catalog = pipeline.catalog();
        let lips = normalize_landmarks(Some(&landmarks), 160, 160, LIPS);
        let cheeks = normalize_landmarks(Some(&landmarks), 160, 160, CHEEKS);
        let step = apply_lipstick(&img, &lips, catalog.lipstick("Red").value).unwrap();
        let step = apply_blush(
            &step,
            &cheeks,
            catalog.blush("Pink").value,
            0.5,
            &BlushParams::default(),
        )
        .unwrap();
        let expected = apply_foundation(&step, &FoundationPreset::Medium.params()).unwrap();

        assert_eq!(outcome.image.dimensions(), img.dimensions());
        assert_eq!(outcome.image, expected);
        assert_ne!(outcome.image, img);
    }

    #[test]
    fn test_unknown_presets_fall_back() {
        let img = portrait();
        let landmarks = face();
        let pipeline = EffectPipeline::builtin();

        let mut config = EffectConfig::none();
        config.apply_foundation = true;
        config.foundation_preset = "Glitter".to_string();
        let fallback = pipeline.apply_effects(&img, Some(&landmarks), &config).unwrap();

        config.foundation_preset = "medium".to_string();
        let explicit = pipeline.apply_effects(&img, Some(&landmarks), &config).unwrap();

        assert_eq!(fallback.image, explicit.image);
        assert_eq!(fallback.summary(), "Applied: Foundation (Medium)");
    }

    #[test]
    fn test_process_uses_detector() {
        let img = portrait();
        let pipeline = EffectPipeline::builtin();
        let config = EffectConfig::default();

        let found = pipeline
            .process(&img, &FixedLandmarks::new(face()), &config)
            .unwrap();
        assert!(found.face_found());

        let missing = pipeline
            .process(&img, &FixedLandmarks::no_face(), &config)
            .unwrap();
        assert_eq!(missing.status, PipelineStatus::NoFaceDetected);
        assert_eq!(missing.image, img);
    }

    #[test]
    fn test_status_display() {
        let status = PipelineStatus::Applied(vec![
            AppliedFeature::Blush(75),
            AppliedFeature::Foundation("Warm".into()),
        ]);
        assert_eq!(status.to_string(), "Applied: Blush (75%), Foundation (Warm)");
    }
}
