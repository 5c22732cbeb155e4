//! Per-request effect configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::preset::{BlushColor, FoundationPreset, LipstickColor};

/// Which effects to apply and with which presets.
///
/// Preset fields are free-form names; unknown names resolve to the catalog
/// defaults when the pipeline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(default)]
pub struct EffectConfig {
    /// Apply lipstick effect
    pub apply_lipstick: bool,
    /// Lipstick color name
    pub lipstick_color: String,
    /// Apply blush effect
    pub apply_blush: bool,
    /// Blush color name
    pub blush_color: String,
    /// Blush intensity percentage (0-100)
    #[validate(range(max = 100))]
    pub blush_intensity: u8,
    /// Apply foundation effect
    pub apply_foundation: bool,
    /// Foundation preset name
    pub foundation_preset: String,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            apply_lipstick: true,
            lipstick_color: LipstickColor::default().to_string(),
            apply_blush: true,
            blush_color: BlushColor::default().to_string(),
            blush_intensity: 50,
            apply_foundation: true,
            foundation_preset: FoundationPreset::default().to_string(),
        }
    }
}

impl EffectConfig {
    /// A config with every effect disabled.
    pub fn none() -> Self {
        Self {
            apply_lipstick: false,
            apply_blush: false,
            apply_foundation: false,
            ..Self::default()
        }
    }

    /// Blush intensity as a fraction in [0, 1].
    pub fn blush_fraction(&self) -> f32 {
        f32::from(self.blush_intensity.min(100)) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let cfg: EffectConfig = serde_json::from_str(r#"{"lipstick_color": "Wine"}"#).unwrap();
        assert_eq!(cfg.lipstick_color, "Wine");
        assert!(cfg.apply_lipstick && cfg.apply_blush && cfg.apply_foundation);
        assert_eq!(cfg.blush_color, "Pink");
        assert_eq!(cfg.blush_intensity, 50);
        assert_eq!(cfg.foundation_preset, "Medium");
    }

    #[test]
    fn test_intensity_validation() {
        let mut cfg = EffectConfig::default();
        assert!(cfg.validate().is_ok());

        cfg.blush_intensity = 101;
        assert!(cfg.validate().is_err());
        assert_eq!(cfg.blush_fraction(), 1.0);
    }

    #[test]
    fn test_none_disables_everything() {
        let cfg = EffectConfig::none();
        assert!(!(cfg.apply_lipstick || cfg.apply_blush || cfg.apply_foundation));
        assert_eq!(cfg.lipstick_color, "Red");
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(EffectConfig)).unwrap();
        assert!(schema["properties"]["blush_intensity"].is_object());
        assert!(schema["properties"]["apply_lipstick"].is_object());
    }
}
