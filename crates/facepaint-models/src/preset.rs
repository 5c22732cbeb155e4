//! Cosmetic preset tables.
//!
//! Three fixed tables exist: lipstick colors, blush colors and foundation
//! presets. Each is an enum with a display name; [`PresetCatalog`] holds an
//! immutable name -> value view of all three and is handed to the pipeline
//! rather than consulted as global state.
//!
//! Colors are stored in RGB order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::Rgb;

/// Lipstick shades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum LipstickColor {
    #[default]
    Red,
    Pink,
    Burgundy,
    Orange,
    Nude,
    Wine,
    Coral,
}

impl LipstickColor {
    pub const ALL: &'static [LipstickColor] = &[
        LipstickColor::Red,
        LipstickColor::Pink,
        LipstickColor::Burgundy,
        LipstickColor::Orange,
        LipstickColor::Nude,
        LipstickColor::Wine,
        LipstickColor::Coral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LipstickColor::Red => "Red",
            LipstickColor::Pink => "Pink",
            LipstickColor::Burgundy => "Burgundy",
            LipstickColor::Orange => "Orange",
            LipstickColor::Nude => "Nude",
            LipstickColor::Wine => "Wine",
            LipstickColor::Coral => "Coral",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            LipstickColor::Red => Rgb::new(255, 0, 0),
            LipstickColor::Pink => Rgb::new(255, 192, 203),
            LipstickColor::Burgundy => Rgb::new(130, 0, 75),
            LipstickColor::Orange => Rgb::new(255, 165, 0),
            LipstickColor::Nude => Rgb::new(200, 140, 180),
            LipstickColor::Wine => Rgb::new(120, 0, 0),
            LipstickColor::Coral => Rgb::new(255, 165, 100),
        }
    }
}

impl fmt::Display for LipstickColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blush shades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum BlushColor {
    Coral,
    #[default]
    Pink,
    Peach,
    Rose,
    Berry,
    Apricot,
}

impl BlushColor {
    pub const ALL: &'static [BlushColor] = &[
        BlushColor::Coral,
        BlushColor::Pink,
        BlushColor::Peach,
        BlushColor::Rose,
        BlushColor::Berry,
        BlushColor::Apricot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlushColor::Coral => "Coral",
            BlushColor::Pink => "Pink",
            BlushColor::Peach => "Peach",
            BlushColor::Rose => "Rose",
            BlushColor::Berry => "Berry",
            BlushColor::Apricot => "Apricot",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            BlushColor::Coral => Rgb::new(245, 135, 66),
            BlushColor::Pink => Rgb::new(220, 135, 192),
            BlushColor::Peach => Rgb::new(255, 165, 152),
            BlushColor::Rose => Rgb::new(200, 70, 100),
            BlushColor::Berry => Rgb::new(150, 50, 140),
            BlushColor::Apricot => Rgb::new(230, 140, 140),
        }
    }
}

impl fmt::Display for BlushColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone parameters of a foundation preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FoundationParams {
    /// Blend weight of the corrected tone on skin pixels, in [0, 1]
    pub intensity: f32,
    /// Gamma exponent (> 1 darkens, < 1 brightens)
    pub gamma: f32,
    /// Relative red-channel boost applied after gamma (0 disables)
    pub warm_shift: f32,
}

impl FoundationParams {
    /// Parameters that leave the image unchanged.
    pub const IDENTITY: FoundationParams = FoundationParams {
        intensity: 0.0,
        gamma: 1.0,
        warm_shift: 0.0,
    };
}

/// Foundation coverage presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum FoundationPreset {
    Low,
    #[default]
    Medium,
    High,
    Warm,
}

impl FoundationPreset {
    pub const ALL: &'static [FoundationPreset] = &[
        FoundationPreset::Low,
        FoundationPreset::Medium,
        FoundationPreset::High,
        FoundationPreset::Warm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoundationPreset::Low => "Low",
            FoundationPreset::Medium => "Medium",
            FoundationPreset::High => "High",
            FoundationPreset::Warm => "Warm",
        }
    }

    pub fn params(&self) -> FoundationParams {
        match self {
            FoundationPreset::Low => FoundationParams {
                intensity: 0.2,
                gamma: 1.15,
                warm_shift: 0.0,
            },
            FoundationPreset::Medium => FoundationParams {
                intensity: 0.35,
                gamma: 1.3,
                warm_shift: 0.0,
            },
            FoundationPreset::High => FoundationParams {
                intensity: 0.5,
                gamma: 1.45,
                warm_shift: 0.0,
            },
            FoundationPreset::Warm => FoundationParams {
                intensity: 0.35,
                gamma: 1.3,
                warm_shift: 0.08,
            },
        }
    }
}

impl fmt::Display for FoundationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named entry in one of the catalog tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Named<T> {
    pub name: String,
    pub value: T,
}

impl<T> Named<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Immutable lookup tables for every cosmetic preset.
///
/// Lookups are case-insensitive on the display name. Unknown names resolve
/// to the table's default entry.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    lipstick: Vec<Named<Rgb>>,
    blush: Vec<Named<Rgb>>,
    foundation: Vec<Named<FoundationParams>>,
    default_lipstick: Named<Rgb>,
    default_blush: Named<Rgb>,
    default_foundation: Named<FoundationParams>,
}

/// A preset resolved from a user-supplied name.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a, T> {
    /// Canonical display name of the entry actually used
    pub name: &'a str,
    pub value: T,
    /// True when the requested name was unknown and the default was used
    pub fell_back: bool,
}

impl PresetCatalog {
    /// Build a catalog from explicit tables.
    ///
    /// Each default must name an entry of its table; otherwise the first
    /// entry is used as the default. Returns `None` if any table is empty.
    pub fn new(
        lipstick: Vec<Named<Rgb>>,
        blush: Vec<Named<Rgb>>,
        foundation: Vec<Named<FoundationParams>>,
        defaults: (&str, &str, &str),
    ) -> Option<Self> {
        let default_lipstick = find(&lipstick, defaults.0).or_else(|| lipstick.first())?.clone();
        let default_blush = find(&blush, defaults.1).or_else(|| blush.first())?.clone();
        let default_foundation = find(&foundation, defaults.2)
            .or_else(|| foundation.first())?
            .clone();

        Some(Self {
            lipstick,
            blush,
            foundation,
            default_lipstick,
            default_blush,
            default_foundation,
        })
    }

    /// The built-in tables: 7 lipstick colors, 6 blush colors, 4 foundation presets.
    pub fn builtin() -> Self {
        Self {
            lipstick: LipstickColor::ALL
                .iter()
                .map(|c| Named::new(c.as_str(), c.color()))
                .collect(),
            blush: BlushColor::ALL
                .iter()
                .map(|c| Named::new(c.as_str(), c.color()))
                .collect(),
            foundation: FoundationPreset::ALL
                .iter()
                .map(|p| Named::new(p.as_str(), p.params()))
                .collect(),
            default_lipstick: Named::new(
                LipstickColor::default().as_str(),
                LipstickColor::default().color(),
            ),
            default_blush: Named::new(BlushColor::default().as_str(), BlushColor::default().color()),
            default_foundation: Named::new(
                FoundationPreset::default().as_str(),
                FoundationPreset::default().params(),
            ),
        }
    }

    pub fn lipstick(&self, name: &str) -> Resolved<'_, Rgb> {
        resolve(&self.lipstick, &self.default_lipstick, name)
    }

    pub fn blush(&self, name: &str) -> Resolved<'_, Rgb> {
        resolve(&self.blush, &self.default_blush, name)
    }

    pub fn foundation(&self, name: &str) -> Resolved<'_, FoundationParams> {
        resolve(&self.foundation, &self.default_foundation, name)
    }

    pub fn lipstick_names(&self) -> Vec<String> {
        names(&self.lipstick)
    }

    pub fn blush_names(&self) -> Vec<String> {
        names(&self.blush)
    }

    pub fn foundation_names(&self) -> Vec<String> {
        names(&self.foundation)
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn find<'a, T>(table: &'a [Named<T>], name: &str) -> Option<&'a Named<T>> {
    let name = name.trim();
    table.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}

fn resolve<'a, T: Copy>(table: &'a [Named<T>], default: &'a Named<T>, name: &str) -> Resolved<'a, T> {
    match find(table, name) {
        Some(entry) => Resolved {
            name: &entry.name,
            value: entry.value,
            fell_back: false,
        },
        None => Resolved {
            name: &default.name,
            value: default.value,
            fell_back: true,
        },
    }
}

fn names<T>(table: &[Named<T>]) -> Vec<String> {
    table.iter().map(|e| e.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_sizes() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(catalog.lipstick_names().len(), 7);
        assert_eq!(catalog.blush_names().len(), 6);
        assert_eq!(catalog.foundation_names().len(), 4);
        assert_eq!(catalog.foundation_names(), vec!["Low", "Medium", "High", "Warm"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = PresetCatalog::builtin();
        let wine = catalog.lipstick("wine");
        assert_eq!(wine.name, "Wine");
        assert_eq!(wine.value, Rgb::new(120, 0, 0));
        assert!(!wine.fell_back);
    }

    #[test]
    fn test_unknown_names_fall_back_to_defaults() {
        let catalog = PresetCatalog::builtin();

        let lip = catalog.lipstick("Chartreuse");
        assert_eq!(lip.name, "Red");
        assert!(lip.fell_back);

        let blush = catalog.blush("");
        assert_eq!(blush.name, "Pink");
        assert_eq!(blush.value, BlushColor::Pink.color());

        let foundation = catalog.foundation("Ultra");
        assert_eq!(foundation.name, "Medium");
        assert_eq!(foundation.value, FoundationPreset::Medium.params());
    }

    #[test]
    fn test_custom_catalog_default_resolution() {
        let catalog = PresetCatalog::new(
            vec![Named::new("Plum", Rgb::new(90, 20, 80))],
            vec![Named::new("Sun", Rgb::new(250, 120, 90))],
            vec![Named::new("Sheer", FoundationParams::IDENTITY)],
            ("missing", "Sun", "Sheer"),
        )
        .unwrap();

        assert_eq!(catalog.lipstick("anything").name, "Plum");
        assert_eq!(catalog.blush("sun").value, Rgb::new(250, 120, 90));

        assert!(PresetCatalog::new(vec![], vec![], vec![], ("", "", "")).is_none());
    }

    #[test]
    fn test_warm_preset_is_only_warm_one() {
        for preset in FoundationPreset::ALL {
            let warm = preset.params().warm_shift > 0.0;
            assert_eq!(warm, *preset == FoundationPreset::Warm);
        }
    }
}
