//! Facial landmark types.
//!
//! A [`LandmarkSet`] is the 468-point face mesh produced by the external
//! detector, with `x`/`y` normalized to the image size. Absence of a face is
//! modelled as `Option<LandmarkSet>::None`, never as an empty set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of points in a face mesh.
pub const LANDMARK_COUNT: usize = 468;

/// Accepted range for normalized `x`/`y`. Meshes may overhang the frame a
/// little, anything further is not a face in this image.
pub const COORD_RANGE: std::ops::RangeInclusive<f32> = -1.0..=2.0;

/// Single face landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Landmark {
    fn from(p: [f32; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

impl From<Landmark> for [f32; 3] {
    fn from(p: Landmark) -> Self {
        [p.x, p.y, p.z]
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("Expected {expected} landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("Landmark {index} lies outside the normalized range [-1, 2]")]
    OutOfRange { index: usize },
}

/// The full ordered face mesh for one detected face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Validate and wrap a detector result.
    pub fn new(points: Vec<Landmark>) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(LandmarkError::NonFinite { index });
        }
        if let Some(index) = points
            .iter()
            .position(|p| !(COORD_RANGE.contains(&p.x) && COORD_RANGE.contains(&p.y)))
        {
            return Err(LandmarkError::OutOfRange { index });
        }
        Ok(Self { points })
    }

    /// A set with every point at the same position.
    pub fn uniform(point: Landmark) -> Self {
        Self {
            points: vec![point; LANDMARK_COUNT],
        }
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Landmark at `index`. Panics if `index >= LANDMARK_COUNT`.
    pub fn get(&self, index: usize) -> Landmark {
        self.points[index]
    }

    /// Replace a single point, keeping the set size fixed.
    pub fn with_point(mut self, index: usize, point: Landmark) -> Self {
        self.points[index] = point;
        self
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = LandmarkError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}

/// Region selectors: fixed index lists into the face mesh.
pub mod regions {
    /// Upper lip contour.
    pub const UPPER_LIP: &[usize] = &[
        61, 185, 40, 39, 37, 0, 267, 269, 270, 408, 415, 272, 271, 268, 12, 38, 41, 42, 191, 78, 76,
    ];

    /// Lower lip contour.
    pub const LOWER_LIP: &[usize] = &[
        61, 146, 91, 181, 84, 17, 314, 405, 320, 307, 308, 324, 318, 402, 317, 14, 87, 178, 88, 95,
    ];

    /// Upper followed by lower lip, forming one closed polygon.
    pub const LIPS: &[usize] = &[
        61, 185, 40, 39, 37, 0, 267, 269, 270, 408, 415, 272, 271, 268, 12, 38, 41, 42, 191, 78, 76,
        61, 146, 91, 181, 84, 17, 314, 405, 320, 307, 308, 324, 318, 402, 317, 14, 87, 178, 88, 95,
    ];

    /// Cheek anchors (left, right).
    pub const CHEEKS: &[usize] = &[425, 205];
}
