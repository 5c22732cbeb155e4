//! Landmark normalization: face mesh coordinates to pixel coordinates.

use facepaint_models::LandmarkSet;

/// Integer pixel coordinate, possibly outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel coordinates are clamped to this magnitude before the integer cast.
pub const PIXEL_LIMIT: f32 = 1_048_576.0;

/// Map the selected landmarks to pixel coordinates for a `height x width` image.
///
/// Returns one point per selector index, in selector order, with
/// `x = trunc(lm.x * width)` and `y = trunc(lm.y * height)`. When no face
/// was detected the result is empty and callers treat the region as a no-op.
/// Products beyond [`PIXEL_LIMIT`] are clamped to it.
pub fn normalize_landmarks(
    landmarks: Option<&LandmarkSet>,
    height: u32,
    width: u32,
    selector: &[usize],
) -> Vec<PixelPoint> {
    let Some(landmarks) = landmarks else {
        return Vec::new();
    };

    selector
        .iter()
        .map(|&i| {
            let lm = landmarks.get(i);
            PixelPoint::new(to_pixel(lm.x, width), to_pixel(lm.y, height))
        })
        .collect()
}

fn to_pixel(coord: f32, extent: u32) -> i32 {
    (coord * extent as f32).clamp(-PIXEL_LIMIT, PIXEL_LIMIT) as i32
}

/// True when every point lies on one line (or there are fewer than 3).
pub fn is_collinear(points: &[PixelPoint]) -> bool {
    let Some((&origin, rest)) = points.split_first() else {
        return true;
    };
    let Some(&pivot) = rest.iter().find(|p| **p != origin) else {
        return true;
    };

    let (dx, dy) = (
        i64::from(pivot.x) - i64::from(origin.x),
        i64::from(pivot.y) - i64::from(origin.y),
    );
    rest.iter().all(|p| {
        let (ex, ey) = (
            i64::from(p.x) - i64::from(origin.x),
            i64::from(p.y) - i64::from(origin.y),
        );
        i128::from(dx) * i128::from(ey) == i128::from(dy) * i128::from(ex)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use facepaint_models::regions::{CHEEKS, LIPS};
    use facepaint_models::Landmark;

    #[test]
    fn test_absent_landmarks_yield_empty() {
        assert!(normalize_landmarks(None, 480, 640, LIPS).is_empty());
    }

    #[test]
    fn test_scales_and_truncates_in_selector_order() {
        let set = LandmarkSet::uniform(Landmark::new(0.0, 0.0, 0.0))
            .with_point(425, Landmark::new(0.7, 0.55, 0.1))
            .with_point(205, Landmark::new(0.2999, 0.5, -0.1));

        let points = normalize_landmarks(Some(&set), 200, 100, CHEEKS);
        assert_eq!(points, vec![PixelPoint::new(70, 110), PixelPoint::new(29, 100)]);
    }

    #[test]
    fn test_one_point_per_index() {
        let set = LandmarkSet::uniform(Landmark::new(0.5, 0.5, 0.0));
        let points = normalize_landmarks(Some(&set), 10, 10, LIPS);
        assert_eq!(points.len(), LIPS.len());
        assert!(points.iter().all(|p| *p == PixelPoint::new(5, 5)));
    }

    #[test]
    fn test_collinearity() {
        let line = [
            PixelPoint::new(1, 1),
            PixelPoint::new(1, 1),
            PixelPoint::new(4, 7),
            PixelPoint::new(-2, -5),
        ];
        assert!(is_collinear(&line));
        assert!(is_collinear(&[PixelPoint::new(3, 3); 5]));
        assert!(is_collinear(&[]));

        let bent = [PixelPoint::new(0, 0), PixelPoint::new(10, 0), PixelPoint::new(10, 1)];
        assert!(!is_collinear(&bent));

        let (min, max) = (i32::MIN, i32::MAX);
        let extreme = [PixelPoint::new(min, min), PixelPoint::new(max, max), PixelPoint::new(0, 0)];
        assert!(is_collinear(&extreme));
        let corners = [PixelPoint::new(min, min), PixelPoint::new(max, min), PixelPoint::new(max, max)];
        assert!(!is_collinear(&corners));
    }

    #[test]
    fn test_out_of_frame_products_are_clamped() {
        let set = LandmarkSet::uniform(Landmark::new(0.5, 0.5, 0.0))
            .with_point(CHEEKS[0], Landmark::new(1.9, -0.9, 0.0));
        let points = normalize_landmarks(Some(&set), 4_000_000, 4_000_000, CHEEKS);
        assert_eq!(points[0], PixelPoint::new(PIXEL_LIMIT as i32, -(PIXEL_LIMIT as i32)));
        assert_eq!(points[1], PixelPoint::new(1_048_576, 1_048_576));
    }
}
