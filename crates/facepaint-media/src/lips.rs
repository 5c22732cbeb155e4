//! Lip region compositor.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use tracing::{debug, trace};

use facepaint_models::Rgb as Color;

use crate::blend::add_weighted;
use crate::error::MediaResult;
use crate::filters::{erode_ellipse, gaussian_blur};
use crate::landmarks::{is_collinear, PixelPoint};
use crate::mask::Mask;

/// Blend weight of the lip overlay.
pub const LIP_ALPHA: f32 = 0.4;

const SOFT_BLUR: (usize, f64) = (11, 3.0);
const FINE_BLUR: (usize, f64) = (7, 2.0);
const BLURRED_WEIGHT: f32 = 0.7;
const ERODED_WEIGHT: f32 = 0.3;

/// Drop consecutive repeats, including a closing point equal to the first.
fn distinct_vertices(points: &[PixelPoint]) -> Vec<Point<i32>> {
    let mut out: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for p in points {
        let p = Point::new(p.x, p.y);
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

/// Build the feathered lip overlay for a `width x height` image.
///
/// `points` is the closed lip contour (upper then lower). The two lip loops
/// wind in opposite directions, so only a contour whose vertices all lie on
/// one line counts as degenerate and yields a blank mask.
pub fn lip_mask(width: u32, height: u32, points: &[PixelPoint], color: Color) -> Mask {
    let vertices = distinct_vertices(points);
    if vertices.len() < 3 || is_collinear(points) {
        trace!(vertices = vertices.len(), "Degenerate lip polygon");
        return Mask::zeroed(width, height);
    }

    let mut fill = RgbImage::new(width, height);
    draw_polygon_mut(&mut fill, &vertices, Rgb(color.channels()));

    let blurred = gaussian_blur(&fill, SOFT_BLUR.0, SOFT_BLUR.1);
    let blurred = gaussian_blur(&blurred, FINE_BLUR.0, FINE_BLUR.1);
    let eroded = erode_ellipse(&blurred);

    let mut mixed = blurred;
    for (dst, &e) in mixed.iter_mut().zip(eroded.as_raw()) {
        let b = *dst as f32 / 255.0;
        let e = e as f32 / 255.0;
        *dst = ((b * BLURRED_WEIGHT + e * ERODED_WEIGHT) * 255.0).clamp(0.0, 255.0) as u8;
    }

    Mask::from_image(mixed)
}

/// Tint the lip polygon with `color`.
pub fn apply_lipstick(image: &RgbImage, points: &[PixelPoint], color: Color) -> MediaResult<RgbImage> {
    if points.is_empty() {
        return Ok(image.clone());
    }

    let (width, height) = image.dimensions();
    let mask = lip_mask(width, height, points, color);
    debug!(%color, points = points.len(), "Applying lipstick");
    add_weighted(image, mask, LIP_ALPHA)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lo: i32, hi: i32) -> Vec<PixelPoint> {
        vec![
            PixelPoint::new(lo, lo),
            PixelPoint::new(hi, lo),
            PixelPoint::new(hi, hi),
            PixelPoint::new(lo, hi),
        ]
    }

    #[test]
    fn test_distinct_vertices_drops_repeats_and_closure() {
        let mut pts = square(0, 5);
        pts.insert(1, PixelPoint::new(0, 0));
        pts.push(PixelPoint::new(0, 0));
        assert_eq!(distinct_vertices(&pts).len(), 4);
    }

    #[test]
    fn test_tints_inside_and_keeps_outside() {
        let img = RgbImage::from_pixel(100, 100, Rgb([100, 100, 100]));
        let out = apply_lipstick(&img, &square(20, 80), Color::new(255, 0, 0)).unwrap();

        assert_eq!(out.dimensions(), img.dimensions());
        assert_eq!(out.get_pixel(50, 50).0, [202, 100, 100]);
        assert_eq!(out.get_pixel(0, 0).0, [100, 100, 100]);
        assert_eq!(out.get_pixel(99, 50).0, [100, 100, 100]);
    }

    #[test]
    fn test_degenerate_polygon_is_noop() {
        let img = RgbImage::from_fn(40, 30, |x, y| Rgb([x as u8, y as u8, 9]));
        let color = Color::new(255, 0, 0);

        let collinear = vec![
            PixelPoint::new(1, 1),
            PixelPoint::new(10, 10),
            PixelPoint::new(20, 20),
        ];
        assert_eq!(apply_lipstick(&img, &collinear, color).unwrap(), img);

        let collapsed = vec![PixelPoint::new(5, 5); 41];
        assert_eq!(apply_lipstick(&img, &collapsed, color).unwrap(), img);

        assert_eq!(apply_lipstick(&img, &[], color).unwrap(), img);
    }

    /// Upper loop out along the top edge and back, then its mirror below.
    fn mirrored_lips() -> Vec<PixelPoint> {
        let upper = [
            (10, 50), (25, 35), (50, 30), (75, 35), (90, 50),
            (75, 45), (50, 44), (25, 45), (12, 50),
        ];
        upper
            .iter()
            .map(|&(x, y)| PixelPoint::new(x, y))
            .chain(upper.iter().map(|&(x, y)| PixelPoint::new(x, 100 - y)))
            .collect()
    }

    #[test]
    fn test_opposite_winding_loops_are_tinted() {
        let points = mirrored_lips();

        let img = RgbImage::from_pixel(100, 100, Rgb([100, 100, 100]));
        let out = apply_lipstick(&img, &points, Color::new(255, 0, 0)).unwrap();

        assert_ne!(out, img);
        assert!(out.get_pixel(50, 36).0[0] > 100);
        assert!(out.get_pixel(50, 64).0[0] > 100);
        assert_eq!(out.get_pixel(50, 5).0, [100, 100, 100]);
    }

    #[test]
    fn test_polygon_partly_outside_image() {
        let img = RgbImage::from_pixel(30, 30, Rgb([0, 0, 0]));
        let out = apply_lipstick(&img, &square(-10, 15), Color::new(0, 0, 200)).unwrap();
        assert_eq!(out.dimensions(), (30, 30));
        assert!(out.get_pixel(2, 2).0[2] > 0);
        assert_eq!(out.get_pixel(29, 29).0, [0, 0, 0]);
    }
}
