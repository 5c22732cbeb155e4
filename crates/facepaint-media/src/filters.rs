//! Image filters used by the region builders.
//!
//! - Separable Gaussian blur with an explicit kernel size and sigma
//! - Morphological erosion with a 5x5 elliptical footprint
//! - Gaussian vignette weighting
//!
//! Borders are handled like OpenCV defaults: the blur mirrors without
//! repeating the edge sample, erosion ignores out-of-bounds neighbours.

use image::RgbImage;

/// 1-D Gaussian kernel of `size` taps, normalized to sum 1.
///
/// A non-positive `sigma` is derived from the size as
/// `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
    if size == 0 {
        return Vec::new();
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };

    let center = (size as f64 - 1.0) / 2.0;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (-(d * d) / denom).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Mirror an out-of-range index back into `0..len` (`dcb|abcd|cba`).
#[inline]
fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let m = i.rem_euclid(period);
    if m >= len as isize {
        (period - m) as usize
    } else {
        m as usize
    }
}

/// Blur an RGB buffer with a `ksize x ksize` Gaussian.
///
/// `ksize` must be odd; an even size is bumped to the next odd one.
pub fn gaussian_blur(src: &RgbImage, ksize: usize, sigma: f64) -> RgbImage {
    let (width, height) = src.dimensions();
    if width == 0 || height == 0 {
        return src.clone();
    }

    let ksize = if ksize % 2 == 0 { ksize + 1 } else { ksize };
    let kernel = gaussian_kernel(ksize, sigma);
    let half = (ksize / 2) as isize;
    let (w, h) = (width as usize, height as usize);
    let data = src.as_raw();

    // Horizontal pass
    let mut tmp = vec![0f64; w * h * 3];
    for y in 0..h {
        let row = y * w * 3;
        for x in 0..w {
            let mut acc = [0f64; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - half, w);
                let base = row + sx * 3;
                for c in 0..3 {
                    acc[c] += data[base + c] as f64 * weight;
                }
            }
            tmp[row + x * 3..row + x * 3 + 3].copy_from_slice(&acc);
        }
    }

    // Vertical pass
    let mut out = vec![0u8; w * h * 3];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f64; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - half, h);
                let base = (sy * w + x) * 3;
                for c in 0..3 {
                    acc[c] += tmp[base + c] * weight;
                }
            }
            let base = (y * w + x) * 3;
            for c in 0..3 {
                out[base + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    RgbImage::from_raw(width, height, out).unwrap_or_else(|| src.clone())
}

/// Offsets of the 5x5 elliptical structuring element.
///
/// ```text
/// . . x . .
/// x x x x x
/// x x x x x
/// x x x x x
/// . . x . .
/// ```
const ELLIPSE_5X5: [(isize, isize); 17] = [
    (0, -2),
    (-2, -1),
    (-1, -1),
    (0, -1),
    (1, -1),
    (2, -1),
    (-2, 0),
    (-1, 0),
    (0, 0),
    (1, 0),
    (2, 0),
    (-2, 1),
    (-1, 1),
    (0, 1),
    (1, 1),
    (2, 1),
    (0, 2),
];

/// One iteration of per-channel erosion with the 5x5 ellipse.
pub fn erode_ellipse(src: &RgbImage) -> RgbImage {
    let (width, height) = src.dimensions();
    let (w, h) = (width as isize, height as isize);
    let mut out = RgbImage::new(width, height);

    for y in 0..h {
        for x in 0..w {
            let mut min = [u8::MAX; 3];
            for &(dx, dy) in &ELLIPSE_5X5 {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let px = src.get_pixel(nx as u32, ny as u32).0;
                for c in 0..3 {
                    min[c] = min[c].min(px[c]);
                }
            }
            out.put_pixel(x as u32, y as u32, image::Rgb(min));
        }
    }

    out
}

/// Row-major `width x height` weights: outer product of two Gaussian
/// kernels, scaled so the peak is 1.
pub fn vignette_weights(width: usize, height: usize, sigma: f64) -> Vec<f64> {
    let kx = gaussian_kernel(width, sigma);
    let ky = gaussian_kernel(height, sigma);

    let mut weights = Vec::with_capacity(width * height);
    for wy in &ky {
        for wx in &kx {
            weights.push(wy * wx);
        }
    }

    let peak = weights.iter().cloned().fold(0.0, f64::max);
    if peak > 0.0 {
        for v in &mut weights {
            *v /= peak;
        }
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(7, 2.0);
        assert_eq!(k.len(), 7);
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for i in 0..3 {
            assert!((k[i] - k[6 - i]).abs() < 1e-12);
        }
        assert!(k[3] > k[2] && k[2] > k[1]);
    }

    #[test]
    fn test_kernel_derives_sigma_from_size() {
        let explicit = gaussian_kernel(11, 0.3 * (5.0 - 1.0) + 0.8);
        let derived = gaussian_kernel(11, 0.0);
        assert_eq!(explicit, derived);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(-7, 3), 1);
        assert_eq!(reflect_101(4, 1), 0);
    }

    #[test]
    fn test_blur_keeps_uniform_image() {
        let img = RgbImage::from_pixel(9, 6, Rgb([40, 128, 250]));
        let blurred = gaussian_blur(&img, 11, 3.0);
        assert_eq!(blurred, img);
    }

    #[test]
    fn test_blur_spreads_single_pixel() {
        let mut img = RgbImage::new(15, 15);
        img.put_pixel(7, 7, Rgb([255, 0, 0]));
        let blurred = gaussian_blur(&img, 7, 2.0);

        let center = blurred.get_pixel(7, 7).0[0];
        let near = blurred.get_pixel(8, 7).0[0];
        let far = blurred.get_pixel(10, 7).0[0];
        assert!(center < 255);
        assert!(center > near && near > far);
        assert_eq!(blurred.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(blurred.get_pixel(7, 7).0[1], 0);
    }

    #[test]
    fn test_erode_shrinks_square() {
        let mut img = RgbImage::new(12, 12);
        for y in 3..9 {
            for x in 3..9 {
                img.put_pixel(x, y, Rgb([200, 100, 50]));
            }
        }
        let eroded = erode_ellipse(&img);

        assert_eq!(eroded.get_pixel(5, 5).0, [200, 100, 50]);
        assert_eq!(eroded.get_pixel(6, 6).0, [200, 100, 50]);
        // Within two pixels of the edge the footprint reaches background.
        assert_eq!(eroded.get_pixel(3, 5).0, [0, 0, 0]);
        assert_eq!(eroded.get_pixel(4, 4).0, [0, 0, 0]);
    }

    #[test]
    fn test_erode_ignores_border() {
        let img = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        assert_eq!(erode_ellipse(&img), img);
    }

    #[test]
    fn test_vignette_peaks_at_center() {
        let w = vignette_weights(9, 5, 2.0);
        assert_eq!(w.len(), 45);
        let center = w[2 * 9 + 4];
        assert!((center - 1.0).abs() < 1e-12);
        assert!(w[0] < w[2 * 9 + 3]);
        assert!(w.iter().all(|&v| v > 0.0 && v <= 1.0));
    }
}
