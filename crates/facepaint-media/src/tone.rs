//! Tone correction: gamma brightness and warm shift.

use facepaint_models::FoundationParams;

/// Parameters arrive as `f32`; absorbs their representation error so that
/// integral results are not truncated one step low.
const TRUNC_EPSILON: f64 = 1e-4;

/// 256-entry gamma lookup table, `trunc(255 * (i / 255)^gamma)`.
#[derive(Debug, Clone)]
pub struct GammaLut {
    table: [u8; 256],
}

impl GammaLut {
    pub fn new(gamma: f32) -> Self {
        let gamma = f64::from(gamma);
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let v = 255.0 * (i as f64 / 255.0).powf(gamma) + TRUNC_EPSILON;
            *entry = v.clamp(0.0, 255.0) as u8;
        }
        Self { table }
    }

    #[inline]
    pub fn apply(&self, value: u8) -> u8 {
        self.table[value as usize]
    }

    pub fn is_identity(&self) -> bool {
        self.table.iter().enumerate().all(|(i, &v)| i == v as usize)
    }
}

/// Per-pixel tone corrector built from foundation parameters.
#[derive(Debug, Clone)]
pub struct ToneCorrector {
    lut: GammaLut,
    warm_shift: f32,
}

impl ToneCorrector {
    pub fn new(params: &FoundationParams) -> Self {
        Self {
            lut: GammaLut::new(params.gamma),
            warm_shift: params.warm_shift,
        }
    }

    /// Gamma on every channel, then the warm boost on red.
    pub fn correct(&self, px: [u8; 3]) -> [u8; 3] {
        let mut out = px.map(|v| self.lut.apply(v));
        if self.warm_shift > 0.0 {
            out[0] = warm(out[0], self.warm_shift);
        }
        out
    }
}

#[inline]
fn warm(value: u8, shift: f32) -> u8 {
    let v = f64::from(value) * (1.0 + f64::from(shift)) + TRUNC_EPSILON;
    v.min(255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamma_one_is_identity() {
        assert!(GammaLut::new(1.0).is_identity());
        let corrector = ToneCorrector::new(&FoundationParams::IDENTITY);
        for v in [0u8, 1, 77, 128, 254, 255] {
            assert_eq!(corrector.correct([v, v, v]), [v, v, v]);
        }
    }

    #[test]
    fn test_gamma_darkens_midtones_and_keeps_extremes() {
        let lut = GammaLut::new(1.3);
        assert_eq!(lut.apply(0), 0);
        assert_eq!(lut.apply(255), 255);
        assert_eq!(lut.apply(128), 104);
        assert!(!lut.is_identity());
    }

    #[test]
    fn test_gamma_is_monotone() {
        let lut = GammaLut::new(1.45);
        for i in 1..=255u8 {
            assert!(lut.apply(i) >= lut.apply(i - 1));
        }
    }

    #[test]
    fn test_warm_shift_boosts_red_only() {
        let params = FoundationParams {
            intensity: 1.0,
            gamma: 1.0,
            warm_shift: 0.08,
        };
        let corrector = ToneCorrector::new(&params);
        // 100 * 1.08 = 108, 250 * 1.08 saturates
        assert_eq!(corrector.correct([100, 100, 100]), [108, 100, 100]);
        assert_eq!(corrector.correct([250, 10, 20]), [255, 10, 20]);
    }
}
