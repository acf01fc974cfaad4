use serde::{Deserialize, Serialize};

/// The scoring length scales for one pass. The search and the final
/// per-normalization passes derive these differently; algorithms receive an
/// immutable bundle and never re-derive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    /// Distance scale inside the TM-score formula.
    pub d0: f64,
    /// Floor for `d0`.
    pub d0_min: f64,
    /// Local search scale, `d0` clamped into [4.5, 8.0].
    pub d0_search: f64,
    /// Distance cutoff for the 8-variant of the score sum.
    pub score_d8: f64,
    /// Normalization length.
    pub lnorm: f64,
}

fn d0_of(lnorm: f64) -> f64 {
    1.24 * (lnorm - 15.0).cbrt() - 1.8
}

impl ScoringParams {
    /// Parameters for the alignment search, from the two chain lengths.
    pub fn for_search(xlen: usize, ylen: usize) -> Self {
        let lnorm = xlen.min(ylen) as f64;
        let d0 = if lnorm <= 19.0 { 0.168 } else { d0_of(lnorm) };
        // The search runs with a widened scale.
        let d0_min = d0 + 0.8;
        let d0 = d0_min;
        ScoringParams {
            d0,
            d0_min,
            d0_search: d0.clamp(4.5, 8.0),
            score_d8: 1.5 * lnorm.powf(0.3) + 3.5,
            lnorm,
        }
    }

    /// Parameters for a final scoring pass under the given normalization
    /// length.
    pub fn for_final(lnorm: f64) -> Self {
        let d0_min = 0.5;
        let d0 = if lnorm <= 21.0 {
            0.5
        } else {
            d0_of(lnorm).max(d0_min)
        };
        ScoringParams {
            d0,
            d0_min,
            d0_search: d0.clamp(4.5, 8.0),
            score_d8: 1.5 * lnorm.powf(0.3) + 3.5,
            lnorm,
        }
    }

    /// Parameters for a final pass scaled by a user-chosen `d0`.
    pub fn for_scale(lnorm: f64, d0_scale: f64) -> Self {
        let mut p = Self::for_final(lnorm);
        p.d0 = d0_scale;
        p.d0_search = d0_scale.clamp(4.5, 8.0);
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_clamp() {
        let p = ScoringParams::for_search(100, 100);
        assert!((p.lnorm - 100.0).abs() < 1e-12);
        // 1.24 * 85^(1/3) - 1.8 + 0.8
        assert!((p.d0 - (1.24 * 85f64.cbrt() - 1.0)).abs() < 1e-9);
        assert!(p.d0_search >= 4.5 && p.d0_search <= 8.0);
    }

    #[test]
    fn short_chains_use_the_floor() {
        let p = ScoringParams::for_final(10.0);
        assert_eq!(p.d0, 0.5);
        let p = ScoringParams::for_search(12, 15);
        assert!((p.d0 - (0.168 + 0.8)).abs() < 1e-12);
    }

    #[test]
    fn scale_overrides_d0_only() {
        let p = ScoringParams::for_scale(100.0, 3.0);
        let f = ScoringParams::for_final(100.0);
        assert_eq!(p.d0, 3.0);
        assert_eq!(p.lnorm, f.lnorm);
        assert_eq!(p.d0_search, 4.5);
    }
}
