use tm_types::{dist2, ScoringParams, Vec3};

/// Which pairs enter the score sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreSum {
    /// Sum `1/(1 + d²/d0²)` over all pairs.
    All,
    /// Sum only over pairs with `d ≤ score_d8`.
    Cutoff8,
}

/// Which length the score sum is divided by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreNorm {
    /// Divide by `params.lnorm`.
    Lnorm,
    /// Divide by the number of scored pairs (the standard TM-score variant
    /// used for user-supplied alignments).
    AlignedPairs,
}

/// Score `n` indexed point pairs under the current superposition and collect
/// the pairs closer than `d`.
///
/// `x` must already be transformed. `selected` receives the ordered indices
/// of pairs with `d_i < d`; when fewer than 3 qualify and `n > 3`, the
/// selection threshold is widened by 0.5 Å per pass until enough do. The
/// `score_d8` cutoff is never widened, so the returned score is identical
/// across passes; the selection is what the relaxation is for.
pub fn score_fun8(
    x: &[Vec3],
    y: &[Vec3],
    d: f64,
    params: &ScoringParams,
    sum: ScoreSum,
    norm: ScoreNorm,
    selected: &mut Vec<usize>,
) -> f64 {
    let n = x.len();
    debug_assert_eq!(n, y.len());
    let d02 = params.d0 * params.d0;
    let d8_cut = params.score_d8 * params.score_d8;

    let mut d_tmp = d * d;
    let mut inc = 0;
    let mut score_sum;
    loop {
        selected.clear();
        score_sum = 0.0;
        for i in 0..n {
            let di = dist2(&x[i], &y[i]);
            if di < d_tmp {
                selected.push(i);
            }
            match sum {
                ScoreSum::Cutoff8 => {
                    if di <= d8_cut {
                        score_sum += 1.0 / (1.0 + di / d02);
                    }
                }
                ScoreSum::All => score_sum += 1.0 / (1.0 + di / d02),
            }
        }
        if selected.len() < 3 && n > 3 {
            inc += 1;
            let dinc = d + inc as f64 * 0.5;
            d_tmp = dinc * dinc;
        } else {
            break;
        }
    }

    match norm {
        ScoreNorm::Lnorm => score_sum / params.lnorm,
        ScoreNorm::AlignedPairs => score_sum / n as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ScoringParams {
        ScoringParams::for_final(100.0)
    }

    #[test]
    fn perfect_pairs_score_full() {
        let x: Vec<Vec3> = (0..10).map(|i| Vec3::new(i as f64, 0.0, 0.0)).collect();
        let mut sel = Vec::new();
        let s = score_fun8(
            &x,
            &x,
            5.0,
            &params(),
            ScoreSum::Cutoff8,
            ScoreNorm::Lnorm,
            &mut sel,
        );
        assert_eq!(sel.len(), 10);
        assert!((s - 10.0 / 100.0).abs() < 1e-12);
    }

    #[test]
    fn selection_threshold_relaxes() {
        // All pairs 6 Å apart, threshold 1 Å: the selection must widen until
        // at least 3 pairs qualify, but the d8 cutoff stays put.
        let x: Vec<Vec3> = (0..8).map(|i| Vec3::new(3.8 * i as f64, 0.0, 0.0)).collect();
        let y: Vec<Vec3> = x.iter().map(|v| v + Vec3::new(0.0, 6.0, 0.0)).collect();
        let mut sel = Vec::new();
        let p = params();
        let s_narrow = score_fun8(&x, &y, 1.0, &p, ScoreSum::Cutoff8, ScoreNorm::Lnorm, &mut sel);
        assert!(sel.len() >= 3);
        let s_wide = score_fun8(&x, &y, 7.0, &p, ScoreSum::Cutoff8, ScoreNorm::Lnorm, &mut sel);
        assert!((s_narrow - s_wide).abs() < 1e-12);
    }

    #[test]
    fn per_pair_normalization() {
        let x: Vec<Vec3> = (0..4).map(|i| Vec3::new(i as f64, 0.0, 0.0)).collect();
        let mut sel = Vec::new();
        let s = score_fun8(
            &x,
            &x,
            5.0,
            &params(),
            ScoreSum::All,
            ScoreNorm::AlignedPairs,
            &mut sel,
        );
        assert!((s - 1.0).abs() < 1e-12);
    }
}
