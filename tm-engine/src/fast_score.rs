//! Quick three-iteration evaluation of a candidate alignment, used to rank
//! seed alignments before the expensive search runs on the winner.

use tm_kernel::kabsch;

use crate::arena::WorkArena;
use crate::prelude::*;

/// Approximate TM-score sum of `map` after at most three Kabsch refits:
/// one on all pairs, then on the pairs within `d0_search`, then within
/// `d0_search` widened by 1. Unnormalized; only used to compare candidates
/// under identical parameters.
pub fn get_score_fast(
    x: &[Vec3],
    y: &[Vec3],
    map: &Alignment,
    params: &ScoringParams,
    arena: &mut WorkArena,
) -> f64 {
    let WorkArena {
        ref mut r1,
        ref mut r2,
        ref mut xtm,
        ref mut ytm,
        ref mut dis,
        ..
    } = *arena;

    let mut n_ali = 0;
    for (i, j) in map.pairs() {
        r1[n_ali] = x[i];
        r2[n_ali] = y[j];
        xtm[n_ali] = x[i];
        ytm[n_ali] = y[j];
        n_ali += 1;
    }

    let tr = kabsch(&r1[..n_ali], &r2[..n_ali]).transform;

    let d002 = params.d0_search * params.d0_search;
    let d02 = params.d0 * params.d0;

    let mut tmscore = 0.0;
    for k in 0..n_ali {
        let di = dist2(&tr.apply(&xtm[k]), &ytm[k]);
        dis[k] = di;
        tmscore += 1.0 / (1.0 + di / d02);
    }

    // Collect the pairs within the (possibly relaxed) squared threshold.
    let select = |dis: &[f64], r1: &mut [Vec3], r2: &mut [Vec3], d002t: f64| -> usize {
        let mut d002t = d002t;
        loop {
            let mut j = 0;
            for k in 0..n_ali {
                if dis[k] <= d002t {
                    r1[j] = xtm[k];
                    r2[j] = ytm[k];
                    j += 1;
                }
            }
            if j < 3 && n_ali > 3 {
                d002t += 0.5;
            } else {
                return j;
            }
        }
    };

    let j = select(dis, r1, r2, d002);
    let (tmscore1, tmscore2);
    if j != n_ali {
        let tr = kabsch(&r1[..j], &r2[..j]).transform;
        let mut s = 0.0;
        for k in 0..n_ali {
            let di = dist2(&tr.apply(&xtm[k]), &ytm[k]);
            dis[k] = di;
            s += 1.0 / (1.0 + di / d02);
        }
        tmscore1 = s;

        // Third pass with the threshold widened by 1.
        let j = select(dis, r1, r2, d002 + 1.0);
        let tr = kabsch(&r1[..j], &r2[..j]).transform;
        let mut s = 0.0;
        for k in 0..n_ali {
            let di = dist2(&tr.apply(&xtm[k]), &ytm[k]);
            s += 1.0 / (1.0 + di / d02);
        }
        tmscore2 = s;
    } else {
        tmscore1 = tmscore;
        tmscore2 = tmscore;
    }

    tmscore.max(tmscore1).max(tmscore2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_map_scores_all_pairs() {
        let n = 12;
        let x: Vec<Vec3> = (0..n)
            .map(|i| Vec3::new(3.8 * i as f64, (i % 3) as f64, 0.0))
            .collect();
        let mut arena = WorkArena::new(n, n);
        let map = Alignment {
            y2x: (0..n as i32).collect(),
        };
        let params = ScoringParams::for_search(n, n);
        let s = get_score_fast(&x, &x, &map, &params, &mut arena);
        assert!((s - n as f64).abs() < 1e-9);
    }

    #[test]
    fn better_map_scores_higher() {
        let n = 20;
        let x: Vec<Vec3> = (0..n)
            .map(|i| Vec3::new(3.8 * i as f64, (i * i % 7) as f64, 0.5 * i as f64))
            .collect();
        let mut arena = WorkArena::new(n, n);
        let params = ScoringParams::for_search(n, n);

        let good = Alignment {
            y2x: (0..n as i32).collect(),
        };
        // Offset map: half the pairs, geometrically inconsistent.
        let mut off = Alignment::all_gap(n);
        for j in 0..n / 2 {
            off.y2x[j] = (j + n / 2) as i32;
        }
        let s_good = get_score_fast(&x, &x, &good, &params, &mut arena);
        let s_off = get_score_fast(&x, &x, &off, &params, &mut arena);
        assert!(s_good > s_off);
    }
}
