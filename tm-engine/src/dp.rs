//! The Needleman–Wunsch variant shared by all alignment passes: a single
//! gap-open penalty charged when a gap follows a match cell, free gap
//! extension, free end gaps. Three score sources feed the same fill and
//! traceback: a pre-filled matrix, distances under a rigid transform, and
//! secondary-structure label identity.

use crate::arena::WorkArena;
use crate::prelude::*;

/// Global DP over the score matrix already present in `arena.score`
/// (cells are 1-based). Writes the resulting y→x map into `out`.
pub fn nw_matrix(arena: &mut WorkArena, xlen: usize, ylen: usize, gap_open: f64, out: &mut Alignment) {
    let WorkArena {
        ref score,
        ref mut path,
        ref mut val,
        ..
    } = *arena;

    for i in 0..=xlen {
        val[(i, 0)] = 0.0;
        path[(i, 0)] = false;
    }
    for j in 0..=ylen {
        val[(0, j)] = 0.0;
        path[(0, j)] = false;
    }

    for i in 1..=xlen {
        for j in 1..=ylen {
            let d = val[(i - 1, j - 1)] + score[(i, j)];

            // Gap in Y: opening after a match costs gap_open, extending is
            // free.
            let mut h = val[(i - 1, j)];
            if path[(i - 1, j)] {
                h += gap_open;
            }

            // Gap in X.
            let mut v = val[(i, j - 1)];
            if path[(i, j - 1)] {
                v += gap_open;
            }

            if d >= h && d >= v {
                path[(i, j)] = true;
                val[(i, j)] = d;
            } else {
                path[(i, j)] = false;
                val[(i, j)] = if v >= h { v } else { h };
            }
        }
    }

    // Traceback; ties repeat the fill's preferences.
    out.y2x.fill(GAP);
    let mut i = xlen;
    let mut j = ylen;
    while i > 0 && j > 0 {
        if path[(i, j)] {
            out.y2x[j - 1] = (i - 1) as i32;
            i -= 1;
            j -= 1;
        } else {
            let mut h = val[(i - 1, j)];
            if path[(i - 1, j)] {
                h += gap_open;
            }
            let mut v = val[(i, j - 1)];
            if path[(i, j - 1)] {
                v += gap_open;
            }
            if v >= h {
                j -= 1;
            } else {
                i -= 1;
            }
        }
    }
}

/// DP against distances under the given transform:
/// `score(i, j) = 1 / (1 + ‖t + u·x_i − y_j‖² / d02)`.
pub fn nw_transform(
    x: &[Vec3],
    y: &[Vec3],
    tr: &Transform,
    d02: f64,
    gap_open: f64,
    arena: &mut WorkArena,
    out: &mut Alignment,
) {
    for (i, xi) in x.iter().enumerate() {
        let xx = tr.apply(xi);
        for (j, yj) in y.iter().enumerate() {
            let dij = dist2(&xx, yj);
            arena.score[(i + 1, j + 1)] = 1.0 / (1.0 + dij / d02);
        }
    }
    nw_matrix(arena, x.len(), y.len(), gap_open, out);
}

/// DP over secondary-structure identity: score 1.0 where the labels in
/// `arena.secx`/`arena.secy` agree, 0.0 elsewhere.
pub fn nw_sec(arena: &mut WorkArena, gap_open: f64, out: &mut Alignment) {
    let xlen = arena.secx.len();
    let ylen = arena.secy.len();
    for i in 1..=xlen {
        for j in 1..=ylen {
            let hit = arena.secx[i - 1] == arena.secy[j - 1];
            arena.score[(i, j)] = if hit { 1.0 } else { 0.0 };
        }
    }
    nw_matrix(arena, xlen, ylen, gap_open, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_matrix(xlen: usize, ylen: usize, fill: impl Fn(usize, usize) -> f64, gap: f64) -> Alignment {
        let mut arena = WorkArena::new(xlen, ylen);
        for i in 1..=xlen {
            for j in 1..=ylen {
                arena.score[(i, j)] = fill(i, j);
            }
        }
        let mut out = Alignment::all_gap(ylen);
        nw_matrix(&mut arena, xlen, ylen, gap, &mut out);
        out
    }

    #[test]
    fn diagonal_matrix_aligns_diagonally() {
        let a = run_matrix(5, 5, |i, j| if i == j { 1.0 } else { 0.0 }, -1.0);
        assert_eq!(a.y2x, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn shifted_signal_produces_leading_gap() {
        // Y[j] matches X[j+2].
        let a = run_matrix(7, 5, |i, j| if i == j + 2 { 1.0 } else { 0.0 }, -1.0);
        assert_eq!(a.y2x, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn alignment_is_monotone_and_injective() {
        // An adversarial dense matrix still has to come back monotone.
        let a = run_matrix(8, 8, |i, j| ((i * 31 + j * 17) % 7) as f64 / 7.0, -0.6);
        let pairs: Vec<_> = a.pairs().collect();
        for w in pairs.windows(2) {
            assert!(w[0].0 < w[1].0);
            assert!(w[0].1 < w[1].1);
        }
    }

    #[test]
    fn transform_form_matches_identity_geometry() {
        let x: Vec<Vec3> = (0..6).map(|i| Vec3::new(3.8 * i as f64, 0.0, 0.0)).collect();
        let mut arena = WorkArena::new(6, 6);
        let mut out = Alignment::all_gap(6);
        nw_transform(&x, &x, &Transform::identity(), 16.0, -0.6, &mut arena, &mut out);
        assert_eq!(out.y2x, vec![0, 1, 2, 3, 4, 5]);
    }
}
