//! The TM-score search engine: over a set of aligned pairs, search fragment
//! lengths and start positions for the rigid transform maximizing the score,
//! then extend each candidate by iterating refit-and-reselect.

use tm_kernel::{kabsch, score_fun8, ScoreNorm, ScoreSum};

use crate::arena::WorkArena;
use crate::prelude::*;

/// Best score found and the transform realizing it.
#[derive(Clone, Copy, Debug)]
pub struct SearchResult {
    pub score: f64,
    pub transform: Transform,
}

const N_IT: usize = 20;
const N_INIT_MAX: usize = 6;

/// Fragment lengths `n, n/2, n/4, …`, floored at `min(4, n)`, at most
/// [`N_INIT_MAX`] entries.
fn fragment_lengths(n_ali: usize) -> Vec<usize> {
    let l_min = min(4, n_ali);
    let mut lengths = Vec::with_capacity(N_INIT_MAX);
    for i in 0..N_INIT_MAX - 1 {
        let l = n_ali >> i;
        if l <= l_min {
            lengths.push(l_min);
            return lengths;
        }
        lengths.push(l);
    }
    lengths.push(l_min);
    lengths
}

/// Search over the `n_ali` aligned pairs staged in `arena.xtm`/`arena.ytm`.
///
/// `simplify_step` strides the fragment-start loop (1 exhaustive, 40 fast);
/// the final start is clamped onto `n_ali − L` so the tail fragment is always
/// tried. Each fragment seeds a Kabsch fit which is scored at
/// `d0_search − 1` and then extended for up to [`N_IT`] rounds at
/// `d0_search + 1`, refitting on the selected pairs until the selection
/// repeats.
pub fn tmscore8_search(
    arena: &mut WorkArena,
    n_ali: usize,
    simplify_step: usize,
    sum: ScoreSum,
    norm: ScoreNorm,
    local_d0_search: f64,
    params: &ScoringParams,
) -> SearchResult {
    let WorkArena {
        ref mut r1,
        ref mut r2,
        ref xtm,
        ref ytm,
        ref mut xt,
        ref mut i_ali,
        ref mut k_ali,
        ..
    } = *arena;

    let mut best = SearchResult {
        score: -1.0,
        transform: Transform::identity(),
    };

    for &l_frag in &fragment_lengths(n_ali) {
        let il_max = n_ali - l_frag;
        let mut i = 0;
        loop {
            r1[..l_frag].copy_from_slice(&xtm[i..i + l_frag]);
            r2[..l_frag].copy_from_slice(&ytm[i..i + l_frag]);
            let mut tr = kabsch(&r1[..l_frag], &r2[..l_frag]).transform;
            tr.apply_all(&xtm[..n_ali], xt);

            let d = local_d0_search - 1.0;
            let score = score_fun8(&xt[..n_ali], &ytm[..n_ali], d, params, sum, norm, i_ali);
            let mut n_cut = i_ali.len();
            if score > best.score {
                best = SearchResult { score, transform: tr };
            }

            // Iterative extension on the selected subset.
            let d = local_d0_search + 1.0;
            for _ in 0..N_IT {
                k_ali.clear();
                k_ali.extend_from_slice(i_ali);
                for (k, &m) in k_ali.iter().enumerate() {
                    r1[k] = xtm[m];
                    r2[k] = ytm[m];
                }
                tr = kabsch(&r1[..n_cut], &r2[..n_cut]).transform;
                tr.apply_all(&xtm[..n_ali], xt);
                let score = score_fun8(&xt[..n_ali], &ytm[..n_ali], d, params, sum, norm, i_ali);
                if score > best.score {
                    best = SearchResult { score, transform: tr };
                }
                if i_ali == k_ali {
                    break;
                }
                n_cut = i_ali.len();
            }

            if i < il_max {
                i = min(i + simplify_step, il_max);
            } else {
                break;
            }
        }
    }

    best
}

/// Stage the aligned pairs of `map` and search over them.
#[allow(clippy::too_many_arguments)]
pub fn detailed_search(
    x: &[Vec3],
    y: &[Vec3],
    map: &Alignment,
    simplify_step: usize,
    sum: ScoreSum,
    norm: ScoreNorm,
    local_d0_search: f64,
    params: &ScoringParams,
    arena: &mut WorkArena,
) -> SearchResult {
    let n_ali = arena.stage_pairs(x, y, map);
    tmscore8_search(arena, n_ali, simplify_step, sum, norm, local_d0_search, params)
}
