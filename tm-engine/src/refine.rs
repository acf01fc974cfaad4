//! Iterated DP/refit refinement of a seed alignment.

use tm_kernel::{ScoreNorm, ScoreSum};

use crate::arena::WorkArena;
use crate::dp::nw_transform;
use crate::prelude::*;
use crate::search::tmscore8_search;

const CONVERGENCE_EPS: f64 = 1e-6;

/// Alternate transform-form DP with the score search, starting from `tr`,
/// once per gap-open penalty in `gap_opens`.
///
/// Each iteration re-aligns under the current transform, then lets the
/// search move the transform. Re-alignment can lose score, so the best
/// score/map seen across all iterations is what is kept, not the last.
/// Iterations stop early once the score change falls below 1e−6.
///
/// Returns the best score; `best_map` receives the map that achieved it
/// (untouched if nothing beat the incoming `best_so_far`).
#[allow(clippy::too_many_arguments)]
pub fn dp_iter(
    x: &[Vec3],
    y: &[Vec3],
    tr: &Transform,
    gap_opens: &[f64],
    iteration_max: usize,
    params: &ScoringParams,
    local_d0_search: f64,
    arena: &mut WorkArena,
    best_map: &mut Alignment,
) -> f64 {
    let d02 = params.d0 * params.d0;
    let mut invmap = Alignment::all_gap(y.len());

    let mut best_score = -1.0;
    let mut score_old = 0.0;
    let mut tr_cur = *tr;

    for &gap_open in gap_opens {
        for iteration in 0..iteration_max {
            nw_transform(x, y, &tr_cur, d02, gap_open, arena, &mut invmap);

            let n_ali = arena.stage_pairs(x, y, &invmap);
            let r = tmscore8_search(
                arena,
                n_ali,
                40,
                ScoreSum::Cutoff8,
                ScoreNorm::Lnorm,
                local_d0_search,
                params,
            );
            tr_cur = r.transform;

            if r.score > best_score {
                best_score = r.score;
                best_map.copy_from(&invmap);
            }

            if iteration > 0 && (score_old - r.score).abs() < CONVERGENCE_EPS {
                break;
            }
            score_old = r.score;
        }
    }

    best_score
}
