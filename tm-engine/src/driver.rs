//! The alignment driver: runs every seed generator, routes each through the
//! refinement loop, keeps the best transform by TM-score, then produces the
//! final scores under the requested normalizations.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tm_kernel::{kabsch, ScoreNorm, ScoreSum};

use crate::arena::WorkArena;
use crate::error::AlignError;
use crate::prelude::*;
use crate::refine::dp_iter;
use crate::search::{detailed_search, tmscore8_search};
use crate::seeds::{get_initial, get_initial5, get_initial_fgt, get_initial_ss, get_initial_ssplus};

/// How a user-supplied seed alignment is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedMode {
    /// Score the seed, then still run every generator and refinement.
    Refine,
    /// Stick to the seed; no generator runs.
    Stick,
}

/// A user-supplied initial alignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedAlignment {
    pub map: Alignment,
    pub mode: SeedMode,
}

/// Options for one alignment run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlignOptions {
    /// Coarser seed stepping and a 2-iteration refinement cap.
    pub fast: bool,
    /// Also report the score normalized by the average chain length.
    pub norm_by_average: bool,
    /// Also report the score normalized by this length.
    pub user_lnorm: Option<f64>,
    /// Also report the score under this fixed `d0`.
    pub user_d0: Option<f64>,
    pub seed: Option<SeedAlignment>,
}

/// Score of a user-supplied seed alignment before refinement.
#[derive(Clone, Copy, Debug)]
pub struct SeedScore {
    pub tm: f64,
    pub n_ali: usize,
    pub rmsd: f64,
}

/// Everything the driver reports for one run.
#[derive(Clone, Debug)]
pub struct AlignResult {
    /// The transform superposing X onto Y.
    pub transform: Transform,
    /// The final y→x alignment (all aligned pairs, before the d8 cut).
    pub alignment: Alignment,
    /// X and Y indices of the pairs within `score_d8` under the transform.
    pub m1: Vec<usize>,
    pub m2: Vec<usize>,
    /// Aligned pairs before / after the d8 cut.
    pub n_ali: usize,
    pub n_ali8: usize,
    /// RMSD over the reported pairs under their optimal superposition.
    pub rmsd: f64,

    /// TM-score normalized by the length of Y, and its `d0`.
    pub tm_y: f64,
    pub d0_y: f64,
    /// TM-score normalized by the length of X, and its `d0`.
    pub tm_x: f64,
    pub d0_x: f64,
    /// TM-score normalized by the average length (requested via options).
    pub tm_avg: Option<(f64, f64)>,
    /// TM-score normalized by a user length (score, d0).
    pub tm_user: Option<(f64, f64)>,
    /// TM-score under a user `d0` scale.
    pub tm_d0: Option<f64>,

    /// The score/normalization/d0 triple a report should lead with.
    pub tm_display: f64,
    pub lnorm_display: f64,
    pub d0_display: f64,
    /// Display cutoff separating close pairs in the alignment listing.
    pub d0_out: f64,

    /// Present when a seed alignment was supplied.
    pub seed_score: Option<SeedScore>,
}

/// Score a user map the standard way: fresh Y-length parameters, exhaustive
/// search, per-pair normalization scaled back by `n/Lnorm`.
fn standard_tmscore(
    x: &[Vec3],
    y: &[Vec3],
    map: &Alignment,
    arena: &mut WorkArena,
) -> SeedScore {
    let lnorm = y.len() as f64;
    let mut p = ScoringParams::for_final(lnorm);
    // This pass searches at the unclamped scale.
    p.d0_search = p.d0;

    let n_ali = arena.stage_pairs(x, y, map);
    let rmsd = kabsch(&arena.xtm[..n_ali], &arena.ytm[..n_ali]).msd.sqrt();
    let r = tmscore8_search(
        arena,
        n_ali,
        1,
        ScoreSum::All,
        ScoreNorm::AlignedPairs,
        p.d0_search,
        &p,
    );
    SeedScore {
        tm: r.score * n_ali as f64 / lnorm,
        n_ali,
        rmsd,
    }
}

/// Align structure X onto structure Y and report scores, alignment and the
/// realizing transform.
pub fn align(x: &Structure, y: &Structure, opts: &AlignOptions) -> Result<AlignResult, AlignError> {
    let xlen = x.len();
    let ylen = y.len();
    if min(xlen, ylen) <= 5 {
        return Err(AlignError::StructureTooShort {
            len: min(xlen, ylen),
        });
    }
    let xc = x.coords();
    let yc = y.coords();

    let params = ScoringParams::for_search(xlen, ylen);
    let local_d0_search = params.d0_search;
    let mut arena = WorkArena::new(xlen, ylen);

    let fast = opts.fast;
    let iter_max = if fast { 2 } else { 30 };
    let ddcc = if params.lnorm <= 40.0 { 0.1 } else { 0.4 };

    let mut best_map = Alignment::all_gap(ylen);
    let mut invmap = Alignment::all_gap(ylen);
    let mut tmmax = -1.0f64;
    let mut seed_score = None;

    let stick_seed = opts
        .seed
        .as_ref()
        .filter(|s| s.mode == SeedMode::Stick);
    let stick = stick_seed.is_some();

    if let Some(seed) = stick_seed {
        // Stick to the user's alignment; generators are skipped entirely.
        invmap.copy_from(&seed.map);
        seed_score = Some(standard_tmscore(xc, yc, &invmap, &mut arena));

        let k = invmap.n_aligned();
        let r = detailed_search(
            xc,
            yc,
            &invmap,
            40,
            ScoreSum::Cutoff8,
            ScoreNorm::AlignedPairs,
            local_d0_search,
            &params,
            &mut arena,
        );
        let tm = r.score * k as f64 / params.lnorm;
        if tm > tmmax {
            tmmax = tm;
            best_map.copy_from(&invmap);
        }
    } else {
        // Seed 1: gapless threading.
        get_initial(xc, yc, fast, &params, &mut arena, &mut best_map);
        let r = detailed_search(
            xc,
            yc,
            &best_map,
            40,
            ScoreSum::Cutoff8,
            ScoreNorm::Lnorm,
            local_d0_search,
            &params,
            &mut arena,
        );
        if r.score > tmmax {
            tmmax = r.score;
        }
        debug!("seed gapless threading: TM {:.5}", r.score);
        let tm = dp_iter(
            xc,
            yc,
            &r.transform,
            &[-0.6, 0.0],
            iter_max,
            &params,
            local_d0_search,
            &mut arena,
            &mut invmap,
        );
        if tm > tmmax {
            tmmax = tm;
            best_map.copy_from(&invmap);
        }

        // Seed 2: secondary structure.
        get_initial_ss(xc, yc, &mut arena, &mut invmap);
        let r = detailed_search(
            xc,
            yc,
            &invmap,
            40,
            ScoreSum::Cutoff8,
            ScoreNorm::Lnorm,
            local_d0_search,
            &params,
            &mut arena,
        );
        if r.score > tmmax {
            tmmax = r.score;
            best_map.copy_from(&invmap);
        }
        debug!("seed secondary structure: TM {:.5}", r.score);
        if r.score > tmmax * 0.2 {
            let tm = dp_iter(
                xc,
                yc,
                &r.transform,
                &[-0.6, 0.0],
                iter_max,
                &params,
                local_d0_search,
                &mut arena,
                &mut invmap,
            );
            if tm > tmmax {
                tmmax = tm;
                best_map.copy_from(&invmap);
            }
        }

        // Seed 3: local superposition.
        if get_initial5(xc, yc, fast, &params, &mut arena, &mut invmap) {
            let r = detailed_search(
                xc,
                yc,
                &invmap,
                40,
                ScoreSum::Cutoff8,
                ScoreNorm::Lnorm,
                local_d0_search,
                &params,
                &mut arena,
            );
            if r.score > tmmax {
                tmmax = r.score;
                best_map.copy_from(&invmap);
            }
            debug!("seed local superposition: TM {:.5}", r.score);
            if r.score > tmmax * ddcc {
                let tm = dp_iter(
                    xc,
                    yc,
                    &r.transform,
                    &[-0.6, 0.0],
                    2,
                    &params,
                    local_d0_search,
                    &mut arena,
                    &mut invmap,
                );
                if tm > tmmax {
                    tmmax = tm;
                    best_map.copy_from(&invmap);
                }
            }
        } else {
            warn!("initial alignment from local superposition failed");
        }

        // Seed 4: current best alignment plus secondary structure.
        get_initial_ssplus(xc, yc, &best_map, &params, &mut arena, &mut invmap);
        let r = detailed_search(
            xc,
            yc,
            &invmap,
            40,
            ScoreSum::Cutoff8,
            ScoreNorm::Lnorm,
            local_d0_search,
            &params,
            &mut arena,
        );
        if r.score > tmmax {
            tmmax = r.score;
            best_map.copy_from(&invmap);
        }
        debug!("seed ss-plus: TM {:.5}", r.score);
        if r.score > tmmax * ddcc {
            let tm = dp_iter(
                xc,
                yc,
                &r.transform,
                &[-0.6, 0.0],
                iter_max,
                &params,
                local_d0_search,
                &mut arena,
                &mut invmap,
            );
            if tm > tmmax {
                tmmax = tm;
                best_map.copy_from(&invmap);
            }
        }

        // Seed 5: fragment gapless threading.
        get_initial_fgt(
            xc,
            yc,
            x.resno(),
            y.resno(),
            fast,
            &params,
            &mut arena,
            &mut invmap,
        );
        let r = detailed_search(
            xc,
            yc,
            &invmap,
            40,
            ScoreSum::Cutoff8,
            ScoreNorm::Lnorm,
            local_d0_search,
            &params,
            &mut arena,
        );
        if r.score > tmmax {
            tmmax = r.score;
            best_map.copy_from(&invmap);
        }
        debug!("seed fragment threading: TM {:.5}", r.score);
        if r.score > tmmax * ddcc {
            let tm = dp_iter(
                xc,
                yc,
                &r.transform,
                &[0.0],
                2,
                &params,
                local_d0_search,
                &mut arena,
                &mut invmap,
            );
            if tm > tmmax {
                tmmax = tm;
                best_map.copy_from(&invmap);
            }
        }

        // A soft user seed is scored like a sticky one, then refined.
        if let Some(seed) = &opts.seed {
            invmap.copy_from(&seed.map);
            seed_score = Some(standard_tmscore(xc, yc, &invmap, &mut arena));

            let k = invmap.n_aligned();
            let r = detailed_search(
                xc,
                yc,
                &invmap,
                40,
                ScoreSum::Cutoff8,
                ScoreNorm::AlignedPairs,
                local_d0_search,
                &params,
                &mut arena,
            );
            let tm = r.score * k as f64 / params.lnorm;
            if tm > tmmax {
                tmmax = tm;
                best_map.copy_from(&invmap);
            }
            let tm = dp_iter(
                xc,
                yc,
                &r.transform,
                &[-0.6, 0.0],
                iter_max,
                &params,
                local_d0_search,
                &mut arena,
                &mut invmap,
            );
            if tm > tmmax {
                tmmax = tm;
                best_map.copy_from(&invmap);
            }
        }
    }

    debug!("best seed TM {:.5}", tmmax);
    if !best_map.has_aligned() {
        return Err(AlignError::NoAlignment);
    }

    // The alignment is fixed from here on. One exhaustive search pins down
    // the transform used to select the reported pairs.
    let r = detailed_search(
        xc,
        yc,
        &best_map,
        if fast { 40 } else { 1 },
        ScoreSum::Cutoff8,
        ScoreNorm::AlignedPairs,
        local_d0_search,
        &params,
        &mut arena,
    );
    let tr_final = r.transform;

    // Keep the pairs within score_d8 of each other under that transform
    // (all pairs when sticking to a user alignment).
    tr_final.apply_all(xc, &mut arena.xt);
    let mut m1 = Vec::new();
    let mut m2 = Vec::new();
    let mut n_ali = 0;
    let mut k = 0;
    for j in 0..ylen {
        if let Some(i) = best_map.get(j) {
            n_ali += 1;
            let xi_t = arena.xt[i];
            let d = dist2(&xi_t, &yc[j]).sqrt();
            if d <= params.score_d8 || stick {
                m1.push(i);
                m2.push(j);
                arena.xtm[k] = xc[i];
                arena.ytm[k] = yc[j];
                arena.r1[k] = xi_t;
                arena.r2[k] = yc[j];
                k += 1;
            }
        }
    }
    let n_ali8 = k;
    let rmsd = kabsch(&arena.r1[..n_ali8], &arena.r2[..n_ali8]).msd.sqrt();

    // Final scores under each requested normalization, each from a fresh
    // parameter bundle and an exhaustive search over the selected pairs.
    let final_tm = |arena: &mut WorkArena, p: &ScoringParams| {
        tmscore8_search(
            arena,
            n_ali8,
            1,
            ScoreSum::All,
            ScoreNorm::Lnorm,
            p.d0_search,
            p,
        )
    };

    let p_y = ScoringParams::for_final(ylen as f64);
    let r_y = final_tm(&mut arena, &p_y);
    let tm_y = r_y.score;
    let mut transform = r_y.transform;
    let mut tm_display = tm_y;
    let mut lnorm_display = ylen as f64;
    let mut d0_display = p_y.d0;

    let p_x = ScoringParams::for_final(xlen as f64);
    let r_x = final_tm(&mut arena, &p_x);
    let tm_x = r_x.score;

    let mut tm_avg = None;
    if opts.norm_by_average {
        let l = (xlen + ylen) as f64 * 0.5;
        let p = ScoringParams::for_final(l);
        let r = final_tm(&mut arena, &p);
        tm_avg = Some((r.score, p.d0));
        transform = r.transform;
        tm_display = r.score;
        lnorm_display = l;
        d0_display = p.d0;
    }

    let mut tm_user = None;
    if let Some(l) = opts.user_lnorm {
        let p = ScoringParams::for_final(l);
        let r = final_tm(&mut arena, &p);
        tm_user = Some((r.score, p.d0));
        transform = r.transform;
        tm_display = r.score;
        lnorm_display = l;
        d0_display = p.d0;
    }

    let mut tm_d0 = None;
    let mut d0_out = 5.0;
    if let Some(d0_scale) = opts.user_d0 {
        let p = ScoringParams::for_scale(ylen as f64, d0_scale);
        let r = final_tm(&mut arena, &p);
        tm_d0 = Some(r.score);
        transform = r.transform;
        tm_display = r.score;
        d0_out = d0_scale;
        d0_display = d0_scale;
    }

    Ok(AlignResult {
        transform,
        alignment: best_map,
        m1,
        m2,
        n_ali,
        n_ali8,
        rmsd,
        tm_y,
        d0_y: p_y.d0,
        tm_x,
        d0_x: p_x.d0,
        tm_avg,
        tm_user,
        tm_d0,
        tm_display,
        lnorm_display,
        d0_display,
        d0_out,
        seed_score,
    })
}
