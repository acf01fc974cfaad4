//! The five seed-alignment generators. Each produces a y→x map; the driver
//! routes every seed through the refinement loop and keeps the best by
//! TM-score.

use itertools::Itertools;
use tm_kernel::kabsch;
use tm_kernel::sec::make_sec;

use crate::arena::WorkArena;
use crate::dp::{nw_matrix, nw_sec, nw_transform};
use crate::fast_score::get_score_fast;
use crate::prelude::*;

/// Cutoff for consecutive-residue distance when extracting fragments.
const DCU0: f64 = 4.25;

fn thread_map(map: &mut Alignment, k: i32, xlen: usize) {
    for j in 0..map.len() {
        let i = j as i32 + k;
        map.y2x[j] = if i >= 0 && (i as usize) < xlen { i } else { GAP };
    }
}

/// Gapless threading: try every constant offset of X along Y, rank by the
/// fast evaluator, emit the winning offset's map. Step 5 in fast mode.
pub fn get_initial(
    x: &[Vec3],
    y: &[Vec3],
    fast: bool,
    params: &ScoringParams,
    arena: &mut WorkArena,
    out: &mut Alignment,
) -> f64 {
    let xlen = x.len();
    let ylen = y.len();
    let min_ali = max(min(xlen, ylen) / 2, 5);
    let n1 = -(ylen as i32) + min_ali as i32;
    let n2 = xlen as i32 - min_ali as i32;
    let step = if fast { 5 } else { 1 };

    let mut k_best = n1;
    let mut tmscore_max = -1.0;
    let mut k = n1;
    while k <= n2 {
        thread_map(out, k, xlen);
        let tmscore = get_score_fast(x, y, out, params, arena);
        if tmscore >= tmscore_max {
            tmscore_max = tmscore;
            k_best = k;
        }
        k += step;
    }

    thread_map(out, k_best, xlen);
    tmscore_max
}

/// Secondary-structure seed: label both chains, align the label strings by
/// DP with gap open −1.
pub fn get_initial_ss(x: &[Vec3], y: &[Vec3], arena: &mut WorkArena, out: &mut Alignment) {
    make_sec(x, &mut arena.secx);
    make_sec(y, &mut arena.secy);
    nw_sec(arena, -1.0, out);
}

fn jump_width(len: usize) -> usize {
    let j = if len > 250 {
        45
    } else if len > 200 {
        35
    } else if len > 150 {
        25
    } else {
        15
    };
    min(j, len / 3)
}

/// Local-superposition seed: superpose every pair of same-length fragments
/// (two fragment lengths, jump-spaced starts), align the whole chains under
/// each resulting transform, keep the best by the fast evaluator.
///
/// Returns whether any fragment pair produced a map at all.
pub fn get_initial5(
    x: &[Vec3],
    y: &[Vec3],
    fast: bool,
    params: &ScoringParams,
    arena: &mut WorkArena,
    out: &mut Alignment,
) -> bool {
    let xlen = x.len();
    let ylen = y.len();
    let a_l = min(xlen, ylen);

    let d01 = (params.d0 + 1.5).max(params.d0_min);
    let d02 = d01 * d01;

    let mut n_jump1 = jump_width(xlen);
    let mut n_jump2 = jump_width(ylen);
    if fast {
        n_jump1 *= 5;
        n_jump2 *= 5;
    }
    let n_frag = [min(20, a_l / 3), min(100, a_l / 2)];

    let mut gl_max = 0.0;
    let mut flag = false;
    let mut invmap = Alignment::all_gap(ylen);

    for &l_frag in &n_frag {
        let m1 = xlen - l_frag + 1;
        let m2 = ylen - l_frag + 1;
        let mut i = 0;
        while i < m1 {
            let mut j = 0;
            while j < m2 {
                arena.r1[..l_frag].copy_from_slice(&x[i..i + l_frag]);
                arena.r2[..l_frag].copy_from_slice(&y[j..j + l_frag]);
                let tr = kabsch(&arena.r1[..l_frag], &arena.r2[..l_frag]).transform;

                nw_transform(x, y, &tr, d02, 0.0, arena, &mut invmap);
                let gl = get_score_fast(x, y, &invmap, params, arena);
                if gl > gl_max {
                    gl_max = gl;
                    out.copy_from(&invmap);
                    flag = true;
                }
                j += n_jump2;
            }
            i += n_jump1;
        }
    }

    flag
}

/// Seed from the current best alignment plus secondary structure: freeze the
/// transform-form score matrix under the alignment's Kabsch fit, add 0.5
/// where the labels agree, re-align by matrix DP.
///
/// Relies on `arena.secx`/`arena.secy` still holding the labels assigned by
/// [`get_initial_ss`].
pub fn get_initial_ssplus(
    x: &[Vec3],
    y: &[Vec3],
    current: &Alignment,
    params: &ScoringParams,
    arena: &mut WorkArena,
    out: &mut Alignment,
) {
    let xlen = x.len();
    let ylen = y.len();

    let mut k = 0;
    for (i, j) in current.pairs() {
        arena.r1[k] = x[i];
        arena.r2[k] = y[j];
        k += 1;
    }
    let tr = kabsch(&arena.r1[..k], &arena.r2[..k]).transform;

    let d01 = (params.d0 + 1.5).max(params.d0_min);
    let d02 = d01 * d01;

    let WorkArena {
        ref mut score,
        ref secx,
        ref secy,
        ..
    } = *arena;
    for (i, xi) in x.iter().enumerate() {
        let xx = tr.apply(xi);
        for (j, yj) in y.iter().enumerate() {
            let dij = dist2(&xx, yj);
            let bonus = if secx[i] == secy[j] { 0.5 } else { 0.0 };
            score[(i + 1, j + 1)] = 1.0 / (1.0 + dij / d02) + bonus;
        }
    }

    nw_matrix(arena, xlen, ylen, -1.0, out);
}

/// Longest contiguous run where consecutive residues are both numbered
/// consecutively and closer than the cutoff; the cutoff is relaxed by ×1.1
/// per attempt until the run is long enough (once relaxed, the numbering
/// requirement is dropped too).
fn find_max_frag(coords: &[Vec3], resno: &[i32], fast: bool) -> (usize, usize) {
    let len = coords.len();
    let fra_min = if fast { 8 } else { 4 };
    let r_min = min(len / 3, fra_min);

    let dcu0_cut = DCU0 * DCU0;
    let mut dcu_cut = dcu0_cut;
    let mut inc = 0;
    let (mut start_max, mut end_max) = (0, 0);
    let mut lfr_max = 0;

    while lfr_max < r_min {
        lfr_max = 0;
        let mut run = 1;
        let mut start = 0;
        for (i, (a, b)) in coords.iter().tuple_windows().enumerate() {
            let i = i + 1;
            let d = dist2(a, b);
            let ok = if dcu_cut > dcu0_cut {
                d < dcu_cut
            } else {
                resno[i] == resno[i - 1] + 1 && d < dcu_cut
            };

            if ok {
                run += 1;
                if i == len - 1 {
                    if run > lfr_max {
                        lfr_max = run;
                        start_max = start;
                        end_max = i;
                    }
                    run = 1;
                }
            } else {
                if run > lfr_max {
                    lfr_max = run;
                    start_max = start;
                    end_max = i - 1;
                }
                run = 1;
                start = i;
            }
        }

        if lfr_max < r_min {
            inc += 1;
            let dinc = 1.1f64.powi(inc) * DCU0;
            dcu_cut = dinc * dinc;
        }
    }

    (start_max, end_max)
}

/// Fragment gapless threading: extract the longest well-connected fragment
/// of each chain, thread the fragment from the shorter side against the
/// whole other chain, rank offsets by the fast evaluator.
#[allow(clippy::too_many_arguments)]
pub fn get_initial_fgt(
    x: &[Vec3],
    y: &[Vec3],
    xresno: &[i32],
    yresno: &[i32],
    fast: bool,
    params: &ScoringParams,
    arena: &mut WorkArena,
    out: &mut Alignment,
) -> f64 {
    let xlen = x.len();
    let ylen = y.len();
    let fra_min = if fast { 8 } else { 4 };
    let fra_min1 = fra_min - 1;

    let (xstart, xend) = find_max_frag(x, xresno, fast);
    let (ystart, yend) = find_max_frag(y, yresno, fast);
    let lx = xend - xstart + 1;
    let ly = yend - ystart + 1;
    let mut l_fr = min(lx, ly);

    // Thread the fragment of the shorter side (by fragment, then by chain).
    let use_x = lx < ly || (lx == ly && xlen <= ylen);
    let start = if use_x { xstart } else { ystart };
    let mut ifr: Vec<usize> = (start..start + l_fr).collect();

    // A fragment spanning the whole shorter chain would duplicate plain
    // gapless threading; keep only its middle part.
    let l0 = min(xlen, ylen);
    if l_fr == l0 {
        let n1 = (l0 as f64 * 0.1) as usize;
        let n2 = (l0 as f64 * 0.89) as usize;
        ifr = ifr[n1..=n2].to_vec();
        l_fr = ifr.len();
    }

    let mut tmscore_max = -1.0;
    let mut map = Alignment::all_gap(ylen);

    if use_x {
        let min_ali = max((min(l_fr, ylen) as f64 / 2.5) as usize, fra_min1);
        let n1 = -(ylen as i32) + min_ali as i32;
        let n2 = l_fr as i32 - min_ali as i32;
        let step = if fast { 3 } else { 1 };
        let mut k = n1;
        while k <= n2 {
            for j in 0..ylen {
                let i = j as i32 + k;
                map.y2x[j] = if i >= 0 && (i as usize) < l_fr {
                    ifr[i as usize] as i32
                } else {
                    GAP
                };
            }
            let tm = get_score_fast(x, y, &map, params, arena);
            if tm >= tmscore_max {
                tmscore_max = tm;
                out.copy_from(&map);
            }
            k += step;
        }
    } else {
        let min_ali = max((min(xlen, l_fr) as f64 / 2.5) as usize, fra_min1);
        let n1 = -(l_fr as i32) + min_ali as i32;
        let n2 = xlen as i32 - min_ali as i32;
        for k in n1..=n2 {
            map.y2x.fill(GAP);
            for (j, &yj) in ifr.iter().enumerate() {
                let i = j as i32 + k;
                if i >= 0 && (i as usize) < xlen {
                    map.y2x[yj] = i;
                }
            }
            let tm = get_score_fast(x, y, &map, params, arena);
            if tm >= tmscore_max {
                tmscore_max = tm;
                out.copy_from(&map);
            }
        }
    }

    tmscore_max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helix(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let a = (i as f64) * 100f64.to_radians();
                Vec3::new(2.3 * a.cos(), 2.3 * a.sin(), 1.5 * i as f64)
            })
            .collect()
    }

    #[test]
    fn gapless_threading_finds_zero_offset_for_identical_chains() {
        let x = helix(40);
        let params = ScoringParams::for_search(40, 40);
        let mut arena = WorkArena::new(40, 40);
        let mut out = Alignment::all_gap(40);
        get_initial(&x, &x, false, &params, &mut arena, &mut out);
        assert_eq!(out.y2x, (0..40).collect::<Vec<i32>>());
    }

    /// Aperiodic chain with ~3.8 Å steps; unlike an ideal helix it has no
    /// internal translational symmetry, so offsets are unambiguous.
    fn wiggle(n: usize) -> Vec<Vec3> {
        let mut p = Vec3::zeros();
        let mut out = vec![p];
        for i in 1..n {
            let t = i as f64;
            let dir =
                Vec3::new((t * 1.7).sin(), (t * 2.399).cos(), (t * 0.9).sin() + 0.3).normalize();
            p += 3.8 * dir;
            out.push(p);
        }
        out
    }

    #[test]
    fn threading_of_a_truncated_chain() {
        let x = wiggle(50);
        let y = x[..40].to_vec();
        let params = ScoringParams::for_search(50, 40);
        let mut arena = WorkArena::new(50, 40);
        let mut out = Alignment::all_gap(40);
        get_initial(&x, &y, false, &params, &mut arena, &mut out);
        assert_eq!(out.y2x, (0..40).collect::<Vec<i32>>());
    }

    #[test]
    fn max_frag_spans_a_connected_chain() {
        let x = helix(30);
        let resno: Vec<i32> = (1..=30).collect();
        let (s, e) = find_max_frag(&x, &resno, false);
        assert_eq!((s, e), (0, 29));
    }

    #[test]
    fn max_frag_stops_at_a_chain_break() {
        // 12 connected residues, a 40 Å jump, then 17 more.
        let mut c = helix(12);
        let tail = helix(17);
        c.extend(tail.iter().map(|v| v + Vec3::new(40.0, 0.0, 0.0)));
        let resno: Vec<i32> = (1..=29).collect();
        let (s, e) = find_max_frag(&c, &resno, false);
        assert_eq!((s, e), (12, 28));
    }

    #[test]
    fn ss_seed_aligns_identical_chains() {
        let x = helix(36);
        let mut arena = WorkArena::new(36, 36);
        let mut out = Alignment::all_gap(36);
        get_initial_ss(&x, &x, &mut arena, &mut out);
        // Identical label strings align without gaps.
        assert_eq!(out.n_aligned(), 36);
    }
}
