//! Report formatting: the human-readable block, the two machine formats,
//! the rotation-matrix file and the superposed-coordinate file.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tm_engine::AlignResult;
use tm_types::{dist2, Structure, Transform};

use crate::pdb::TerMode;

/// Identity fraction over `n` aligned pairs. `n_ali8` can legitimately be 0
/// when every aligned pair fails the d8 cut; the epsilon keeps the ratio a
/// well-defined near-zero value instead of NaN.
fn seq_id_ratio(seq_id: usize, n: usize) -> f64 {
    seq_id as f64 / (n as f64 + 0.00000001)
}

/// The three-row aligned-sequence block plus the identity count.
/// `marks` enables the `:`/`.` distance annotations of the full report.
fn aligned_block(
    x: &Structure,
    y: &Structure,
    r: &AlignResult,
    marks: bool,
) -> (String, String, String, usize) {
    let cap = x.len() + y.len();
    let mut sx = String::with_capacity(cap);
    let mut sm = String::with_capacity(cap);
    let mut sy = String::with_capacity(cap);

    let mut seq_id = 0;
    let mut i_old = 0;
    let mut j_old = 0;
    for k in 0..r.n_ali8 {
        for i in i_old..r.m1[k] {
            sx.push(x.seq()[i] as char);
            sy.push('-');
            sm.push(' ');
        }
        for j in j_old..r.m2[k] {
            sx.push('-');
            sy.push(y.seq()[j] as char);
            sm.push(' ');
        }

        let a = x.seq()[r.m1[k]];
        let b = y.seq()[r.m2[k]];
        sx.push(a as char);
        sy.push(b as char);
        if a == b {
            seq_id += 1;
        }
        if marks {
            let xt = r.transform.apply(&x.coords()[r.m1[k]]);
            let d = dist2(&xt, &y.coords()[r.m2[k]]).sqrt();
            sm.push(if d < r.d0_out { ':' } else { '.' });
        } else {
            sm.push(' ');
        }

        i_old = r.m1[k] + 1;
        j_old = r.m2[k] + 1;
    }
    for i in i_old..x.len() {
        sx.push(x.seq()[i] as char);
        sy.push('-');
        sm.push(' ');
    }
    for j in j_old..y.len() {
        sx.push('-');
        sy.push(y.seq()[j] as char);
        sm.push(' ');
    }

    (sx, sm, sy, seq_id)
}

fn banner() {
    println!();
    println!(" **************************************************************************");
    println!(" * tm-bin: protein structural alignment by TM-score                       *");
    println!(" * Reference: Y Zhang, J Skolnick, Nucl Acids Res 33, 2302-2309 (2005)   *");
    println!(" **************************************************************************");
}

/// The full human-readable report.
pub fn print_full(xname: &str, yname: &str, x: &Structure, y: &Structure, r: &AlignResult) {
    banner();
    let (sx, sm, sy, seq_id) = aligned_block(x, y, r, true);

    println!();
    println!("Name of Chain_1: {xname} (to be superimposed onto Chain_2)");
    println!("Name of Chain_2: {yname}");
    println!("Length of Chain_1: {} residues", x.len());
    println!("Length of Chain_2: {} residues", y.len());
    println!();

    if let Some(s) = &r.seed_score {
        println!(
            "User-specified initial alignment: TM/Lali/rmsd = {:7.5}, {:4}, {:6.3}",
            s.tm, s.n_ali, s.rmsd
        );
    }

    println!(
        "Aligned length= {}, RMSD= {:6.2}, Seq_ID=n_identical/n_aligned= {:4.3}",
        r.n_ali8,
        r.rmsd,
        seq_id_ratio(seq_id, r.n_ali8)
    );
    println!(
        "TM-score= {:6.5} (if normalized by length of Chain_1, i.e., LN={}, d0={:.2})",
        r.tm_x,
        x.len(),
        r.d0_x
    );
    println!(
        "TM-score= {:6.5} (if normalized by length of Chain_2, i.e., LN={}, d0={:.2})",
        r.tm_y,
        y.len(),
        r.d0_y
    );
    if let Some((tm, d0)) = r.tm_avg {
        println!(
            "TM-score= {:6.5} (if normalized by average length of two structures, i.e., LN={:.2}, d0={:.2})",
            tm,
            (x.len() + y.len()) as f64 * 0.5,
            d0
        );
    }
    if let Some((tm, d0)) = r.tm_user {
        println!(
            "TM-score= {:6.5} (if normalized by user-specified LN={:.2} and d0={:.2})",
            tm, r.lnorm_display, d0
        );
    }
    if let Some(tm) = r.tm_d0 {
        println!(
            "TM-score= {:6.5} (if scaled by user-specified d0={:.2}, and LN={:.2})",
            tm, r.d0_out, r.lnorm_display
        );
    }
    println!("(You should use TM-score normalized by length of the reference protein)");

    println!();
    println!(
        "(\":\" denotes residue pairs of d < {:4.1} Angstrom, \".\" denotes other aligned residues)",
        r.d0_out
    );
    println!("{sx}");
    println!("{sm}");
    println!("{sy}");
}

/// FASTA-ish format: the two gapped sequences with per-chain score headers.
pub fn print_fasta(xname: &str, yname: &str, x: &Structure, y: &Structure, r: &AlignResult) {
    let (sx, _, sy, seq_id) = aligned_block(x, y, r, false);
    println!(
        ">{xname}\tL={}\td0={:.2}\tseqID={:.3}\tTM-score={:.5}",
        x.len(),
        r.d0_x,
        seq_id as f64 / x.len() as f64,
        r.tm_x
    );
    println!("{sx}");
    println!(
        ">{yname}\tL={}\td0={:.2}\tseqID={:.3}\tTM-score={:.5}",
        y.len(),
        r.d0_y,
        seq_id as f64 / y.len() as f64,
        r.tm_y
    );
    println!("{sy}");
    println!();
    println!(
        "# Lali={}\tRMSD={:.2}\tseqID_ali={:.3}",
        r.n_ali8,
        r.rmsd,
        seq_id_ratio(seq_id, r.n_ali8)
    );
    if let Some(s) = &r.seed_score {
        println!(
            "# User-specified initial alignment: TM={:.5}\tLali={:4}\trmsd={:.3}",
            s.tm, s.n_ali, s.rmsd
        );
    }
    if let Some((tm, d0)) = r.tm_avg {
        println!(
            "# TM-score={:.5} (normalized by average length of two structures: L={:.2}\td0={:.2})",
            tm,
            (x.len() + y.len()) as f64 * 0.5,
            d0
        );
    }
    if let Some((tm, d0)) = r.tm_user {
        println!(
            "# TM-score={:.5} (normalized by user-specified L={:.2}\td0={:.2})",
            tm, r.lnorm_display, d0
        );
    }
    if let Some(tm) = r.tm_d0 {
        println!(
            "# TM-score={:.5} (scaled by user-specified d0={:.2}\tL={:.2})",
            tm, r.d0_out, r.lnorm_display
        );
    }
    println!("$$$$");
}

/// One tab-separated summary row.
pub fn print_brief(xname: &str, yname: &str, x: &Structure, y: &Structure, r: &AlignResult) {
    let (_, _, _, seq_id) = aligned_block(x, y, r, false);
    println!(
        "{xname}\t{yname}\t{:.4}\t{:.4}\t{:.2}\t{:.3}\t{:.3}\t{:.3}\t{}\t{}\t{}",
        r.tm_x,
        r.tm_y,
        r.rmsd,
        seq_id as f64 / x.len() as f64,
        seq_id as f64 / y.len() as f64,
        seq_id_ratio(seq_id, r.n_ali8),
        x.len(),
        y.len(),
        r.n_ali8
    );
}

/// Write the rotation matrix and translation vector.
pub fn write_matrix(path: &Path, tr: &Transform) -> Result<()> {
    let mut out = String::new();
    out.push_str("------ The rotation matrix to rotate Chain_1 to Chain_2 ------\n");
    out.push_str(&format!(
        "m {:>18} {:>14} {:>14} {:>14}\n",
        "t[m]", "u[m][0]", "u[m][1]", "u[m][2]"
    ));
    for k in 0..3 {
        out.push_str(&format!(
            "{k} {:18.10} {:14.10} {:14.10} {:14.10}\n",
            tr.t[k],
            tr.u[(k, 0)],
            tr.u[(k, 1)],
            tr.u[(k, 2)]
        ));
    }
    out.push_str(
        "\nCode for rotating Structure A from (x,y,z) to (X,Y,Z):\n\
         for(i=0; i<L; i++)\n\
         {\n\
            X[i] = t[0] + u[0][0]*x[i] + u[0][1]*y[i] + u[0][2]*z[i]\n\
            Y[i] = t[1] + u[1][0]*x[i] + u[1][1]*y[i] + u[1][2]*z[i]\n\
            Z[i] = t[2] + u[2][0]*x[i] + u[2][1]*y[i] + u[2][2]*z[i]\n\
         }\n",
    );
    fs::write(path, out).with_context(|| format!("cannot write matrix file {}", path.display()))
}

/// Copy the chain-1 file with all ATOM/HETATM coordinates rewritten under
/// the transform.
pub fn write_superposed(input: &Path, output: &Path, tr: &Transform, ter: TerMode) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("cannot read structure file {}", input.display()))?;

    let mut buf = String::with_capacity(text.len());
    for line in text.lines() {
        if (line.starts_with("ATOM") || line.starts_with("HETATM")) && line.len() >= 54 {
            let coords = (
                line.get(30..38).and_then(|s| s.trim().parse::<f64>().ok()),
                line.get(38..46).and_then(|s| s.trim().parse::<f64>().ok()),
                line.get(46..54).and_then(|s| s.trim().parse::<f64>().ok()),
            );
            if let (Some(x), Some(y), Some(z)) = coords {
                let v = tr.apply(&tm_types::Vec3::new(x, y, z));
                buf.push_str(&line[..30]);
                buf.push_str(&format!("{:8.3}{:8.3}{:8.3}", v.x, v.y, v.z));
                buf.push_str(&line[54..]);
                buf.push('\n');
                continue;
            }
        }
        if !line.is_empty() {
            buf.push_str(line);
            buf.push('\n');
        }
        if ter != TerMode::ReadAll && line.starts_with("END") {
            break;
        }
    }

    fs::write(output, buf)
        .with_context(|| format!("cannot write superposed file {}", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ratio_is_finite_without_aligned_pairs() {
        let r = seq_id_ratio(0, 0);
        assert!(r.is_finite());
        assert!(r.abs() < 1e-6);
    }

    #[test]
    fn identity_ratio_counts_matches() {
        assert!((seq_id_ratio(3, 4) - 0.75).abs() < 1e-6);
    }
}
