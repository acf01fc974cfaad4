//! Reading Cα traces from PDB-format coordinate files. Fields live at fixed
//! byte offsets; only `ATOM` records whose atom name is `" CA "` are used.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tm_types::{Structure, Vec3};

/// Where to stop reading a coordinate file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerMode {
    /// Read every record in the file.
    ReadAll,
    /// Stop at the first `END` record.
    StopAtEnd,
    /// Stop at the first `ENDMDL` or `END` record (first model).
    StopAtModel,
    /// Stop at the first `TER`, `ENDMDL` or `END` record (first chain).
    StopAtChain,
}

impl TerMode {
    pub fn from_flag(n: u8) -> Self {
        match n {
            0 => TerMode::ReadAll,
            1 => TerMode::StopAtEnd,
            2 => TerMode::StopAtModel,
            _ => TerMode::StopAtChain,
        }
    }
}

/// Map a three-letter residue name to its one-letter code; anything beyond
/// the 20 standard residues becomes 'X'.
pub fn three_to_one(res: &str) -> u8 {
    match res {
        "ALA" => b'A',
        "ARG" => b'R',
        "ASN" => b'N',
        "ASP" => b'D',
        "CYS" => b'C',
        "GLN" => b'Q',
        "GLU" => b'E',
        "GLY" => b'G',
        "HIS" => b'H',
        "ILE" => b'I',
        "LEU" => b'L',
        "LYS" => b'K',
        "MET" => b'M',
        "PHE" => b'F',
        "PRO" => b'P',
        "SER" => b'S',
        "THR" => b'T',
        "TRP" => b'W',
        "TYR" => b'Y',
        "VAL" => b'V',
        _ => b'X',
    }
}

fn parse_ca_record(line: &str) -> Option<(Vec3, u8, i32)> {
    if !line.starts_with("ATOM") || line.get(12..16)? != " CA " {
        return None;
    }
    // Alternate locations other than the primary one are skipped.
    let altloc = *line.as_bytes().get(16)?;
    if altloc != b' ' && altloc != b'A' {
        return None;
    }
    let aa = three_to_one(line.get(17..20)?);
    let resno: i32 = line.get(22..26)?.trim().parse().ok()?;
    let x: f64 = line.get(30..38)?.trim().parse().ok()?;
    let y: f64 = line.get(38..46)?.trim().parse().ok()?;
    let z: f64 = line.get(46..54)?.trim().parse().ok()?;
    Some((Vec3::new(x, y, z), aa, resno))
}

/// Read a Cα trace. Fails when the file cannot be read or holds no usable
/// Cα record before the termination mark.
pub fn read_structure(path: &Path, ter: TerMode) -> Result<Structure> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read structure file {}", path.display()))?;

    let mut coords = Vec::new();
    let mut seq = Vec::new();
    let mut resno = Vec::new();

    for line in text.lines() {
        if line.starts_with("TER") && ter == TerMode::StopAtChain {
            break;
        }
        if line.starts_with("ENDMDL") && matches!(ter, TerMode::StopAtModel | TerMode::StopAtChain)
        {
            break;
        }
        // "ENDMDL" also starts with "END"; it is handled above.
        if line.starts_with("END") && !line.starts_with("ENDMDL") && ter != TerMode::ReadAll {
            break;
        }
        if let Some((c, aa, no)) = parse_ca_record(line) {
            coords.push(c);
            seq.push(aa);
            resno.push(no);
        }
    }

    if coords.is_empty() {
        bail!("no Cα records found in {}", path.display());
    }
    Ok(Structure::new(coords, seq, resno))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
HEADER    TEST
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00  0.00
ATOM      2  CA  MET A   1      11.639   6.071  -5.147  1.00  0.00
ATOM      3  CA AGLY A   2      12.120   7.680  -2.089  1.00  0.00
ATOM      4  CA BGLY A   2      12.200   7.700  -2.100  1.00  0.00
ATOM      5  CA  MSE A   3       9.180   9.848  -1.009  1.00  0.00
TER
ATOM      6  CA  ALA B   1       0.000   0.000   0.000  1.00  0.00
END
";

    fn write_sample(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_ca_records_at_fixed_offsets() {
        let path = write_sample("tm_bin_pdb_offsets.pdb");
        let s = read_structure(&path, TerMode::StopAtChain).unwrap();
        assert_eq!(s.len(), 3);
        // Non-standard MSE maps to 'X'; the B alt-location is skipped.
        assert_eq!(s.seq(), b"MGX");
        assert_eq!(s.resno(), &[1, 2, 3]);
        assert!((s.coords()[0].x - 11.639).abs() < 1e-9);
        assert!((s.coords()[2].z + 1.009).abs() < 1e-9);
    }

    #[test]
    fn read_all_crosses_chain_breaks() {
        let path = write_sample("tm_bin_pdb_ter.pdb");
        let s = read_structure(&path, TerMode::ReadAll).unwrap();
        assert_eq!(s.len(), 4);
        let s = read_structure(&path, TerMode::StopAtEnd).unwrap();
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn missing_ca_records_is_an_error() {
        let path = std::env::temp_dir().join("tm_bin_pdb_empty.pdb");
        fs::write(&path, "HEADER only\nEND\n").unwrap();
        assert!(read_structure(&path, TerMode::StopAtChain).is_err());
    }
}
