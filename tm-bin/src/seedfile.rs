//! Reading a user-supplied pairwise alignment: a FASTA file with two gapped
//! records, first chain 1, then chain 2.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

pub fn read_gapped_pair(path: &Path) -> Result<(Vec<u8>, Vec<u8>)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read alignment file {}", path.display()))?;

    let mut records: Vec<Vec<u8>> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('>') {
            records.push(Vec::new());
        } else if let Some(current) = records.last_mut() {
            current.extend_from_slice(line.as_bytes());
        }
    }

    if records.len() < 2 {
        bail!(
            "alignment file {} must hold two gapped sequences",
            path.display()
        );
    }
    let second = records.swap_remove(1);
    let first = records.swap_remove(0);
    Ok((first, second))
}
