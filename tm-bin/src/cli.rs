use clap::{value_parser, Parser};
use std::path::PathBuf;

/// Superpose protein chain 1 onto chain 2 and report the TM-score.
#[derive(Parser, Debug)]
#[clap(author, about, disable_version_flag(true))]
pub struct Cli {
    /// Structure file of the chain to be superposed (PDB format).
    #[clap(value_parser = value_parser!(PathBuf))]
    pub chain1: PathBuf,

    /// Structure file of the reference chain.
    #[clap(value_parser = value_parser!(PathBuf))]
    pub chain2: PathBuf,

    /// Also report the TM-score normalized by the average chain length.
    #[clap(short = 'a', long = "average")]
    pub average: bool,

    /// Also report the TM-score normalized by this length.
    #[clap(short = 'u', long = "user-length", value_name = "L")]
    pub user_length: Option<f64>,

    /// Also report the TM-score scaled by this d0 (Å).
    #[clap(short = 'd', long = "user-d0", value_name = "D0")]
    pub user_d0: Option<f64>,

    /// Seed the search with this pairwise alignment (FASTA file with two
    /// gapped records), then refine as usual.
    #[clap(short = 'i', long = "initial", value_name = "FILE")]
    pub initial_alignment: Option<PathBuf>,

    /// Stick to this pairwise alignment; no other seeds are tried.
    #[clap(
        short = 'I',
        long = "stick",
        value_name = "FILE",
        conflicts_with = "initial_alignment"
    )]
    pub stick_alignment: Option<PathBuf>,

    /// Write chain 1 with the final transform applied.
    #[clap(short = 'o', long = "out-superposed", value_name = "FILE")]
    pub output_superposed: Option<PathBuf>,

    /// Write the rotation matrix and translation vector.
    #[clap(short = 'm', long = "out-matrix", value_name = "FILE")]
    pub output_matrix: Option<PathBuf>,

    /// Chain termination when reading coordinates: 0 read everything,
    /// 1 stop at END, 2 stop at ENDMDL, 3 stop at TER.
    #[clap(long, value_name = "N", default_value_t = 3)]
    pub ter: u8,

    /// Coarser seed search and capped refinement; much faster on long
    /// chains, slightly less accurate.
    #[clap(long)]
    pub fast: bool,

    /// Output format: 0 full report, 1 aligned sequences, 2 one summary row.
    #[clap(long, value_name = "N", default_value_t = 0)]
    pub outfmt: u8,
}

#[cfg(test)]
mod test {
    #[test]
    fn cli_test() {
        <super::Cli as clap::CommandFactory>::command().debug_assert();
    }
}
