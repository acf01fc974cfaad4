mod cli;
mod output;
mod pdb;
mod seedfile;

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tm_engine::{align, AlignOptions, SeedAlignment, SeedMode};
use tm_types::Alignment;

use crate::cli::Cli;
use crate::pdb::TerMode;

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let start = Instant::now();

    let ter = TerMode::from_flag(args.ter);
    let x = pdb::read_structure(&args.chain1, ter)?;
    let y = pdb::read_structure(&args.chain2, ter)?;
    log::debug!("chain 1: {} residues, chain 2: {} residues", x.len(), y.len());

    let seed = match (&args.stick_alignment, &args.initial_alignment) {
        (Some(path), _) => Some((path, SeedMode::Stick)),
        (None, Some(path)) => Some((path, SeedMode::Refine)),
        (None, None) => None,
    };
    let seed = match seed {
        Some((path, mode)) => {
            let (gx, gy) = seedfile::read_gapped_pair(path)?;
            Some(SeedAlignment {
                map: Alignment::from_gapped_pair(&gx, &gy, x.len(), y.len()),
                mode,
            })
        }
        None => None,
    };

    let opts = AlignOptions {
        fast: args.fast,
        norm_by_average: args.average,
        user_lnorm: args.user_length,
        user_d0: args.user_d0,
        seed,
    };
    let r = align(&x, &y, &opts)?;

    let xname = args.chain1.display().to_string();
    let yname = args.chain2.display().to_string();
    match args.outfmt {
        0 => output::print_full(&xname, &yname, &x, &y, &r),
        1 => output::print_fasta(&xname, &yname, &x, &y, &r),
        _ => output::print_brief(&xname, &yname, &x, &y, &r),
    }

    if let Some(path) = &args.output_matrix {
        output::write_matrix(path, &r.transform)?;
    }
    if let Some(path) = &args.output_superposed {
        output::write_superposed(&args.chain1, path, &r.transform, ter)?;
    }

    if args.outfmt == 0 {
        println!();
        println!("Total CPU time is {:5.2} seconds", start.elapsed().as_secs_f64());
    }
    Ok(())
}
