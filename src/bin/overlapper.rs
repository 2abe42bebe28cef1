// (c) Roel Kluin, 2023, GPL v3

extern crate clap;

extern crate overlapper;

// target/release/overlapper -v overlaps -t reads.fq.gz -o overlaps.tsv
//
// target/release/overlapper overlaps -t contigs.fa -q reads.fa -e 1000

use anyhow::Result;
use clap::{Parser, Subcommand};
use overlapper::logging;
use overlapper::overlaps;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find candidate overlaps between sequences
    Overlaps(overlaps::OverlapsCmd),
}

/// Minimizer based overlap detection
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Overlapper {
    /// Report progress
    #[arg(short, long)]
    verbose: bool,

    /// Turn debugging information on
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> Result<()> {
    let overlapper = Overlapper::parse();
    logging::init_logger(logging::level(overlapper.verbose, overlapper.debug));

    match overlapper.command {
        Some(Commands::Overlaps(cmd)) => overlaps::overlaps(cmd),
        None => Ok(()),
    }
}
