// (c) Roel Kluin, 2023, GPL v3

use crate::engine::MinimizerEngine;
use crate::loader;
use crate::overlap::{Overlap, Strand};
use crate::sequence::{Sequence, SequenceIds};
use crate::thread_pool::ThreadPool;
use ahash::AHashMap;
use anyhow::{ensure, Context, Result};
use clap::Args;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct OverlapsCmd {
    /// Sequences to index, FASTA or FASTQ, optionally gzipped
    #[arg(short = 't', long, value_name = "FILE", required = true)]
    target: PathBuf,

    /// Sequences to map; without these the targets are mapped against each other
    #[arg(short = 'q', long, value_name = "FILE")]
    query: Option<PathBuf>,

    /// Output file, standard output if absent
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// k-mer length
    #[arg(short = 'k', long, default_value = "15")]
    kmerlen: usize,

    /// Window length, in k-mers
    #[arg(short = 'w', long, default_value = "5")]
    window: usize,

    /// Fraction of most frequent minimizers to ignore
    #[arg(short = 'f', long, default_value = "0.001")]
    filter: f64,

    /// Only sketch this many bases at both ends of each query
    #[arg(short = 'e', long, value_name = "BASES")]
    trim: Option<u32>,

    /// Chain all hits on a target strand, regardless of their diagonal
    #[arg(long)]
    no_diagonal: bool,

    /// Only report queries against targets read before them
    #[arg(long)]
    triangle: bool,

    /// Number of worker threads, all available if absent
    #[arg(short = 'c', long)]
    threads: Option<usize>,
}

/// One output line.
#[derive(Serialize)]
struct Row<'a> {
    qname: &'a str,
    qlen: usize,
    q_begin: u32,
    q_end: u32,
    strand: Strand,
    tname: &'a str,
    tlen: usize,
    t_begin: u32,
    t_end: u32,
}

impl<'a> Row<'a> {
    fn new(query: &'a Sequence, target: &'a Sequence, o: &Overlap) -> Self {
        Row {
            qname: &query.name,
            qlen: query.len(),
            q_begin: o.q_begin,
            q_end: o.q_end,
            strand: o.strand,
            tname: &target.name,
            tlen: target.len(),
            t_begin: o.t_begin,
            t_end: o.t_end,
        }
    }
}

/// tab separated overlap rows, without header.
pub fn write_overlaps<W: Write>(
    out: W,
    targets: &[Arc<Sequence>],
    queries: &[Arc<Sequence>],
    overlaps: &[Vec<Overlap>],
) -> Result<usize> {
    let by_id: AHashMap<u64, &Sequence> = targets.iter().map(|t| (t.id, t.as_ref())).collect();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(out);
    let mut n = 0;
    for (query, found) in queries.iter().zip(overlaps.iter()) {
        for o in found {
            let target = by_id
                .get(&o.t_id)
                .with_context(|| format!("overlap {o} of {} with an unknown target", query.name))?;
            wtr.serialize(Row::new(query, target, o))?;
            n += 1;
        }
    }
    wtr.flush()?;
    Ok(n)
}

pub fn overlaps(cmd: OverlapsCmd) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&cmd.filter),
        "filter fraction {} outside [0, 1]",
        cmd.filter
    );
    let pool = Arc::new(match cmd.threads {
        Some(n) => ThreadPool::new(n)?,
        None => ThreadPool::with_available_parallelism()?,
    });
    info!("Using {} threads", pool.no_threads());
    let mut engine = MinimizerEngine::new(cmd.kmerlen, cmd.window, pool)?;

    let mut ids = SequenceIds::new();
    let targets = loader::load(&cmd.target, &mut ids)?;
    let (queries, triangle) = match cmd.query.as_ref() {
        Some(path) => (loader::load(path, &mut ids)?, cmd.triangle),
        None => (targets.clone(), true),
    };

    engine.minimize(&targets)?;
    engine.filter(cmd.filter)?;
    let overlaps = engine.map_batch(&queries, !cmd.no_diagonal, triangle, cmd.trim)?;

    let n = match cmd.output.as_ref() {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_overlaps(io::BufWriter::new(file), &targets, &queries, &overlaps)?
        }
        None => write_overlaps(io::stdout().lock(), &targets, &queries, &overlaps)?,
    };
    info!("{n} overlaps written");
    Ok(())
}
