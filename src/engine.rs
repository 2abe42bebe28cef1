// (c) Roel Kluin, 2023, GPL v3

use crate::kmerconst::KmerConst;
use crate::mapping;
use crate::minimizer_index::{MinimizerIndex, Shard};
use crate::new_types::minimizer::Minimizer;
use crate::overlap::Overlap;
use crate::sequence::Sequence;
use crate::sketch::sketch;
use crate::thread_pool::{Task, ThreadPool};
use anyhow::{anyhow, ensure, Result};
use log::{debug, info, warn};
use std::ops::Range;
use std::sync::Arc;

/// join every task, also after a failure, so no job is still running on return.
/// The first error is reported.
fn join_all<T>(tasks: Vec<Task<T>>) -> Result<Vec<T>> {
    let mut results = Vec::with_capacity(tasks.len());
    let mut first_err = None;
    for task in tasks {
        match task.join() {
            Ok(t) => results.push(t),
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(results),
    }
}

fn exclusive(index: &mut Arc<MinimizerIndex>) -> Result<&mut MinimizerIndex> {
    Arc::get_mut(index).ok_or_else(|| anyhow!("the index is still in use by a mapping job"))
}

/// Builds a minimizer index over a set of sequences and maps queries against it,
/// distributing the work over a shared pool.
pub struct MinimizerEngine {
    kc: KmerConst,
    index: Arc<MinimizerIndex>,
    pool: Arc<ThreadPool>,
}

impl MinimizerEngine {
    pub fn new(kmerlen: usize, window: usize, pool: Arc<ThreadPool>) -> Result<Self> {
        let kc = KmerConst::new(kmerlen, window)?;
        Ok(MinimizerEngine {
            index: Arc::new(MinimizerIndex::new(&kc)),
            kc,
            pool,
        })
    }

    pub fn kmer_const(&self) -> &KmerConst {
        &self.kc
    }

    pub fn index(&self) -> &MinimizerIndex {
        &self.index
    }

    /// Index exactly `sequences`, replacing what was indexed before.
    pub fn minimize(&mut self, sequences: &[Arc<Sequence>]) -> Result<()> {
        exclusive(&mut self.index)?.clear();
        self.minimize_range(sequences, 0..sequences.len())
    }

    /// Add `sequences[range]` to the index. Filtering done earlier is undone, since
    /// the index is finalized anew.
    pub fn minimize_range(&mut self, sequences: &[Arc<Sequence>], range: Range<usize>) -> Result<()> {
        ensure!(
            range.start <= range.end && range.end <= sequences.len(),
            "range {range:?} outside a collection of {} sequences",
            sequences.len()
        );
        if range.is_empty() {
            warn!("no sequences to minimize");
        }
        let kc = self.kc;
        let tasks: Vec<Task<Vec<Minimizer>>> = sequences[range.clone()]
            .iter()
            .map(|seq| {
                let seq = Arc::clone(seq);
                self.pool.submit(move || sketch(&kc, &seq, None))
            })
            .collect();
        // nothing is touched before every sketch is in.
        let sketches = join_all(tasks)?;
        let no_minimizers: usize = sketches.iter().map(Vec::len).sum();
        debug!("{} sequences sketched to {no_minimizers} minimizers", range.len());

        let index = exclusive(&mut self.index)?;
        for sk in sketches.iter() {
            index.populate(sk);
        }
        drop(sketches);

        let tasks: Vec<Task<Shard>> = index
            .take_shards()
            .into_iter()
            .map(|mut shard| {
                self.pool.submit(move || {
                    shard.finalize();
                    Ok(shard)
                })
            })
            .collect();
        match join_all(tasks) {
            Ok(shards) => index.restore_finalized(shards),
            Err(e) => {
                index.clear();
                return Err(e.context("finalizing the index"));
            }
        }
        info!(
            "indexed {} minimizers, {} distinct values in {} shards",
            index.len(),
            index.distinct(),
            index.no_shards()
        );
        Ok(())
    }

    /// See [`MinimizerIndex::filter`].
    pub fn filter(&mut self, f: f64) -> Result<usize> {
        exclusive(&mut self.index)?.filter(f)
    }

    pub fn map(&self, query: &Sequence, diagonal: bool, triangle: bool, trim: Option<u32>) -> Result<Vec<Overlap>> {
        mapping::map(&self.kc, &self.index, query, diagonal, triangle, trim)
    }

    /// Map each query on a worker; the overlaps are returned in query order.
    pub fn map_batch(
        &self,
        queries: &[Arc<Sequence>],
        diagonal: bool,
        triangle: bool,
        trim: Option<u32>,
    ) -> Result<Vec<Vec<Overlap>>> {
        let tasks: Vec<_> = queries
            .iter()
            .map(|query| {
                let (kc, index, query) = (self.kc, Arc::clone(&self.index), Arc::clone(query));
                self.pool
                    .submit(move || mapping::map(&kc, &index, &query, diagonal, triangle, trim))
            })
            .collect();
        let overlaps = join_all(tasks)?;
        debug!(
            "{} queries mapped to {} overlaps",
            queries.len(),
            overlaps.iter().map(Vec::len).sum::<usize>()
        );
        Ok(overlaps)
    }
}
