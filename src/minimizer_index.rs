// (c) Roel Kluin, 2023, GPL v3

use crate::kmerconst::KmerConst;
use crate::new_types::minimizer::Minimizer;
use ahash::AHashMap;
use itertools::Itertools;
use std::mem;

/// Contiguous stretch of equal minimizer values in a finalized shard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) count: usize,
}

/// One partition of the index: the occurrences and, once finalized, for each value
/// where its occurrences are.
#[derive(Default)]
pub struct Shard {
    minimizers: Vec<Minimizer>,
    pub(crate) spans: AHashMap<u64, Span>,
}

impl Shard {
    /// sort by value, then one pass to record the span per value.
    pub fn finalize(&mut self) {
        self.minimizers.sort_unstable();
        self.spans.clear();
        self.spans.reserve(self.minimizers.len() / 2);
        let mut start = 0;
        for i in 1..=self.minimizers.len() {
            if i == self.minimizers.len() || self.minimizers[i].value != self.minimizers[start].value {
                self.spans.insert(
                    self.minimizers[start].value,
                    Span {
                        start,
                        count: i - start,
                    },
                );
                start = i;
            }
        }
    }

    fn lookup(&self, value: u64) -> &[Minimizer] {
        match self.spans.get(&value) {
            Some(s) => &self.minimizers[s.start..s.start + s.count],
            None => &[],
        }
    }

    /// occurrences per value, hidden ones included. Only meaningful once sorted.
    pub(crate) fn value_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.minimizers
            .iter()
            .dedup_by_with_count(|a, b| a.value == b.value)
            .map(|(n, _)| n)
    }

    fn clear(&mut self) {
        self.minimizers.clear();
        self.spans.clear();
    }

    pub fn len(&self) -> usize {
        self.minimizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minimizers.is_empty()
    }
}

/// Minimizer occurrences partitioned on value modulo the shard count. Shards share
/// nothing, so each can be finalized by its own worker.
pub struct MinimizerIndex {
    shard_mask: u64,
    shards: Vec<Shard>,
    finalized: bool,
}

impl MinimizerIndex {
    pub fn new(kc: &KmerConst) -> Self {
        MinimizerIndex {
            shard_mask: kc.shard_mask(),
            shards: (0..kc.no_shards()).map(|_| Shard::default()).collect(),
            finalized: false,
        }
    }

    #[inline(always)]
    fn shard_nr(&self, value: u64) -> usize {
        (value & self.shard_mask) as usize
    }

    /// append a sketch; lookups do not see it until [`finalize`](Self::finalize).
    pub fn populate(&mut self, sketch: &[Minimizer]) {
        self.finalized = false;
        for &m in sketch {
            let nr = self.shard_nr(m.value);
            self.shards[nr].minimizers.push(m);
        }
    }

    pub fn finalize(&mut self) {
        for shard in self.shards.iter_mut() {
            shard.finalize();
        }
        self.finalized = true;
    }

    /// All occurrences of `value`, empty if there are none.
    pub fn lookup(&self, value: u64) -> &[Minimizer] {
        self.shards[self.shard_nr(value)].lookup(value)
    }

    pub fn clear(&mut self) {
        for shard in self.shards.iter_mut() {
            shard.clear();
        }
        self.finalized = false;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn no_shards(&self) -> usize {
        self.shards.len()
    }

    /// total occurrences stored, including any that a filter hides.
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(Shard::is_empty)
    }

    /// number of values a lookup can find.
    pub fn distinct(&self) -> usize {
        self.shards.iter().map(|s| s.spans.len()).sum()
    }

    pub(crate) fn shards(&self) -> &[Shard] {
        &self.shards
    }

    pub(crate) fn shards_mut(&mut self) -> &mut [Shard] {
        &mut self.shards
    }

    /// hand the shards out to be finalized elsewhere; the index is left empty and
    /// unfinalized until [`restore_finalized`](Self::restore_finalized).
    pub(crate) fn take_shards(&mut self) -> Vec<Shard> {
        self.finalized = false;
        let empty = (0..self.shards.len()).map(|_| Shard::default()).collect();
        mem::replace(&mut self.shards, empty)
    }

    pub(crate) fn restore_finalized(&mut self, shards: Vec<Shard>) {
        debug_assert_eq!(shards.len(), self.shards.len());
        self.shards = shards;
        self.finalized = true;
    }
}
