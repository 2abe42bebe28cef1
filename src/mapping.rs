// (c) Roel Kluin, 2023, GPL v3

use crate::kmerconst::KmerConst;
use crate::minimizer_index::MinimizerIndex;
use crate::overlap::{Overlap, Strand};
use crate::sequence::Sequence;
use crate::sketch::sketch;
use anyhow::Result;
use itertools::Itertools;
use log::debug;

/// Hits whose diagonals differ more than this from the first diagonal of a group
/// are not chained with it.
pub const DIAGONAL_BAND: i64 = 500;
/// Fewer hits than this make no overlap.
pub const MIN_CHAIN_HITS: usize = 4;
/// A chain is broken where consecutive hits are further apart on the query.
pub const MAX_CHAIN_GAP: u32 = 10_000;

/// A query minimizer found in the index. Positions are k-mer ends. The diagonal is
/// target - query position on the same strand, target + query position otherwise,
/// and nearly constant along a true overlap.
#[derive(new, Clone, Copy, Debug, PartialEq, Eq)]
struct Hit {
    t_id: u64,
    strand: Strand,
    diagonal: i64,
    q_pos: u32,
    t_pos: u32,
}

impl Hit {
    /// increases along a collinear chain ordered by query position.
    fn collinear_key(&self) -> i64 {
        match self.strand {
            Strand::Forward => i64::from(self.t_pos),
            Strand::Reverse => -i64::from(self.t_pos),
        }
    }
}

pub struct Mapping<'a> {
    kc: &'a KmerConst,
    index: &'a MinimizerIndex,
    query: &'a Sequence,
}

impl<'a> Mapping<'a> {
    pub fn new(kc: &'a KmerConst, index: &'a MinimizerIndex, query: &'a Sequence) -> Self {
        Mapping { kc, index, query }
    }

    /// Overlap candidates of the query with the indexed sequences, never with itself.
    /// Without `diagonal` all hits on a target strand are chained together; with
    /// `triangle` only targets with a lower identity than the query are reported.
    pub fn overlaps(&self, diagonal: bool, triangle: bool, trim: Option<u32>) -> Result<Vec<Overlap>> {
        let mut hits = self.hits(triangle, trim)?;
        if hits.len() < MIN_CHAIN_HITS {
            return Ok(Vec::new());
        }
        hits.sort_unstable_by_key(|h| (h.t_id, h.strand, h.diagonal, h.q_pos));

        let mut overlaps = Vec::new();
        let mut start = 0;
        for i in 1..=hits.len() {
            if i == hits.len() || !Self::same_group(&hits[start], &hits[i], diagonal) {
                self.chain(&mut hits[start..i], &mut overlaps);
                start = i;
            }
        }
        debug!(
            "{}: {} hits, {} overlaps",
            self.query.name,
            hits.len(),
            overlaps.len()
        );
        Ok(overlaps)
    }

    fn hits(&self, triangle: bool, trim: Option<u32>) -> Result<Vec<Hit>> {
        let q_id = self.query.id;
        let mut hits = Vec::new();
        for q in sketch(self.kc, self.query, trim)? {
            for t in self.index.lookup(q.value) {
                let t_id = t.loc.id();
                if t_id == q_id || (triangle && t_id > q_id) {
                    continue;
                }
                let strand = Strand::from(q.loc.same_ori(t.loc));
                let (q_pos, t_pos) = (q.loc.pos(), t.loc.pos());
                let diagonal = match strand {
                    Strand::Forward => i64::from(t_pos) - i64::from(q_pos),
                    Strand::Reverse => i64::from(t_pos) + i64::from(q_pos),
                };
                hits.push(Hit::new(t_id, strand, diagonal, q_pos, t_pos));
            }
        }
        Ok(hits)
    }

    /// `anchor` is the first hit of a group. Comparing against it bounds the spread,
    /// so stray hits between two diagonals cannot bridge them.
    fn same_group(anchor: &Hit, h: &Hit, diagonal: bool) -> bool {
        anchor.t_id == h.t_id
            && anchor.strand == h.strand
            && (!diagonal || h.diagonal - anchor.diagonal <= DIAGONAL_BAND)
    }

    /// the longest collinear run of a group, split where the query gap is too
    /// large; every piece with enough hits is an overlap.
    fn chain(&self, group: &mut [Hit], overlaps: &mut Vec<Overlap>) {
        if group.len() < MIN_CHAIN_HITS {
            return;
        }
        // per query position the keys descend, so at most one of them is chained.
        group.sort_unstable_by_key(|h| (h.q_pos, -h.collinear_key()));
        let group = &*group;
        let chain = longest_collinear(group);

        let mut first = 0;
        for i in 1..=chain.len() {
            if i == chain.len() || group[chain[i]].q_pos - group[chain[i - 1]].q_pos > MAX_CHAIN_GAP {
                if i - first >= MIN_CHAIN_HITS {
                    let hits = chain[first..i].iter().map(|&c| &group[c]);
                    overlaps.extend(self.span(hits));
                }
                first = i;
            }
        }
    }

    fn span<'h>(&self, hits: impl Iterator<Item = &'h Hit> + Clone) -> Option<Overlap> {
        let k = self.kc.kmerlen as u32;
        let head = hits.clone().next()?;
        let (q_min, q_max) = hits.clone().map(|h| h.q_pos).minmax().into_option()?;
        let (t_min, t_max) = hits.map(|h| h.t_pos).minmax().into_option()?;
        Some(Overlap::new(
            head.t_id,
            t_min + 1 - k,
            t_max + 1,
            q_min + 1 - k,
            q_max + 1,
            head.strand,
        ))
    }
}

/// Indices of a longest run with strictly increasing collinear keys, in order.
fn longest_collinear(group: &[Hit]) -> Vec<usize> {
    // tails[l]: the hit ending the best run of length l + 1 seen so far.
    let mut tails: Vec<usize> = Vec::with_capacity(group.len());
    let mut prev = vec![usize::MAX; group.len()];
    for (i, h) in group.iter().enumerate() {
        let key = h.collinear_key();
        let l = tails.partition_point(|&j| group[j].collinear_key() < key);
        if l > 0 {
            prev[i] = tails[l - 1];
        }
        if l == tails.len() {
            tails.push(i);
        } else {
            tails[l] = i;
        }
    }
    let mut chain = Vec::with_capacity(tails.len());
    let mut i = tails.last().copied().unwrap_or(usize::MAX);
    while i != usize::MAX {
        chain.push(i);
        i = prev[i];
    }
    chain.reverse();
    chain
}

/// Overlap candidates of `query` with everything in `index`.
pub fn map(
    kc: &KmerConst,
    index: &MinimizerIndex,
    query: &Sequence,
    diagonal: bool,
    triangle: bool,
    trim: Option<u32>,
) -> Result<Vec<Overlap>> {
    Mapping::new(kc, index, query).overlaps(diagonal, triangle, trim)
}
