// (c) Roel Kluin, 2023, GPL v3

//! Minimizer sketching: per window of `w` consecutive k-mers, every k-mer with the
//! smallest canonical value is kept. Ties are all kept, so two sequences sharing a
//! window always share its minimizers. Each occurrence is stored once, however many
//! windows it is the minimum of.

use crate::kmer::Kmer;
use crate::kmerconst::KmerConst;
use crate::new_types::location::{Location, ID_MAX, POS_LIMIT};
use crate::new_types::minimizer::Minimizer;
use crate::new_types::twobit::TwoBit;
use crate::sequence::Sequence;
use anyhow::{ensure, Result};
use std::collections::VecDeque;

struct Candidate {
    value: u64,
    loc: Location,
    nr: usize,
    stored: bool,
}

/// Sliding window state over a run of unambiguous bases.
struct Sketcher<'a> {
    kc: &'a KmerConst,
    id: u64,
    kmer: Kmer,
    window: VecDeque<Candidate>,
    run: usize,
    kmers: usize,
    out: Vec<Minimizer>,
}

impl<'a> Sketcher<'a> {
    fn new(kc: &'a KmerConst, id: u64, capacity: usize) -> Self {
        Sketcher {
            kc,
            id,
            kmer: Kmer::new(kc.kmerlen as u32),
            window: VecDeque::with_capacity(kc.window + 1),
            run: 0,
            kmers: 0,
            out: Vec::with_capacity(capacity),
        }
    }

    /// bases of `seq` start at position `offset` of the sequence.
    fn extend(&mut self, offset: usize, seq: &[u8]) {
        for (i, &c) in seq.iter().enumerate() {
            match TwoBit::from_ascii(c) {
                Some(b2) => self.push(offset + i, b2),
                None => self.end_run(),
            }
        }
    }

    fn push(&mut self, pos: usize, b2: TwoBit) {
        // XXX: function is hot
        self.kmer.add(b2);
        self.run += 1;
        if self.run < self.kc.kmerlen {
            return;
        }
        let (value, reverse) = self.kmer.canonical();
        let nr = self.kmers;
        self.kmers += 1;

        // equal values stay: ties are all minimizers.
        while self.window.back().map_or(false, |c| c.value > value) {
            self.window.pop_back();
        }
        self.window.push_back(Candidate {
            value,
            loc: Location::from_parts(self.id, pos as u64, reverse),
            nr,
            stored: false,
        });
        if self.kmers >= self.kc.window {
            let first = self.kmers - self.kc.window;
            while self.window.front().map_or(false, |c| c.nr < first) {
                self.window.pop_front();
            }
            self.store_minima();
        }
    }

    fn store_minima(&mut self) {
        let Some(min) = self.window.front().map(|c| c.value) else {
            return;
        };
        let out = &mut self.out;
        for c in self.window.iter_mut().take_while(|c| c.value == min) {
            if !c.stored {
                out.push(Minimizer::new(c.value, c.loc));
                c.stored = true;
            }
        }
    }

    /// an ambiguous base or the end of the sequence. A run with fewer k-mers than the
    /// window still yields its minimum.
    fn end_run(&mut self) {
        if self.kmers > 0 && self.kmers < self.kc.window {
            self.store_minima();
        }
        self.window.clear();
        self.kmer.clear();
        self.run = 0;
        self.kmers = 0;
    }
}

/// Minimizers of `seq`, ordered by position. With `trim` set, only the first and
/// last `trim` bases are sketched, unless those ends would meet.
pub fn sketch(kc: &KmerConst, seq: &Sequence, trim: Option<u32>) -> Result<Vec<Minimizer>> {
    let len = seq.data.len();
    if len < kc.kmerlen {
        return Ok(Vec::new());
    }
    ensure!(
        seq.id <= ID_MAX,
        "sequence {} has identity {} beyond {ID_MAX}",
        seq.name,
        seq.id
    );
    ensure!(
        len as u64 <= POS_LIMIT,
        "sequence {} is {len} bases, longer than {POS_LIMIT}",
        seq.name
    );
    let expected = 2 * len / (kc.window + 1) + 1;
    let mut sk = Sketcher::new(kc, seq.id, expected);

    match trim.map(|e| e as usize) {
        Some(e) if e.saturating_mul(2) < len => {
            sk.extend(0, &seq.data[..e]);
            sk.end_run();
            sk.extend(len - e, &seq.data[len - e..]);
        }
        _ => sk.extend(0, &seq.data),
    }
    sk.end_run();
    Ok(sk.out)
}
