// (c) Roel Kluin, 2023, GPL v3

use crate::new_types::twobit::TwoBit;

#[derive(Copy, Clone)]
/// A kmer that dissociates index and strand orientation
pub struct Kmer {
    pub dna: u64,
    pub rc: u64,
    topb2: u32,
    topless: u64,
} //^-^\\

impl Kmer {
    /// get a kmer for this length, at most 32.
    pub fn new(kmerlen: u32) -> Self {
        debug_assert!((1..=32).contains(&kmerlen));
        let topb2 = kmerlen * 2 - 2;
        Kmer {
            dna: 0,
            rc: 0,
            topb2,
            topless: (1 << topb2) - 1,
        }
    }

    pub fn clear(&mut self) {
        self.dna = 0;
        self.rc = 0;
    }

    /// adds twobit to kmer sequences, to dna in the top two bits and its complement
    /// to the bottom of rc.
    #[inline(always)]
    pub fn add(&mut self, b2: TwoBit) {
        // XXX: function is hot
        self.dna = (self.dna >> 2) | b2.as_kmer_top(self.topb2);
        self.rc = ((self.rc & self.topless) << 2) | b2.as_kmer_bottom_rc();
    }

    /// true if the kmer is read from the template. Palindromes are.
    #[inline(always)]
    pub fn is_template(&self) -> bool {
        self.dna <= self.rc
    }

    /// the strand independent value and whether it was read from the reverse complement.
    #[inline(always)]
    pub fn canonical(&self) -> (u64, bool) {
        if self.is_template() {
            (self.dna, false)
        } else {
            (self.rc, true)
        }
    }
}
