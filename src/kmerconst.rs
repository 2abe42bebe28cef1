// (c) Roel Kluin, 2023, GPL v3

use anyhow::{ensure, Result};
use log::debug;
use std::cmp;

/// k-mers are packed two bits per base in an u64.
pub const KMERLEN_MAX: usize = 32;
pub const WINDOW_MAX: usize = u8::MAX as usize;
const SHARD_BITS_MAX: usize = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KmerConst {
    pub kmerlen: usize,
    pub window: usize,
    pub shard_bits: usize,
}

impl KmerConst {
    pub fn new(kmerlen: usize, window: usize) -> Result<Self> {
        ensure!(
            (1..=KMERLEN_MAX).contains(&kmerlen),
            "k-mer length {kmerlen} not in 1..={KMERLEN_MAX}"
        );
        ensure!(
            (1..=WINDOW_MAX).contains(&window),
            "window length {window} not in 1..={WINDOW_MAX}"
        );
        // no more shards than there are distinct k-mers.
        let shard_bits = cmp::min(SHARD_BITS_MAX, kmerlen * 2);
        debug!("kmerlen: {kmerlen}, window: {window}, shards: {}", 1 << shard_bits);
        Ok(KmerConst {
            kmerlen,
            window,
            shard_bits,
        })
    }
    pub fn no_shards(&self) -> usize {
        1 << self.shard_bits
    }
    /// shard selection; the shard count is a power of two so this is value mod shards.
    pub fn shard_mask(&self) -> u64 {
        (1 << self.shard_bits) - 1
    }
}
