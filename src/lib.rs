// (c) Roel Kluin, 2023, GPL v3

#[macro_use]
extern crate derive_new;

pub mod engine;
pub mod frequency_filter;
pub mod kmer;
pub mod kmerconst;
pub mod loader;
pub mod logging;
pub mod mapping;
pub mod minimizer_index;
pub mod new_types;
pub mod overlap;
pub mod overlaps;
pub mod sequence;
pub mod sketch;
pub mod thread_pool;

#[cfg(test)]
mod testseq;
