// (c) Roel Kluin, 2023, GPL v3

pub mod location;
pub mod minimizer;
pub mod twobit;
