// (c) Roel Kluin, 2023, GPL v3

use super::location::Location;
use std::fmt;

/// A minimizer occurrence: the canonical k-mer value and where it was seen.
/// Ordering is by value first, so sorted shards group equal values.
#[derive(new, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Minimizer {
    pub value: u64,
    pub loc: Location,
}

impl Minimizer {
    pub fn as_u128(&self) -> u128 {
        u128::from(self.value) << 64 | u128::from(self.loc.as_u64())
    }
}

impl From<u128> for Minimizer {
    fn from(raw: u128) -> Minimizer {
        Minimizer {
            value: (raw >> 64) as u64,
            loc: Location::from(raw as u64),
        }
    }
}

impl fmt::Debug for Minimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}@{}", self.value, self.loc)
    }
}
