// (c) Roel Kluin, 2023, GPL v3

use anyhow::{ensure, Result};
use derive_more::Into;
use std::fmt;

pub(crate) const ID_SHIFT: u32 = 32;
pub(crate) const ID_MASK: u64 = !0x0 ^ ((1 << ID_SHIFT) - 1);
pub(super) const POS_SHIFT: u32 = 1;
pub(crate) const POS_MASK: u64 = ((1 << ID_SHIFT) - 1) ^ ((1 << POS_SHIFT) - 1);
const ORI_MASK: u64 = 0x1;

/// Largest identity that fits the packed word.
pub const ID_MAX: u64 = (1 << (64 - ID_SHIFT)) - 1;
/// Positions must stay below this.
pub const POS_LIMIT: u64 = 1 << (ID_SHIFT - POS_SHIFT);

/// Where a minimizer was seen, in an u64: sequence identity, k-mer end position
/// and whether the reverse complement was the canonical k-mer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Into)]
pub struct Location(u64);

impl Location {
    pub fn new(id: u64, pos: u64, reverse: bool) -> Result<Self> {
        ensure!(id <= ID_MAX, "sequence identity {id} does not fit {ID_MAX:#x}");
        ensure!(pos < POS_LIMIT, "position {pos} beyond {POS_LIMIT}");
        Ok(Location::from_parts(id, pos, reverse))
    }
    /// unchecked; the sketcher validates identity and length once per sequence.
    #[inline(always)]
    pub(crate) fn from_parts(id: u64, pos: u64, reverse: bool) -> Self {
        Location(id << ID_SHIFT | pos << POS_SHIFT | u64::from(reverse))
    }
    pub fn as_u64(&self) -> u64 {
        self.0
    }
    pub fn id(&self) -> u64 {
        (self.0 & ID_MASK) >> ID_SHIFT
    }
    /// Position of the last base of the k-mer.
    pub fn pos(&self) -> u32 {
        ((self.0 & POS_MASK) >> POS_SHIFT) as u32
    }
    pub fn is_reverse(&self) -> bool {
        self.0 & ORI_MASK != 0
    }
    pub(crate) fn same_ori(&self, other: Location) -> bool {
        self.is_reverse() == other.is_reverse()
    }
}

impl From<u64> for Location {
    fn from(raw: u64) -> Location {
        Location(raw)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ori = if self.is_reverse() { '-' } else { '+' };
        write!(f, "{}:{}{}", self.id(), self.pos(), ori)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn no_mask_overlaps() {
        assert_eq!(ID_MASK & POS_MASK, 0);
        assert_eq!(ID_MASK & ORI_MASK, 0);
        assert_eq!(POS_MASK & ORI_MASK, 0);
        assert_eq!(ID_MASK | POS_MASK | ORI_MASK, !0);
    }

    #[test]
    fn layout() {
        let loc = Location::new(5, 300, true).unwrap();
        assert_eq!(loc.as_u64(), 5 << 32 | 300 << 1 | 1);
        let loc = Location::new(ID_MAX, POS_LIMIT - 1, false).unwrap();
        assert_eq!(loc.as_u64(), !0 ^ 1);
    }

    #[test]
    fn unpack() {
        let mut rng = StdRng::seed_from_u64(40164);
        for _ in 0..1000 {
            let id = rng.gen_range(0..=ID_MAX);
            let pos = rng.gen_range(0..POS_LIMIT);
            let reverse = rng.gen_bool(0.5);
            let loc = Location::new(id, pos, reverse).unwrap();
            assert_eq!((loc.id(), u64::from(loc.pos()), loc.is_reverse()), (id, pos, reverse));
        }
    }

    #[test]
    fn out_of_range() {
        assert!(Location::new(ID_MAX + 1, 0, false).is_err());
        assert!(Location::new(0, POS_LIMIT, false).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Location::new(3, 17, true).unwrap().to_string(), "3:17-");
        assert_eq!(Location::new(3, 17, false).unwrap().to_string(), "3:17+");
    }
}
