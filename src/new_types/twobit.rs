// (c) Roel Kluin, 2023, GPL v3

use std::fmt;

/// A single unambiguous base. The encoding follows the ascii bits:
/// A: 0x0, C: 0x1, T: 0x2, G: 0x3, so complementing is a xor with 2.
#[derive(Copy, Clone, PartialEq, Eq, new)]
pub struct TwoBit(u8);

impl TwoBit {
    /// None for N and other IUPAC codes.
    #[inline(always)]
    pub fn from_ascii(c: u8) -> Option<TwoBit> {
        match c {
            b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't' => Some(TwoBit((c >> 1) & 3)),
            _ => None,
        }
    }
    #[inline(always)]
    pub(crate) fn as_kmer_top(&self, shift: u32) -> u64 {
        (self.0 as u64) << shift
    }
    #[inline(always)]
    pub(crate) fn as_kmer_bottom_rc(&self) -> u64 {
        2 ^ self.0 as u64
    }
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Debug for TwoBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "A (0)"),
            1 => write!(f, "C (1)"),
            2 => write!(f, "T (2)"),
            3 => write!(f, "G (3)"),
            _ => unreachable!(),
        }
    }
}
