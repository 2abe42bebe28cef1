// (c) Roel Kluin, 2023, GPL v3

use serde::Serialize;
use std::fmt;

/// Relative orientation of query and target in an overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    pub fn is_forward(&self) -> bool {
        *self == Strand::Forward
    }
}

impl From<bool> for Strand {
    /// from whether the two occurrences were read on the same strand.
    fn from(same_ori: bool) -> Strand {
        if same_ori {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// A candidate pairing of a target and a query region; ranges are half open,
/// approximate and never base-verified.
#[derive(new, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub t_id: u64,
    pub t_begin: u32,
    pub t_end: u32,
    pub q_begin: u32,
    pub q_end: u32,
    pub strand: Strand,
}

impl Overlap {
    pub fn t_len(&self) -> u32 {
        self.t_end - self.t_begin
    }
    pub fn q_len(&self) -> u32 {
        self.q_end - self.q_begin
    }
}

impl fmt::Display for Overlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "q[{}, {}) {} t{}[{}, {})",
            self.q_begin, self.q_end, self.strand, self.t_id, self.t_begin, self.t_end
        )
    }
}
