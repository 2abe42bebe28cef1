// (c) Roel Kluin, 2023, GPL v3

use crate::minimizer_index::{MinimizerIndex, Shard};
use anyhow::{ensure, Result};
use log::info;

impl MinimizerIndex {
    /// Hide the fraction `f` of distinct values that occur most often. Their
    /// occurrences stay stored, but lookups no longer find them. Counts are taken
    /// over all stored values, hidden or not, so successive calls leave the index
    /// as filtered with the largest `f`; nothing hidden is restored.
    /// Returns the number of values hidden by this call.
    pub fn filter(&mut self, f: f64) -> Result<usize> {
        ensure!(
            (0.0..=1.0).contains(&f),
            "filter fraction {f} outside [0, 1]"
        );
        if f == 0.0 {
            return Ok(0);
        }
        ensure!(self.is_finalized(), "filtering an index that is not finalized");
        let mut counts: Vec<usize> = self.shards().iter().flat_map(Shard::value_counts).collect();
        if counts.is_empty() {
            return Ok(0);
        }
        // the values to hide, rounded up; the epsilon absorbs the error in f * D.
        let hide = ((f * counts.len() as f64 - 1e-9).ceil() as usize).min(counts.len());
        let keep = counts.len() - hide;
        let threshold = match keep.checked_sub(1) {
            Some(nth) => *counts.select_nth_unstable(nth).1,
            None => 0,
        };
        let mut removed = 0;
        for shard in self.shards_mut() {
            let before = shard.spans.len();
            shard.spans.retain(|_, span| span.count <= threshold);
            removed += before - shard.spans.len();
        }
        info!(
            "filter {f}: {removed} of {} minimizer values occur over {threshold} times",
            counts.len()
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::kmerconst::KmerConst;
    use crate::minimizer_index::MinimizerIndex;
    use crate::new_types::location::Location;
    use crate::new_types::minimizer::Minimizer;

    /// value v occurs v times, for v in 1..=10.
    fn staircase() -> MinimizerIndex {
        let kc = KmerConst::new(4, 3).unwrap();
        let mut idx = MinimizerIndex::new(&kc);
        let sketch: Vec<_> = (1..=10_u64)
            .flat_map(|v| (0..v).map(move |p| Minimizer::new(v, Location::new(0, v * 100 + p, false).unwrap())))
            .collect();
        idx.populate(&sketch);
        idx.finalize();
        idx
    }

    fn found(idx: &MinimizerIndex) -> Vec<u64> {
        (1..=10).filter(|&v| !idx.lookup(v).is_empty()).collect()
    }

    #[test]
    fn zero_is_noop() {
        let mut idx = staircase();
        let before: Vec<_> = (1..=10).map(|v| idx.lookup(v).to_vec()).collect();
        assert_eq!(idx.filter(0.0).unwrap(), 0);
        let after: Vec<_> = (1..=10).map(|v| idx.lookup(v).to_vec()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn one_empties() {
        let mut idx = staircase();
        assert_eq!(idx.filter(1.0).unwrap(), 10);
        assert!(found(&idx).is_empty());
        assert_eq!(idx.distinct(), 0);
    }

    #[test]
    fn most_frequent_go_first() {
        let mut idx = staircase();
        assert_eq!(idx.filter(0.25).unwrap(), 3);
        assert_eq!(found(&idx), (1..=7).collect::<Vec<_>>());
        // a smaller fraction neither hides more nor restores
        assert_eq!(idx.filter(0.125).unwrap(), 0);
        assert_eq!(found(&idx), (1..=7).collect::<Vec<_>>());
        assert_eq!(idx.filter(0.5).unwrap(), 2);
        assert_eq!(found(&idx), (1..=5).collect::<Vec<_>>());
        assert_eq!(idx.len(), 55);
    }

    #[test]
    fn fraction_of_distinct_values() {
        // 1 - 0.9 is just below 0.1 in floating point.
        let mut idx = staircase();
        assert_eq!(idx.filter(0.9).unwrap(), 9);
        assert_eq!(found(&idx), vec![1]);

        let mut idx = staircase();
        assert_eq!(idx.filter(0.3).unwrap(), 3);
        assert_eq!(found(&idx), (1..=7).collect::<Vec<_>>());

        // any fraction above zero hides at least one value.
        let mut idx = staircase();
        assert_eq!(idx.filter(0.001).unwrap(), 1);
        assert_eq!(found(&idx), (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn ties_at_the_threshold_stay() {
        let kc = KmerConst::new(4, 3).unwrap();
        let mut idx = MinimizerIndex::new(&kc);
        let sketch: Vec<_> = [1_u64, 2, 3, 4]
            .iter()
            .flat_map(|&v| (0..3).map(move |p| Minimizer::new(v, Location::new(0, v * 10 + p, false).unwrap())))
            .collect();
        idx.populate(&sketch);
        idx.finalize();
        assert_eq!(idx.filter(0.5).unwrap(), 0);
        assert_eq!(idx.distinct(), 4);
    }

    #[test]
    fn out_of_range() {
        let mut idx = staircase();
        assert!(idx.filter(-0.1).is_err());
        assert!(idx.filter(1.01).is_err());
        assert!(idx.filter(f64::NAN).is_err());
        assert_eq!(idx.distinct(), 10);
    }

    #[test]
    fn empty_index() {
        let kc = KmerConst::new(4, 3).unwrap();
        let mut idx = MinimizerIndex::new(&kc);
        assert!(idx.filter(0.5).is_err());
        idx.finalize();
        assert_eq!(idx.filter(0.5).unwrap(), 0);
    }
}
