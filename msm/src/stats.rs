//! Operation counters of an MSM run.

use serde::Serialize;
use std::ops::AddAssign;

// Rough costs in field multiplications, squarings counted as one.
const AFFINE_ADDITION_COST: u64 = 6;
const PROJECTIVE_ADDITION_COST: u64 = 12;
const DOUBLING_COST: u64 = 8;
// An inversion on 29-bit limbs costs about this many multiplications.
const INVERSION_COST: u64 = 80;

/// Counters for one stage of the bucket method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageStats {
    /// Calls to the batched affine addition.
    pub batch_additions: u64,
    /// Point additions performed inside those batches.
    pub affine_additions: u64,
    /// Batch inversions, one per batched addition.
    pub inversions: u64,
    pub projective_additions: u64,
    pub doublings: u64,
}

impl StageStats {
    pub(crate) fn record_batch(&mut self, pairs: usize) {
        self.batch_additions += 1;
        self.inversions += 1;
        self.affine_additions += pairs as u64;
    }

    pub fn estimated_multiplications(&self) -> u64 {
        self.affine_additions * AFFINE_ADDITION_COST
            + self.inversions * INVERSION_COST
            + self.projective_additions * PROJECTIVE_ADDITION_COST
            + self.doublings * DOUBLING_COST
    }
}

impl AddAssign for StageStats {
    fn add_assign(&mut self, other: Self) {
        self.batch_additions += other.batch_additions;
        self.affine_additions += other.affine_additions;
        self.inversions += other.inversions;
        self.projective_additions += other.projective_additions;
        self.doublings += other.doublings;
    }
}

/// Per-stage counters of an MSM, summed over all shards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MsmStats {
    /// Points fed to the bucket kernel, after GLV splitting and dropping
    /// zero terms.
    pub points: usize,
    pub window_bits: u32,
    pub sub_window_bits: u32,
    pub windows: usize,
    /// Sorting points into buckets.
    pub accumulation: StageStats,
    /// Weighting and summing the buckets of each window.
    pub reduction: StageStats,
    /// Combining the window sums.
    pub recombination: StageStats,
    /// Adding up the partial results of the shards.
    pub combination: StageStats,
}

impl MsmStats {
    pub fn estimated_multiplications(&self) -> u64 {
        self.accumulation.estimated_multiplications()
            + self.reduction.estimated_multiplications()
            + self.recombination.estimated_multiplications()
            + self.combination.estimated_multiplications()
    }

    /// Folds the counters of another shard into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.points += other.points;
        self.window_bits = self.window_bits.max(other.window_bits);
        self.sub_window_bits = self.sub_window_bits.max(other.sub_window_bits);
        self.windows = self.windows.max(other.windows);
        self.accumulation += other.accumulation;
        self.reduction += other.reduction;
        self.recombination += other.recombination;
        self.combination += other.combination;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adds_counters() {
        let mut a = MsmStats {
            points: 3,
            window_bits: 4,
            windows: 2,
            ..Default::default()
        };
        a.accumulation.record_batch(5);
        let mut b = a.clone();
        b.windows = 7;
        b.reduction.doublings = 2;
        a.merge(&b);

        assert_eq!(a.points, 6);
        assert_eq!(a.windows, 7);
        assert_eq!(a.accumulation.affine_additions, 10);
        assert_eq!(a.accumulation.inversions, 2);
        assert_eq!(
            a.estimated_multiplications(),
            10 * AFFINE_ADDITION_COST + 2 * INVERSION_COST + 2 * DOUBLING_COST
        );
    }
}
