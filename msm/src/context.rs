//! The caller-owned MSM context: a curve, the coordinator's scratch arena
//! and an optional pool of workers.

use crate::{
    error::MsmError,
    kernel::msm_serial,
    pool::WorkerPool,
    stats::MsmStats,
    window::MsmOptions,
};
use log::{debug, info};
use msm_curves::{AdditionMode, AffinePoint, Arena, Curve, FieldElement};
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Instant,
};

/// Runs MSMs over one curve, on the calling thread or on a worker pool.
///
/// ```ignore
/// let mut ctx = MsmContext::new(presets::bn254()?);
/// ctx.start_threads(8)?;
/// let sum = ctx.msm(&scalars, &points, &MsmOptions::default())?;
/// ctx.stop_threads();
/// ```
pub struct MsmContext<const N: usize> {
    curve: Arc<Curve<N>>,
    arena: Mutex<Arena<FieldElement<N>>>,
    pool: Option<WorkerPool>,
}

impl<const N: usize> MsmContext<N> {
    pub fn new(curve: Curve<N>) -> Self {
        Self {
            curve: Arc::new(curve),
            arena: Mutex::new(Arena::new()),
            pool: None,
        }
    }

    pub fn curve(&self) -> &Curve<N> {
        &self.curve
    }

    /// Number of running workers, zero when MSMs run on the calling thread.
    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(0, WorkerPool::size)
    }

    /// Starts `threads` workers (one per core for zero) and hands them the
    /// curve. A running pool is stopped first.
    pub fn start_threads(&mut self, threads: usize) -> Result<(), MsmError> {
        self.stop_threads();
        let pool = WorkerPool::start(threads)?;
        pool.broadcast(self.curve.name(), self.curve.clone())?;
        self.pool = Some(pool);
        Ok(())
    }

    /// Stops the workers; later MSMs run on the calling thread.
    pub fn stop_threads(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.stop();
            info!("{}: back to single-threaded MSM", self.curve.name());
        }
    }

    /// `sum_i scalars[i] * points[i]`, correct for every input.
    pub fn msm(
        &self,
        scalars: &[FieldElement<N>],
        points: &[AffinePoint<N>],
        options: &MsmOptions,
    ) -> Result<AffinePoint<N>, MsmError> {
        self.msm_with_stats(scalars, points, options, AdditionMode::Safe)
            .map(|(sum, _)| sum)
    }

    /// Faster MSM for inputs of distinct, independent points: the bucket
    /// accumulation assumes no two points it adds are equal or opposite, so
    /// repeated points (or points with known relations) give a wrong result.
    pub fn msm_unsafe(
        &self,
        scalars: &[FieldElement<N>],
        points: &[AffinePoint<N>],
        options: &MsmOptions,
    ) -> Result<AffinePoint<N>, MsmError> {
        self.msm_with_stats(scalars, points, options, AdditionMode::Unsafe)
            .map(|(sum, _)| sum)
    }

    /// MSM with the operation counters of every stage.
    ///
    /// With workers, the input is cut into one contiguous shard per worker,
    /// each worker runs the whole bucket method on its shard, and the partial
    /// sums are added up here.
    pub fn msm_with_stats(
        &self,
        scalars: &[FieldElement<N>],
        points: &[AffinePoint<N>],
        options: &MsmOptions,
        mode: AdditionMode,
    ) -> Result<(AffinePoint<N>, MsmStats), MsmError> {
        if scalars.len() != points.len() {
            return Err(MsmError::LengthMismatch {
                scalars: scalars.len(),
                points: points.len(),
            });
        }
        let curve = self.curve.as_ref();
        let start = Instant::now();
        let mut stats = MsmStats::default();

        let sum = match &self.pool {
            None => {
                let mut arena = self.arena.lock().unwrap_or_else(PoisonError::into_inner);
                msm_serial(curve, &mut arena, scalars, points, options, mode, &mut stats)?
            }
            Some(pool) => {
                let shards = pool.size();
                let key = curve.name();
                let partials = pool.call_workers(|state| {
                    let range = shard(points.len(), shards, state.index());
                    let curve = state.shared::<Curve<N>>(key)?;
                    let mut stats = MsmStats::default();
                    let arena = state.local::<Arena<FieldElement<N>>>();
                    let sum = msm_serial(
                        &curve,
                        arena,
                        &scalars[range.clone()],
                        &points[range],
                        options,
                        mode,
                        &mut stats,
                    )?;
                    Ok((sum, stats))
                })?;

                let mut sum = curve.identity();
                for (partial, shard_stats) in &partials {
                    sum = curve.add_projective(&sum, partial);
                    stats.merge(shard_stats);
                }
                stats.combination.projective_additions += partials.len() as u64;
                sum
            }
        };

        let result = curve.to_affine(&sum);
        debug!(
            "{}: MSM of {} terms on {} threads in {:?}",
            curve.name(),
            points.len(),
            self.threads().max(1),
            start.elapsed()
        );
        Ok((result, stats))
    }
}

impl<const N: usize> Drop for MsmContext<N> {
    fn drop(&mut self) {
        self.stop_threads();
    }
}

/// Contiguous range of the `index`-th of `shards` shards of `0..len`.
fn shard(len: usize, shards: usize, index: usize) -> std::ops::Range<usize> {
    (len * index / shards)..(len * (index + 1) / shards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shards_cover_the_range() {
        for (len, shards) in [(0, 3), (1, 4), (10, 3), (256, 16), (7, 7)] {
            let mut next = 0;
            for i in 0..shards {
                let range = shard(len, shards, i);
                assert_eq!(range.start, next);
                next = range.end;
            }
            assert_eq!(next, len);
        }
    }
}
