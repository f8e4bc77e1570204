//! The bucket method.
//!
//! For each window of `c` bits, every point is added into the bucket of its
//! signed digit (negated when the digit is negative). The buckets are then
//! weighted by their index and summed, and the window sums are combined by
//! doubling `c` times between windows, from the top window down.
//!
//! Bucket accumulation is where almost all additions happen. It runs in
//! rounds: each round adds the points of every bucket pairwise with one
//! batched affine addition, halving the size of every bucket, until each
//! bucket holds a single point.
//!
//! Bucket reduction splits the `2^(c-1)` buckets of a window into
//! `2^(c-1-c0)` columns of `2^c0` consecutive buckets, and runs the usual
//! running-sum trick down all columns at once, so that the running sums are
//! again batched affine additions. The columns are then combined with
//! projective arithmetic.

use crate::{
    digits::{extract_bit_slice, signed_digit},
    error::MsmError,
    prepare::PreparedInput,
    stats::{MsmStats, StageStats},
    window::{MsmOptions, WindowConfig},
};
use log::debug;
use msm_curves::{AdditionMode, AffinePoint, Arena, Curve, FieldElement, PairIndices, ProjectivePoint};
use std::time::{Duration, Instant};

/// Runs the whole pipeline on one thread: GLV split, window selection and
/// the bucket method.
pub fn msm_serial<const N: usize>(
    curve: &Curve<N>,
    arena: &mut Arena<FieldElement<N>>,
    scalars: &[FieldElement<N>],
    points: &[AffinePoint<N>],
    options: &MsmOptions,
    mode: AdditionMode,
    stats: &mut MsmStats,
) -> Result<ProjectivePoint<N>, MsmError> {
    if scalars.len() != points.len() {
        return Err(MsmError::LengthMismatch {
            scalars: scalars.len(),
            points: points.len(),
        });
    }
    let input = PreparedInput::new(curve, scalars, points, options.use_glv);
    let config = WindowConfig::resolve(options, input.len())?;
    debug!(
        "{}: {} terms, {} after splitting, {} bits, c = {}, c0 = {}",
        curve.name(),
        points.len(),
        input.len(),
        input.bits(),
        config.c,
        config.c0
    );
    Ok(bucket_msm(curve, arena, &input, config, mode, stats))
}

/// Reusable buffers of the accumulation stage.
struct Buckets<const N: usize> {
    digits: Vec<i64>,
    carries: Vec<u64>,
    /// Points sorted by bucket, then summed in place.
    work: Vec<AffinePoint<N>>,
    /// `offsets[b]` is where bucket `b` starts in `work`.
    offsets: Vec<usize>,
    cursor: Vec<usize>,
    /// Number of points still to be summed in each bucket.
    sizes: Vec<usize>,
    pairs: Vec<PairIndices>,
    moves: Vec<(usize, usize)>,
}

impl<const N: usize> Buckets<N> {
    fn new(points: usize, buckets: usize) -> Self {
        Self {
            digits: vec![0; points],
            carries: vec![0; points],
            work: Vec::with_capacity(points),
            offsets: vec![0; buckets + 2],
            cursor: vec![0; buckets + 2],
            sizes: vec![0; buckets + 1],
            pairs: Vec::new(),
            moves: Vec::new(),
        }
    }
}

/// `sum_i scalar_i * point_i` over a prepared input.
pub fn bucket_msm<const N: usize>(
    curve: &Curve<N>,
    arena: &mut Arena<FieldElement<N>>,
    input: &PreparedInput<N>,
    config: WindowConfig,
    mode: AdditionMode,
    stats: &mut MsmStats,
) -> ProjectivePoint<N> {
    let windows = config.windows(input.bits());
    stats.points += input.len();
    stats.window_bits = config.c;
    stats.sub_window_bits = config.c0;
    stats.windows = windows;
    if input.is_empty() {
        return curve.identity();
    }

    let mut scratch = Buckets::new(input.len(), config.buckets());
    let mut bucket_sums = vec![curve.affine_identity(); config.buckets() + 1];
    let mut window_sums = Vec::with_capacity(windows);
    let (mut accumulating, mut reducing) = (Duration::ZERO, Duration::ZERO);

    for window in 0..windows {
        let start = Instant::now();
        accumulate(
            curve,
            arena,
            input,
            config,
            window,
            mode,
            &mut scratch,
            &mut bucket_sums,
            &mut stats.accumulation,
        );
        accumulating += start.elapsed();

        let start = Instant::now();
        window_sums.push(reduce(
            curve,
            arena,
            &bucket_sums,
            config,
            &mut stats.reduction,
        ));
        reducing += start.elapsed();
    }
    debug_assert!(scratch.carries.iter().all(|c| *c == 0));

    let start = Instant::now();
    let result = recombine(curve, &window_sums, config.c, &mut stats.recombination);
    debug!(
        "{} windows: accumulation {:?}, reduction {:?}, recombination {:?}",
        windows,
        accumulating,
        reducing,
        start.elapsed()
    );
    result
}

/// Sums the points of every bucket of `window` into `bucket_sums[1..]`.
#[allow(clippy::too_many_arguments)]
fn accumulate<const N: usize>(
    curve: &Curve<N>,
    arena: &mut Arena<FieldElement<N>>,
    input: &PreparedInput<N>,
    config: WindowConfig,
    window: usize,
    mode: AdditionMode,
    scratch: &mut Buckets<N>,
    bucket_sums: &mut [AffinePoint<N>],
    stats: &mut StageStats,
) {
    let buckets = config.buckets();
    let start_bit = window * config.c as usize;

    // counting sort of the points by bucket
    scratch.offsets.fill(0);
    let slots = scratch.digits.iter_mut().zip(scratch.carries.iter_mut());
    for (i, (digit, carry)) in slots.enumerate() {
        let slice = extract_bit_slice(input.scalar(i), start_bit, config.c);
        *digit = signed_digit(slice, carry, config.c);
        if *digit != 0 {
            scratch.offsets[digit.unsigned_abs() as usize + 1] += 1;
        }
    }
    scratch.sizes[1..].copy_from_slice(&scratch.offsets[2..]);
    let mut running = 0;
    for offset in scratch.offsets.iter_mut() {
        running += *offset;
        *offset = running;
    }
    scratch.cursor.copy_from_slice(&scratch.offsets);

    let total = scratch.offsets[buckets + 1];
    scratch.work.clear();
    scratch.work.resize(total, curve.affine_identity());
    for (i, point) in input.points().iter().enumerate() {
        let digit = scratch.digits[i];
        if digit == 0 {
            continue;
        }
        let bucket = digit.unsigned_abs() as usize;
        scratch.work[scratch.cursor[bucket]] = if digit < 0 {
            curve.negate(point)
        } else {
            *point
        };
        scratch.cursor[bucket] += 1;
    }

    // pairwise rounds
    loop {
        scratch.pairs.clear();
        scratch.moves.clear();
        let bucket_sizes = scratch.offsets[1..].iter().zip(scratch.sizes[1..].iter_mut());
        for (&start, size) in bucket_sizes {
            if *size < 2 {
                continue;
            }
            for i in 0..*size / 2 {
                scratch.pairs.push(PairIndices {
                    out: start + i,
                    lhs: start + 2 * i,
                    rhs: start + 2 * i + 1,
                });
            }
            if *size % 2 == 1 {
                scratch.moves.push((start + *size - 1, start + *size / 2));
            }
            *size = (*size).div_ceil(2);
        }
        if scratch.pairs.is_empty() {
            break;
        }
        curve.batch_add_pairs(arena, &mut scratch.work, &scratch.pairs, mode);
        for &(from, to) in &scratch.moves {
            scratch.work[to] = scratch.work[from];
        }
        stats.record_batch(scratch.pairs.len());
    }

    for (b, sum) in bucket_sums.iter_mut().enumerate().skip(1) {
        *sum = if scratch.sizes[b] == 0 {
            curve.affine_identity()
        } else {
            scratch.work[scratch.offsets[b]]
        };
    }
}

/// `sum_b b * bucket_sums[b]`.
///
/// Bucket `j 2^c0 + e` (with `1 <= e <= 2^c0`) sits in column `j`. Running
/// sums down the columns give `sum_e e * B[j 2^c0 + e]` and the column
/// totals `A_j`; the missing `2^c0 sum_j j A_j` is a second running sum over
/// the columns. The bucket sums may contain equal or opposite points, so
/// this stage always uses the complete addition.
fn reduce<const N: usize>(
    curve: &Curve<N>,
    arena: &mut Arena<FieldElement<N>>,
    bucket_sums: &[AffinePoint<N>],
    config: WindowConfig,
    stats: &mut StageStats,
) -> ProjectivePoint<N> {
    let rows = 1usize << config.c0;
    let columns = config.buckets() / rows;

    let identity = curve.affine_identity();
    let mut totals = vec![identity; columns];
    let mut running = vec![identity; columns];
    let mut row = vec![identity; columns];
    for e in (1..=rows).rev() {
        for (j, point) in row.iter_mut().enumerate() {
            *point = bucket_sums[j * rows + e];
        }
        curve.batch_add_assign(arena, &mut totals, &row, AdditionMode::Safe);
        curve.batch_add_assign(arena, &mut running, &totals, AdditionMode::Safe);
        stats.record_batch(columns);
        stats.record_batch(columns);
    }

    let mut sum = curve.identity();
    for point in &running {
        sum = curve.add_mixed(&sum, point);
    }
    stats.projective_additions += columns as u64;

    let (mut partial, mut weighted) = (curve.identity(), curve.identity());
    for total in totals.iter().skip(1).rev() {
        partial = curve.add_mixed(&partial, total);
        weighted = curve.add_projective(&weighted, &partial);
    }
    for _ in 0..config.c0 {
        weighted = curve.double_projective(&weighted);
    }
    stats.projective_additions += 2 * (columns as u64 - 1) + 1;
    stats.doublings += u64::from(config.c0);

    curve.add_projective(&sum, &weighted)
}

/// `sum_k 2^(c k) window_sums[k]`, by Horner's rule from the top window.
fn recombine<const N: usize>(
    curve: &Curve<N>,
    window_sums: &[ProjectivePoint<N>],
    c: u32,
    stats: &mut StageStats,
) -> ProjectivePoint<N> {
    let Some((top, rest)) = window_sums.split_last() else {
        return curve.identity();
    };
    let mut result = *top;
    for sum in rest.iter().rev() {
        for _ in 0..c {
            result = curve.double_projective(&result);
        }
        result = curve.add_projective(&result, sum);
    }
    stats.doublings += u64::from(c) * rest.len() as u64;
    stats.projective_additions += rest.len() as u64;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::msm_naive;
    use msm_curves::presets;
    use msm_utils::tests::make_test_rng;

    #[test]
    fn test_every_window_shape_on_small_inputs() {
        let mut rng = make_test_rng(None);
        let curve = presets::pallas().unwrap();
        let fr = curve.scalar_field();
        let scalars: Vec<_> = (0..20).map(|_| fr.random(&mut rng)).collect();
        let points = curve.random_points_fast(&mut rng, 20);
        let expected = msm_naive(&curve, &scalars, &points).unwrap();

        let mut arena = Arena::new();
        for (c, c0) in [(1, 0), (2, 0), (2, 1), (5, 2), (8, 7), (13, 3)] {
            let options = MsmOptions::default().with_window(c, c0);
            let mut stats = MsmStats::default();
            let result = msm_serial(
                &curve,
                &mut arena,
                &scalars,
                &points,
                &options,
                AdditionMode::Safe,
                &mut stats,
            )
            .unwrap();
            assert!(curve.eq_projective(&result, &expected), "c = {c}, c0 = {c0}");
            assert_eq!(stats.window_bits, c);
            assert_eq!(arena.used(), 0);
        }
    }

    #[test]
    fn test_recombine_weights_windows() {
        let curve = presets::bn254().unwrap();
        let g = curve.to_projective(curve.generator());
        let mut stats = StageStats::default();
        // 1 + 2^3 * 2 = 17
        let result = recombine(&curve, &[g, curve.double_projective(&g)], 3, &mut stats);
        let expected = curve.scalar_mul(curve.generator(), &17u8.into());
        assert!(curve.eq_projective(&result, &expected));
        assert_eq!(stats.doublings, 3);
    }

    #[test]
    fn test_reduce_weights_buckets() {
        let curve = presets::ed25519().unwrap();
        let g = *curve.generator();
        let config = WindowConfig::new(4, 2).unwrap();
        // bucket b holds b G, except bucket 3 which is empty
        let mut buckets = vec![curve.affine_identity(); 9];
        for (b, bucket) in buckets.iter_mut().enumerate().skip(1) {
            if b != 3 {
                *bucket = curve.to_affine(&curve.scalar_mul(&g, &(b as u64).into()));
            }
        }
        let mut stats = StageStats::default();
        let result = reduce(&curve, &mut Arena::new(), &buckets, config, &mut stats);
        // sum of b^2 for b in 1..=8, minus 9
        let expected = curve.scalar_mul(&g, &(204u64 - 9).into());
        assert!(curve.eq_projective(&result, &expected));
        assert_eq!(stats.batch_additions, 8);
    }
}
