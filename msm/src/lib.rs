#![deny(unsafe_code)]
#![deny(clippy::all)]

//! Multi-scalar multiplication with the bucket method.
//!
//! The engine computes `sum_i k_i P_i` for scalars `k_i` of the curve order
//! and affine points `P_i`, on any curve built by [`msm_curves`]. It splits
//! scalars with the GLV endomorphism when the curve has one, recodes them
//! into signed digits, and sums points into buckets with batched affine
//! additions (one field inversion per batch).
//!
//! [`msm`] and [`msm_unsafe`] run on the calling thread; an [`MsmContext`]
//! keeps a curve and an optional pool of workers across calls.

pub mod context;
pub mod digits;
pub mod error;
pub mod kernel;
pub mod pool;
pub mod prepare;
pub mod reference;
pub mod stats;
pub mod window;

pub use context::MsmContext;
pub use error::MsmError;
pub use pool::{WorkerPool, WorkerState};
pub use stats::{MsmStats, StageStats};
pub use window::{MsmOptions, WindowConfig, MAX_WINDOW_BITS};

use msm_curves::{AdditionMode, AffinePoint, Arena, Curve, FieldElement};

/// `sum_i scalars[i] * points[i]`, correct for every input, including
/// repeated points and the identity.
pub fn msm<const N: usize>(
    curve: &Curve<N>,
    scalars: &[FieldElement<N>],
    points: &[AffinePoint<N>],
    options: &MsmOptions,
) -> Result<AffinePoint<N>, MsmError> {
    run(curve, scalars, points, options, AdditionMode::Safe)
}

/// Like [`msm`], for inputs whose points are distinct and independent.
///
/// The bucket accumulation skips the checks for equal and opposite points.
/// An input that makes it add a point to itself or to its opposite gives a
/// wrong result, not an error.
pub fn msm_unsafe<const N: usize>(
    curve: &Curve<N>,
    scalars: &[FieldElement<N>],
    points: &[AffinePoint<N>],
    options: &MsmOptions,
) -> Result<AffinePoint<N>, MsmError> {
    run(curve, scalars, points, options, AdditionMode::Unsafe)
}

fn run<const N: usize>(
    curve: &Curve<N>,
    scalars: &[FieldElement<N>],
    points: &[AffinePoint<N>],
    options: &MsmOptions,
    mode: AdditionMode,
) -> Result<AffinePoint<N>, MsmError> {
    let mut arena = Arena::new();
    let sum = kernel::msm_serial(
        curve,
        &mut arena,
        scalars,
        points,
        options,
        mode,
        &mut MsmStats::default(),
    )?;
    Ok(curve.to_affine(&sum))
}
