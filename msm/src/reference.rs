//! A naive MSM, one double-and-add per term.

use crate::error::MsmError;
use msm_curves::{AffinePoint, Curve, FieldElement, ProjectivePoint};

/// `sum_i scalars[i] * points[i]` with the complete projective formulas.
pub fn msm_naive<const N: usize>(
    curve: &Curve<N>,
    scalars: &[FieldElement<N>],
    points: &[AffinePoint<N>],
) -> Result<ProjectivePoint<N>, MsmError> {
    if scalars.len() != points.len() {
        return Err(MsmError::LengthMismatch {
            scalars: scalars.len(),
            points: points.len(),
        });
    }
    let fr = curve.scalar_field();
    Ok(scalars
        .iter()
        .zip(points)
        .fold(curve.identity(), |acc, (k, p)| {
            let term = curve.scalar_mul(p, &fr.to_biguint(k));
            curve.add_projective(&acc, &term)
        }))
}
