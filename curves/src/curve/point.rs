//! Point encodings shared by both curve families.

use crate::field::FieldElement;

/// A point in affine coordinates.
///
/// The identity is flagged explicitly rather than encoded in the
/// coordinates. Its coordinates are `(0, 0)` on short Weierstraß curves and
/// `(0, 1)` on twisted Edwards curves, where the identity is an ordinary
/// affine point that the complete formulas handle directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct AffinePoint<const N: usize> {
    pub x: FieldElement<N>,
    pub y: FieldElement<N>,
    pub infinity: bool,
}

impl<const N: usize> AffinePoint<N> {
    pub fn new(x: FieldElement<N>, y: FieldElement<N>) -> Self {
        Self {
            x,
            y,
            infinity: false,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.infinity
    }
}

impl<const N: usize> PartialEq for AffinePoint<N> {
    fn eq(&self, other: &Self) -> bool {
        match (self.infinity, other.infinity) {
            (true, true) => true,
            (false, false) => self.x == other.x && self.y == other.y,
            _ => false,
        }
    }
}

impl<const N: usize> Eq for AffinePoint<N> {}

/// A point in projective coordinates `(X : Y : Z)`, extended with
/// `T = XY/Z` on twisted Edwards curves (`t` is unused on Weierstraß curves).
///
/// Representations are not unique, compare with [`crate::Curve::eq_projective`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ProjectivePoint<const N: usize> {
    pub x: FieldElement<N>,
    pub y: FieldElement<N>,
    pub z: FieldElement<N>,
    pub t: FieldElement<N>,
}
