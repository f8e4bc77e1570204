//! Turning `(scalar, point)` pairs into the flat form read by the bucket
//! kernel, with the optional GLV split.

use msm_curves::{AffinePoint, Curve, FieldElement};
use msm_utils::BigUintHelpers;

/// Points and their scalars as little-endian 64-bit words, `words` per
/// scalar. Pairs with a zero scalar or the identity point are dropped.
#[derive(Clone, Debug)]
pub struct PreparedInput<const N: usize> {
    points: Vec<AffinePoint<N>>,
    scalars: Vec<u64>,
    words: usize,
    bits: u32,
}

impl<const N: usize> PreparedInput<N> {
    /// With `use_glv` and a curve endomorphism, every term `kP` becomes
    /// `k1 P + k2 phi(P)` with half-size `k1`, `k2`, the signs folded into
    /// the points.
    pub fn new(
        curve: &Curve<N>,
        scalars: &[FieldElement<N>],
        points: &[AffinePoint<N>],
        use_glv: bool,
    ) -> Self {
        let fr = curve.scalar_field();
        let words = fr.word_len();
        let endomorphism = curve.endomorphism().filter(|_| use_glv);
        let capacity = points.len() * if endomorphism.is_some() { 2 } else { 1 };
        let mut input = Self {
            points: Vec::with_capacity(capacity),
            scalars: Vec::with_capacity(capacity * words),
            words,
            bits: 0,
        };

        let mut buffer = vec![0u64; words];
        for (scalar, point) in scalars.iter().zip(points) {
            if fr.is_zero(scalar) || point.is_identity() {
                continue;
            }
            let Some(endomorphism) = endomorphism else {
                fr.to_u64_limbs(scalar, &mut buffer);
                input.push(*point, &buffer);
                continue;
            };

            let split = endomorphism.decompose(&fr.to_biguint(scalar));
            let halves = split
                .k1
                .to_padded_words(words)
                .zip(split.k2.to_padded_words(words));
            let Some((k1, k2)) = halves else {
                // a lattice basis that does not shorten the scalar
                fr.to_u64_limbs(scalar, &mut buffer);
                input.push(*point, &buffer);
                continue;
            };
            let image = endomorphism.apply(curve.base_field(), point);
            let p1 = if split.k1_negative { curve.negate(point) } else { *point };
            let p2 = if split.k2_negative { curve.negate(&image) } else { image };
            input.push(p1, &k1);
            input.push(p2, &k2);
        }
        input
    }

    fn push(&mut self, point: AffinePoint<N>, scalar: &[u64]) {
        let bits = bit_length(scalar);
        if bits == 0 {
            return;
        }
        self.bits = self.bits.max(bits);
        self.points.push(point);
        self.scalars.extend_from_slice(scalar);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[AffinePoint<N>] {
        &self.points
    }

    /// Words of the `i`-th scalar.
    pub fn scalar(&self, i: usize) -> &[u64] {
        &self.scalars[i * self.words..(i + 1) * self.words]
    }

    /// Bit length of the largest scalar.
    pub fn bits(&self) -> u32 {
        self.bits
    }
}

fn bit_length(words: &[u64]) -> u32 {
    words
        .iter()
        .rposition(|w| *w != 0)
        .map_or(0, |i| 64 * i as u32 + 64 - words[i].leading_zeros())
}
