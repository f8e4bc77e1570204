//! Batched affine additions sharing a single field inversion.
//!
//! Each batch runs in two passes: the first collects the slope denominators
//! of every pair, which are then inverted together with Montgomery's trick,
//! and the second finishes the additions. Scratch memory comes from the
//! caller's [`Arena`] and is released before returning.

use super::{
    edwards,
    point::{AffinePoint, ProjectivePoint},
    weierstrass, AdditionMode, Curve, CurveFamily, PairIndices,
};
use crate::field::{
    arena::{Arena, ArenaMark, ArenaSlice},
    inverse::batch_inverse_or_zero_in_place,
    FieldElement,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PairKind {
    /// the right operand is the identity
    Left,
    /// the left operand is the identity
    Right,
    /// opposite points, or a doubling of a 2-torsion point
    Identity,
    Double,
    Add,
}

impl<const N: usize> Curve<N> {
    /// Number of denominators one affine addition needs.
    fn denominators_per_pair(&self) -> usize {
        match self.family {
            CurveFamily::ShortWeierstrass { .. } => 1,
            CurveFamily::TwistedEdwards { .. } => 2,
        }
    }

    fn classify(&self, p: &AffinePoint<N>, q: &AffinePoint<N>, mode: AdditionMode) -> PairKind {
        if mode == AdditionMode::Unsafe {
            return PairKind::Add;
        }
        if p.infinity {
            PairKind::Right
        } else if q.infinity {
            PairKind::Left
        } else if p.x == q.x {
            if p.y == q.y && !self.base.is_zero(&p.y) {
                PairKind::Double
            } else {
                PairKind::Identity
            }
        } else {
            PairKind::Add
        }
    }

    /// Writes the denominators of `p + q` into `dens`; pairs that need no
    /// inversion get zeros, which the batch inversion leaves alone.
    #[inline]
    fn pair_denominators(
        &self,
        p: &AffinePoint<N>,
        q: &AffinePoint<N>,
        mode: AdditionMode,
        dens: &mut [FieldElement<N>],
    ) {
        match &self.family {
            CurveFamily::ShortWeierstrass { .. } => {
                dens[0] = match self.classify(p, q, mode) {
                    PairKind::Add => weierstrass::slope_denominator(&self.base, p, q, false),
                    PairKind::Double => weierstrass::slope_denominator(&self.base, p, q, true),
                    _ => self.base.zero(),
                }
            }
            CurveFamily::TwistedEdwards { d, .. } => {
                (dens[0], dens[1]) = edwards::affine_denominators(&self.base, d, p, q);
            }
        }
    }

    /// Finishes `p + q` from the inverted denominators.
    #[inline]
    fn pair_sum(
        &self,
        p: &AffinePoint<N>,
        q: &AffinePoint<N>,
        mode: AdditionMode,
        invs: &[FieldElement<N>],
    ) -> AffinePoint<N> {
        match self.family {
            CurveFamily::ShortWeierstrass { .. } => match self.classify(p, q, mode) {
                PairKind::Left => *p,
                PairKind::Right => *q,
                PairKind::Identity => self.affine_identity(),
                PairKind::Double => weierstrass::double_affine_with_inverse(&self.base, p, &invs[0]),
                PairKind::Add => weierstrass::add_affine_with_inverse(&self.base, p, q, &invs[0]),
            },
            CurveFamily::TwistedEdwards { .. } => {
                edwards::add_affine_with_inverses(&self.base, p, q, &invs[0], &invs[1])
            }
        }
    }

    /// Reserves the denominators of `n` pairs and as much inversion scratch.
    fn reserve_denominators(
        &self,
        arena: &mut Arena<FieldElement<N>>,
        n: usize,
    ) -> (ArenaMark, ArenaSlice<FieldElement<N>>, usize) {
        let width = self.denominators_per_pair();
        let mark = arena.mark();
        let buffer = arena.alloc(2 * width * n);
        (mark, buffer, width)
    }

    /// `out[i] = lhs[i] + rhs[i]` for every `i`, with one inversion.
    pub fn batch_add(
        &self,
        arena: &mut Arena<FieldElement<N>>,
        out: &mut [AffinePoint<N>],
        lhs: &[AffinePoint<N>],
        rhs: &[AffinePoint<N>],
        mode: AdditionMode,
    ) {
        assert!(lhs.len() == rhs.len() && out.len() == lhs.len());
        let n = lhs.len();
        let (mark, buffer, width) = self.reserve_denominators(arena, n);
        let (dens, scratch) = arena.get_mut(buffer).split_at_mut(width * n);

        for (i, (p, q)) in lhs.iter().zip(rhs).enumerate() {
            self.pair_denominators(p, q, mode, &mut dens[width * i..width * (i + 1)]);
        }
        batch_inverse_or_zero_in_place(&self.base, scratch, dens);
        for (i, (p, q)) in lhs.iter().zip(rhs).enumerate() {
            out[i] = self.pair_sum(p, q, mode, &dens[width * i..]);
        }

        arena.rollback(mark);
    }

    /// Batch addition that assumes every pair is made of two distinct,
    /// non-opposite points, none of them the identity. The result is
    /// meaningless otherwise.
    pub fn batch_add_unsafe(
        &self,
        arena: &mut Arena<FieldElement<N>>,
        out: &mut [AffinePoint<N>],
        lhs: &[AffinePoint<N>],
        rhs: &[AffinePoint<N>],
    ) {
        self.batch_add(arena, out, lhs, rhs, AdditionMode::Unsafe)
    }

    /// Batch addition correct for every input, including doublings,
    /// opposite points and identities.
    pub fn batch_add_safe(
        &self,
        arena: &mut Arena<FieldElement<N>>,
        out: &mut [AffinePoint<N>],
        lhs: &[AffinePoint<N>],
        rhs: &[AffinePoint<N>],
    ) {
        self.batch_add(arena, out, lhs, rhs, AdditionMode::Safe)
    }

    /// `acc[i] += rhs[i]` for every `i`.
    pub fn batch_add_assign(
        &self,
        arena: &mut Arena<FieldElement<N>>,
        acc: &mut [AffinePoint<N>],
        rhs: &[AffinePoint<N>],
        mode: AdditionMode,
    ) {
        assert_eq!(acc.len(), rhs.len());
        let n = acc.len();
        let (mark, buffer, width) = self.reserve_denominators(arena, n);
        let (dens, scratch) = arena.get_mut(buffer).split_at_mut(width * n);

        for (i, (p, q)) in acc.iter().zip(rhs).enumerate() {
            self.pair_denominators(p, q, mode, &mut dens[width * i..width * (i + 1)]);
        }
        batch_inverse_or_zero_in_place(&self.base, scratch, dens);
        for (i, (p, q)) in acc.iter_mut().zip(rhs).enumerate() {
            *p = self.pair_sum(p, q, mode, &dens[width * i..]);
        }

        arena.rollback(mark);
    }

    /// `points[out] = points[lhs] + points[rhs]` for every pair, in order.
    ///
    /// A pair may write to one of its own operands, but not to an operand of
    /// a later pair.
    pub fn batch_add_pairs(
        &self,
        arena: &mut Arena<FieldElement<N>>,
        points: &mut [AffinePoint<N>],
        pairs: &[PairIndices],
        mode: AdditionMode,
    ) {
        let n = pairs.len();
        let (mark, buffer, width) = self.reserve_denominators(arena, n);
        let (dens, scratch) = arena.get_mut(buffer).split_at_mut(width * n);

        for (i, pair) in pairs.iter().enumerate() {
            let (p, q) = (&points[pair.lhs], &points[pair.rhs]);
            self.pair_denominators(p, q, mode, &mut dens[width * i..width * (i + 1)]);
        }
        batch_inverse_or_zero_in_place(&self.base, scratch, dens);
        for (i, pair) in pairs.iter().enumerate() {
            let sum = self.pair_sum(&points[pair.lhs], &points[pair.rhs], mode, &dens[width * i..]);
            points[pair.out] = sum;
        }

        arena.rollback(mark);
    }

    /// Converts projective points to affine with a single inversion.
    pub fn batch_to_affine(
        &self,
        arena: &mut Arena<FieldElement<N>>,
        points: &[ProjectivePoint<N>],
    ) -> Vec<AffinePoint<N>> {
        let n = points.len();
        let mark = arena.mark();
        let buffer = arena.alloc(2 * n);
        let (zinvs, scratch) = arena.get_mut(buffer).split_at_mut(n);
        for (zinv, p) in zinvs.iter_mut().zip(points) {
            *zinv = p.z;
        }
        batch_inverse_or_zero_in_place(&self.base, scratch, zinvs);

        let affine = points
            .iter()
            .zip(zinvs.iter())
            .map(|(p, zinv)| {
                if self.base.is_zero(zinv) {
                    self.affine_identity()
                } else {
                    self.scale_to_affine(p, zinv)
                }
            })
            .collect();
        arena.rollback(mark);
        affine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use msm_utils::tests::make_test_rng;

    #[test]
    fn test_safe_batch_handles_every_case() {
        let curve = presets::bn254().unwrap();
        let mut rng = make_test_rng(None);
        let points = curve.random_points(&mut rng, 3);
        let (p, q, r) = (points[0], points[1], points[2]);
        let zero = curve.affine_identity();

        let lhs = [p, p, zero, q, p, zero, r];
        let rhs = [q, p, q, zero, curve.negate(&p), zero, p];
        let mut out = [AffinePoint::default(); 7];
        let mut arena = Arena::new();
        curve.batch_add_safe(&mut arena, &mut out, &lhs, &rhs);

        for i in 0..lhs.len() {
            let expected = curve.add_projective(
                &curve.to_projective(&lhs[i]),
                &curve.to_projective(&rhs[i]),
            );
            assert_eq!(out[i], curve.to_affine(&expected), "pair {i}");
        }
        assert!(out[4].is_identity() && out[5].is_identity());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_unsafe_batch_on_distinct_points() {
        let curve = presets::pallas().unwrap();
        let mut rng = make_test_rng(None);
        let lhs = curve.random_points(&mut rng, 16);
        let rhs = curve.random_points(&mut rng, 16);
        let mut arena = Arena::new();

        let mut fast = vec![AffinePoint::default(); 16];
        curve.batch_add_unsafe(&mut arena, &mut fast, &lhs, &rhs);
        let mut safe = vec![AffinePoint::default(); 16];
        curve.batch_add_safe(&mut arena, &mut safe, &lhs, &rhs);
        assert_eq!(fast, safe);

        let mut acc = lhs.clone();
        curve.batch_add_assign(&mut arena, &mut acc, &rhs, AdditionMode::Unsafe);
        assert_eq!(acc, safe);
    }

    #[test]
    fn test_pairs_fold_in_place() {
        let curve = presets::ed25519().unwrap();
        let mut rng = make_test_rng(None);
        let mut points = curve.random_points(&mut rng, 4);
        let expected = points
            .iter()
            .fold(curve.identity(), |acc, p| curve.add_mixed(&acc, p));

        let mut arena = Arena::new();
        let first = [
            PairIndices { out: 0, lhs: 0, rhs: 1 },
            PairIndices { out: 1, lhs: 2, rhs: 3 },
        ];
        curve.batch_add_pairs(&mut arena, &mut points, &first, AdditionMode::Safe);
        let second = [PairIndices { out: 0, lhs: 0, rhs: 1 }];
        curve.batch_add_pairs(&mut arena, &mut points, &second, AdditionMode::Safe);
        assert_eq!(points[0], curve.to_affine(&expected));
    }

    #[test]
    fn test_batch_to_affine_keeps_identities() {
        let curve = presets::bn254().unwrap();
        let g = curve.to_projective(curve.generator());
        let projective = [g, curve.identity(), curve.double_projective(&g)];
        let affine = curve.batch_to_affine(&mut Arena::new(), &projective);
        let expected: Vec<_> = projective.iter().map(|p| curve.to_affine(p)).collect();
        assert_eq!(affine, expected);
        assert!(affine[1].is_identity());
    }
}
