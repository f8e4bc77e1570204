//! Random points of the prime-order subgroup, for tests and benchmarks.

use super::{point::AffinePoint, Curve, CurveFamily};
use crate::field::arena::Arena;
use num_bigint::BigUint;
use rand::Rng;

/// Number of random basis points combined by [`Curve::random_points_fast`].
const BASIS_SIZE: usize = 4;

/// Each basis point is tabulated with this many multiples.
const TABLE_SIZE: usize = 1 << 8;

impl<const N: usize> Curve<N> {
    /// Samples a random coordinate until it lifts to a curve point, then
    /// clears the cofactor.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> AffinePoint<N> {
        loop {
            let coordinate = self.base.random(rng);
            let Some(p) = self.decompress(&coordinate, rng.gen()) else {
                continue;
            };
            if self.cofactor == BigUint::from(1u8) {
                if !p.infinity {
                    return p;
                }
                continue;
            }
            let q = self.to_affine(&self.clear_cofactor(&p));
            if !q.infinity {
                return q;
            }
        }
    }

    /// `n` independent random points.
    pub fn random_points<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<AffinePoint<N>> {
        (0..n).map(|_| self.random_point(rng)).collect()
    }

    /// `n` pseudo-random points, each a sum of one random entry from each of
    /// a few tables of multiples of random basis points. After the tables are
    /// built, a point costs a few mixed additions instead of a square root
    /// and a cofactor multiplication.
    pub fn random_points_fast<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Vec<AffinePoint<N>> {
        let mut arena = Arena::new();

        let mut multiples = Vec::with_capacity(BASIS_SIZE * TABLE_SIZE);
        for _ in 0..BASIS_SIZE {
            let basis = self.random_point(rng);
            let mut acc = self.to_projective(&basis);
            for _ in 0..TABLE_SIZE {
                multiples.push(acc);
                acc = self.add_mixed(&acc, &basis);
            }
        }
        let table = self.batch_to_affine(&mut arena, &multiples);

        let sums: Vec<_> = (0..n)
            .map(|_| {
                table
                    .chunks(TABLE_SIZE)
                    .fold(self.identity(), |acc, row| {
                        self.add_mixed(&acc, &row[rng.gen_range(0..TABLE_SIZE)])
                    })
            })
            .collect();
        let mut points = self.batch_to_affine(&mut arena, &sums);

        // a sum can only hit the identity with negligible probability
        for p in points.iter_mut().filter(|p| p.infinity) {
            *p = self.random_point(rng);
        }
        points
    }

    /// Whether `p` lies in the subgroup of order `q`.
    pub fn is_in_prime_subgroup(&self, p: &AffinePoint<N>) -> bool {
        if matches!(self.family, CurveFamily::ShortWeierstrass { .. })
            && self.cofactor == BigUint::from(1u8)
        {
            return self.is_on_curve(p);
        }
        self.is_on_curve(p) && self.is_identity(&self.scalar_mul(p, self.order()))
    }
}

#[cfg(test)]
mod tests {
    use crate::presets;
    use msm_utils::tests::make_test_rng;

    #[test]
    fn test_random_points_are_in_the_subgroup() {
        let mut rng = make_test_rng(None);
        let curve = presets::ed25519().unwrap();
        for p in curve.random_points(&mut rng, 4) {
            assert!(curve.is_on_curve(&p));
            assert!(curve.is_in_prime_subgroup(&p));
        }
        let fast = curve.random_points_fast(&mut rng, 8);
        assert!(fast.iter().all(|p| curve.is_in_prime_subgroup(p)));
    }

    #[test]
    fn test_fast_random_points_are_distinct() {
        let mut rng = make_test_rng(None);
        let curve = presets::bn254().unwrap();
        let points = curve.random_points_fast(&mut rng, 64);
        for (i, p) in points.iter().enumerate() {
            assert!(curve.is_on_curve(p));
            assert!(points[..i].iter().all(|q| q != p));
        }
    }
}
