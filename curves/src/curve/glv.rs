//! GLV scalar decomposition.
//!
//! On curves with an efficient endomorphism `phi(x, y) = (beta x, y)` acting
//! as multiplication by `lambda`, a scalar `k` is split into `k1 + k2 lambda`
//! with `k1`, `k2` of about half the bit length of the group order, using a
//! short basis of the lattice `{(a, b) : a + b lambda = 0 mod q}`
//! (Gallant, Lambert, Vanstone, section 4).

use super::point::AffinePoint;
use crate::{
    error::CurveError,
    field::{FieldElement, MontgomeryField},
};
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;

/// A reduced basis `v1 = (a1, b1)`, `v2 = (a2, b2)` of the GLV lattice,
/// with the rounding constants used by [`GlvBasis::decompose`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlvBasis {
    a1: BigInt,
    b1: BigInt,
    a2: BigInt,
    b2: BigInt,
    /// round(b2 2^m / det)
    g1: BigInt,
    /// round(-b1 2^m / det)
    g2: BigInt,
    shift: u64,
}

/// `scalar = (-1)^k1_negative k1 + (-1)^k2_negative k2 lambda mod q`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decomposition {
    pub k1: BigUint,
    pub k2: BigUint,
    pub k1_negative: bool,
    pub k2_negative: bool,
}

impl Decomposition {
    /// Recombines the two halves into a scalar mod `order`.
    pub fn recompose(&self, lambda: &BigUint, order: &BigUint) -> BigUint {
        let signed = |k: &BigUint, negative: bool| {
            let k = k % order;
            if negative && k != BigUint::ZERO {
                order - k
            } else {
                k
            }
        };
        let k1 = signed(&self.k1, self.k1_negative);
        let k2 = signed(&self.k2, self.k2_negative);
        (k1 + k2 * lambda) % order
    }
}

impl GlvBasis {
    /// Finds a short lattice basis from the extended Euclidean algorithm on
    /// `(order, lambda)`.
    pub fn new(order: &BigUint, lambda: &BigUint) -> Result<Self, CurveError> {
        let q = BigInt::from(order.clone());
        let lambda = BigInt::from(lambda.clone());

        // remainders r_i with r_i = s_i q + t_i lambda, stored as (r_i, t_i)
        let mut remainders = vec![(q.clone(), BigInt::ZERO), (lambda.clone(), BigInt::from(1u8))];
        let (mut r0, mut r1) = (q.clone(), lambda.clone());
        let (mut t0, mut t1) = (BigInt::ZERO, BigInt::from(1u8));
        while r1.sign() != Sign::NoSign {
            let quotient = &r0 / &r1;
            let r2 = &r0 - &quotient * &r1;
            let t2 = &t0 - &quotient * &t1;
            remainders.push((r2.clone(), t2.clone()));
            (r0, r1) = (r1, r2);
            (t0, t1) = (t1, t2);
        }

        let bound = BigInt::from(order.sqrt());
        let l = remainders
            .iter()
            .rposition(|(r, _)| r >= &bound)
            .ok_or(CurveError::InconsistentEndomorphism("degenerate lattice basis"))?;

        let vector = |i: usize| {
            remainders
                .get(i)
                .map(|(r, t)| (r.clone(), -t.clone()))
        };
        let (a1, b1) =
            vector(l + 1).ok_or(CurveError::InconsistentEndomorphism("degenerate lattice basis"))?;
        let norm = |(a, b): &(BigInt, BigInt)| a * a + b * b;
        let (a2, b2) = match (vector(l), vector(l + 2)) {
            (Some(first), Some(second)) if norm(&second) < norm(&first) => second,
            (Some(first), _) => first,
            _ => return Err(CurveError::InconsistentEndomorphism("degenerate lattice basis")),
        };

        for (a, b) in [(&a1, &b1), (&a2, &b2)] {
            if (a + b * &lambda).mod_floor(&q).sign() != Sign::NoSign {
                return Err(CurveError::InconsistentEndomorphism(
                    "lattice vector is not in the kernel",
                ));
            }
        }
        let det = &a1 * &b2 - &a2 * &b1;
        if det.sign() == Sign::NoSign {
            return Err(CurveError::InconsistentEndomorphism("degenerate lattice basis"));
        }

        let shift = 2 * order.bits();
        let g1 = round_div(&(&b2 << shift), &det);
        let g2 = round_div(&(-&b1 << shift), &det);

        Ok(Self {
            a1,
            b1,
            a2,
            b2,
            g1,
            g2,
            shift,
        })
    }

    /// The basis vectors `[(a1, b1), (a2, b2)]`.
    pub fn vectors(&self) -> [(BigInt, BigInt); 2] {
        [
            (self.a1.clone(), self.b1.clone()),
            (self.a2.clone(), self.b2.clone()),
        ]
    }

    pub fn decompose(&self, scalar: &BigUint) -> Decomposition {
        let k = BigInt::from(scalar.clone());
        let half = BigInt::from(1u8) << (self.shift - 1);
        let denominator = BigInt::from(1u8) << self.shift;
        let c1 = (&k * &self.g1 + &half).div_floor(&denominator);
        let c2 = (&k * &self.g2 + &half).div_floor(&denominator);

        let k1 = &k - &c1 * &self.a1 - &c2 * &self.a2;
        let k2 = -(&c1 * &self.b1) - &c2 * &self.b2;

        Decomposition {
            k1_negative: k1.sign() == Sign::Minus,
            k2_negative: k2.sign() == Sign::Minus,
            k1: k1.magnitude().clone(),
            k2: k2.magnitude().clone(),
        }
    }
}

/// Nearest integer to `n / d`.
fn round_div(n: &BigInt, d: &BigInt) -> BigInt {
    let (n, d) = if d.sign() == Sign::Minus {
        (-n, -d)
    } else {
        (n.clone(), d.clone())
    };
    (n * 2u8 + &d).div_floor(&(d * 2u8))
}

/// The endomorphism `(x, y) -> (beta x, y)` and its eigenvalue `lambda`.
#[derive(Clone, Debug)]
pub struct Endomorphism<const N: usize> {
    beta: FieldElement<N>,
    lambda: BigUint,
    basis: GlvBasis,
}

impl<const N: usize> Endomorphism<N> {
    pub(crate) fn new(beta: FieldElement<N>, lambda: BigUint, basis: GlvBasis) -> Self {
        Self {
            beta,
            lambda,
            basis,
        }
    }

    pub fn beta(&self) -> &FieldElement<N> {
        &self.beta
    }

    pub fn lambda(&self) -> &BigUint {
        &self.lambda
    }

    pub fn basis(&self) -> &GlvBasis {
        &self.basis
    }

    pub fn decompose(&self, scalar: &BigUint) -> Decomposition {
        self.basis.decompose(scalar)
    }

    /// `phi(p)`, equal to `lambda p`.
    pub fn apply(&self, base: &MontgomeryField<N>, p: &AffinePoint<N>) -> AffinePoint<N> {
        if p.infinity {
            return *p;
        }
        AffinePoint::new(base.mul(&self.beta, &p.x), p.y)
    }
}
