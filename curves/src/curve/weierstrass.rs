//! Short Weierstraß curves `y^2 = x^3 + b`.
//!
//! The projective formulas are the complete ones of Renes, Costello and
//! Batina (<https://eprint.iacr.org/2015/1060>), algorithms 7 to 9 for
//! `a = 0`. They take `b3 = 3b` and need no special cases, except the mixed
//! addition which cannot represent an affine identity.

use super::point::{AffinePoint, ProjectivePoint};
use crate::field::{FieldElement, MontgomeryField};

pub(super) fn identity<const N: usize>(f: &MontgomeryField<N>) -> ProjectivePoint<N> {
    ProjectivePoint {
        x: f.zero(),
        y: f.one(),
        z: f.zero(),
        t: f.zero(),
    }
}

pub(super) fn is_on_curve<const N: usize>(
    f: &MontgomeryField<N>,
    b: &FieldElement<N>,
    x: &FieldElement<N>,
    y: &FieldElement<N>,
) -> bool {
    f.square(y) == rhs(f, b, x)
}

/// `x^3 + b`
pub(super) fn rhs<const N: usize>(
    f: &MontgomeryField<N>,
    b: &FieldElement<N>,
    x: &FieldElement<N>,
) -> FieldElement<N> {
    let mut res = f.square(x);
    f.mul_assign(&mut res, x);
    f.add_assign(&mut res, b);
    res
}

pub(super) fn add<const N: usize>(
    f: &MontgomeryField<N>,
    b3: &FieldElement<N>,
    p: &ProjectivePoint<N>,
    q: &ProjectivePoint<N>,
) -> ProjectivePoint<N> {
    let mut t0 = f.mul(&p.x, &q.x);
    let mut t1 = f.mul(&p.y, &q.y);
    let mut t2 = f.mul(&p.z, &q.z);

    let mut t3 = f.mul(&f.add(&p.x, &p.y), &f.add(&q.x, &q.y));
    f.sub_assign(&mut t3, &f.add(&t0, &t1));
    let mut t4 = f.mul(&f.add(&p.y, &p.z), &f.add(&q.y, &q.z));
    f.sub_assign(&mut t4, &f.add(&t1, &t2));
    let mut y3 = f.mul(&f.add(&p.x, &p.z), &f.add(&q.x, &q.z));
    f.sub_assign(&mut y3, &f.add(&t0, &t2));

    t0 = f.add(&f.double(&t0), &t0);
    f.mul_assign(&mut t2, b3);
    let z3 = f.add(&t1, &t2);
    f.sub_assign(&mut t1, &t2);
    f.mul_assign(&mut y3, b3);

    finish(f, t0, t1, t3, t4, y3, z3)
}

/// `p + q` with `q` affine and not the identity.
pub(super) fn add_mixed<const N: usize>(
    f: &MontgomeryField<N>,
    b3: &FieldElement<N>,
    p: &ProjectivePoint<N>,
    q: &AffinePoint<N>,
) -> ProjectivePoint<N> {
    let mut t0 = f.mul(&p.x, &q.x);
    let mut t1 = f.mul(&p.y, &q.y);

    let mut t3 = f.mul(&f.add(&q.x, &q.y), &f.add(&p.x, &p.y));
    f.sub_assign(&mut t3, &f.add(&t0, &t1));
    let t4 = f.add(&f.mul(&q.y, &p.z), &p.y);
    let mut y3 = f.add(&f.mul(&q.x, &p.z), &p.x);

    t0 = f.add(&f.double(&t0), &t0);
    let t2 = f.mul(b3, &p.z);
    let z3 = f.add(&t1, &t2);
    f.sub_assign(&mut t1, &t2);
    f.mul_assign(&mut y3, b3);

    finish(f, t0, t1, t3, t4, y3, z3)
}

// common tail of algorithms 7 and 8
#[inline]
fn finish<const N: usize>(
    f: &MontgomeryField<N>,
    t0: FieldElement<N>,
    t1: FieldElement<N>,
    t3: FieldElement<N>,
    t4: FieldElement<N>,
    y3: FieldElement<N>,
    z3: FieldElement<N>,
) -> ProjectivePoint<N> {
    let x = f.sub(&f.mul(&t3, &t1), &f.mul(&t4, &y3));
    let y = f.add(&f.mul(&t1, &z3), &f.mul(&y3, &t0));
    let z = f.add(&f.mul(&z3, &t4), &f.mul(&t0, &t3));
    ProjectivePoint {
        x,
        y,
        z,
        t: f.zero(),
    }
}

pub(super) fn double<const N: usize>(
    f: &MontgomeryField<N>,
    b3: &FieldElement<N>,
    p: &ProjectivePoint<N>,
) -> ProjectivePoint<N> {
    let mut t0 = f.square(&p.y);
    let mut z3 = f.double(&f.double(&f.double(&t0)));
    let t1 = f.mul(&p.y, &p.z);
    let mut t2 = f.square(&p.z);
    f.mul_assign(&mut t2, b3);
    let x3 = f.mul(&t2, &z3);
    let mut y3 = f.add(&t0, &t2);
    f.mul_assign(&mut z3, &t1);

    t2 = f.add(&f.double(&t2), &t2);
    f.sub_assign(&mut t0, &t2);
    f.mul_assign(&mut y3, &t0);
    f.add_assign(&mut y3, &x3);
    let mut x = f.mul(&t0, &f.mul(&p.x, &p.y));
    f.double_in_place(&mut x);

    ProjectivePoint {
        x,
        y: y3,
        z: z3,
        t: f.zero(),
    }
}

/// Denominator of the slope of `p + q`: `x_q - x_p` for an addition,
/// `2 y_p` for a doubling.
#[inline]
pub(super) fn slope_denominator<const N: usize>(
    f: &MontgomeryField<N>,
    p: &AffinePoint<N>,
    q: &AffinePoint<N>,
    doubling: bool,
) -> FieldElement<N> {
    if doubling {
        f.double(&p.y)
    } else {
        f.sub(&q.x, &p.x)
    }
}

/// Affine `p + q` for `p != ±q`, given `inv = 1 / (x_q - x_p)`.
#[inline]
pub(super) fn add_affine_with_inverse<const N: usize>(
    f: &MontgomeryField<N>,
    p: &AffinePoint<N>,
    q: &AffinePoint<N>,
    inv: &FieldElement<N>,
) -> AffinePoint<N> {
    let lambda = f.mul(&f.sub(&q.y, &p.y), inv);
    chord(f, p, &q.x, &lambda)
}

/// Affine `2p` for `y_p != 0`, given `inv = 1 / (2 y_p)`.
#[inline]
pub(super) fn double_affine_with_inverse<const N: usize>(
    f: &MontgomeryField<N>,
    p: &AffinePoint<N>,
    inv: &FieldElement<N>,
) -> AffinePoint<N> {
    let x2 = f.square(&p.x);
    let lambda = f.mul(&f.add(&f.double(&x2), &x2), inv);
    chord(f, p, &p.x, &lambda)
}

// x3 = lambda^2 - x_p - x_q, y3 = lambda (x_p - x3) - y_p
#[inline]
fn chord<const N: usize>(
    f: &MontgomeryField<N>,
    p: &AffinePoint<N>,
    qx: &FieldElement<N>,
    lambda: &FieldElement<N>,
) -> AffinePoint<N> {
    let mut x = f.square(lambda);
    f.sub_assign(&mut x, &p.x);
    f.sub_assign(&mut x, qx);
    let mut y = f.mul(lambda, &f.sub(&p.x, &x));
    f.sub_assign(&mut y, &p.y);
    AffinePoint::new(x, y)
}
