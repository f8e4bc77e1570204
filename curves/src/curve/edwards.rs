//! Twisted Edwards curves `-x^2 + y^2 = 1 + d x^2 y^2` in extended
//! coordinates (Hisil, Wong, Carter, Dawson, <https://eprint.iacr.org/2008/522>).
//!
//! With `d` a non-square the addition law is complete, also in affine form,
//! so the identity `(0, 1)` needs no special handling anywhere.

use super::point::{AffinePoint, ProjectivePoint};
use crate::field::{FieldElement, MontgomeryField};

pub(super) fn identity<const N: usize>(f: &MontgomeryField<N>) -> ProjectivePoint<N> {
    ProjectivePoint {
        x: f.zero(),
        y: f.one(),
        z: f.one(),
        t: f.zero(),
    }
}

pub(super) fn is_on_curve<const N: usize>(
    f: &MontgomeryField<N>,
    d: &FieldElement<N>,
    x: &FieldElement<N>,
    y: &FieldElement<N>,
) -> bool {
    let x2 = f.square(x);
    let y2 = f.square(y);
    let lhs = f.sub(&y2, &x2);
    let mut rhs = f.mul(&f.mul(d, &x2), &y2);
    f.add_assign(&mut rhs, &f.one());
    lhs == rhs
}

/// `add-2008-hwcd-3`, with `k = 2d`.
pub(super) fn add<const N: usize>(
    f: &MontgomeryField<N>,
    k: &FieldElement<N>,
    p: &ProjectivePoint<N>,
    q: &ProjectivePoint<N>,
) -> ProjectivePoint<N> {
    let d = f.double(&f.mul(&p.z, &q.z));
    combine(f, k, p, &q.x, &q.y, &q.t, d)
}

/// `madd-2008-hwcd-3`: `q` has `Z = 1`.
pub(super) fn add_mixed<const N: usize>(
    f: &MontgomeryField<N>,
    k: &FieldElement<N>,
    p: &ProjectivePoint<N>,
    q: &AffinePoint<N>,
) -> ProjectivePoint<N> {
    let qt = f.mul(&q.x, &q.y);
    combine(f, k, p, &q.x, &q.y, &qt, f.double(&p.z))
}

#[inline]
fn combine<const N: usize>(
    f: &MontgomeryField<N>,
    k: &FieldElement<N>,
    p: &ProjectivePoint<N>,
    qx: &FieldElement<N>,
    qy: &FieldElement<N>,
    qt: &FieldElement<N>,
    d: FieldElement<N>,
) -> ProjectivePoint<N> {
    let a = f.mul(&f.sub(&p.y, &p.x), &f.sub(qy, qx));
    let b = f.mul(&f.add(&p.y, &p.x), &f.add(qy, qx));
    let c = f.mul(&f.mul(&p.t, k), qt);
    let e = f.sub(&b, &a);
    let ff = f.sub(&d, &c);
    let g = f.add(&d, &c);
    let h = f.add(&b, &a);
    from_efgh(f, &e, &ff, &g, &h)
}

/// `dbl-2008-hwcd` with `a = -1`.
pub(super) fn double<const N: usize>(
    f: &MontgomeryField<N>,
    p: &ProjectivePoint<N>,
) -> ProjectivePoint<N> {
    let a = f.square(&p.x);
    let b = f.square(&p.y);
    let c = f.double(&f.square(&p.z));
    let d = f.neg(&a);
    let mut e = f.square(&f.add(&p.x, &p.y));
    f.sub_assign(&mut e, &a);
    f.sub_assign(&mut e, &b);
    let g = f.add(&d, &b);
    let ff = f.sub(&g, &c);
    let h = f.sub(&d, &b);
    from_efgh(f, &e, &ff, &g, &h)
}

#[inline]
fn from_efgh<const N: usize>(
    f: &MontgomeryField<N>,
    e: &FieldElement<N>,
    ff: &FieldElement<N>,
    g: &FieldElement<N>,
    h: &FieldElement<N>,
) -> ProjectivePoint<N> {
    ProjectivePoint {
        x: f.mul(e, ff),
        y: f.mul(g, h),
        t: f.mul(e, h),
        z: f.mul(ff, g),
    }
}

/// The two denominators `1 + t` and `1 - t` of the affine sum, where
/// `t = d x_p x_q y_p y_q`.
#[inline]
pub(super) fn affine_denominators<const N: usize>(
    f: &MontgomeryField<N>,
    d: &FieldElement<N>,
    p: &AffinePoint<N>,
    q: &AffinePoint<N>,
) -> (FieldElement<N>, FieldElement<N>) {
    let mut t = f.mul(&f.mul(&p.x, &q.x), &f.mul(&p.y, &q.y));
    f.mul_assign(&mut t, d);
    (f.add(&f.one(), &t), f.sub(&f.one(), &t))
}

/// Affine `p + q` given the inverses of [`affine_denominators`].
#[inline]
pub(super) fn add_affine_with_inverses<const N: usize>(
    f: &MontgomeryField<N>,
    p: &AffinePoint<N>,
    q: &AffinePoint<N>,
    inv_plus: &FieldElement<N>,
    inv_minus: &FieldElement<N>,
) -> AffinePoint<N> {
    let x = f.mul(&f.add(&f.mul(&p.x, &q.y), &f.mul(&p.y, &q.x)), inv_plus);
    let y = f.mul(&f.add(&f.mul(&p.y, &q.y), &f.mul(&p.x, &q.x)), inv_minus);
    let infinity = f.is_zero(&x) && f.is_one(&y);
    AffinePoint { x, y, infinity }
}
