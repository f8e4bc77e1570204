//! Modular inversion: Kaliski's almost-inverse on raw limbs followed by a
//! Montgomery correction, and Montgomery's trick for batches.

use super::{arena::Arena, limbs, montgomery::FieldElement, MontgomeryField};
use crate::error::FieldError;

impl<const N: usize> MontgomeryField<N> {
    /// Returns `x^(-1)`, or `None` if `x` is zero.
    pub fn inverse(&self, x: &FieldElement<N>) -> Option<FieldElement<N>> {
        if self.is_zero(x) {
            return None;
        }
        let (almost, k) = self.almost_inverse(&x.0);
        // almost = (xR)^(-1) 2^k, and the correction is R^3 2^(-k)
        let mut out = FieldElement(almost);
        self.mul_assign(&mut out, &FieldElement(self.inverse_corrections[k]));
        Some(out)
    }

    /// Binary extended GCD of `(p, a)`. Returns `a^(-1) 2^k mod p` and `k`,
    /// where `bits(p) <= k <= 2 bits(p)`.
    fn almost_inverse(&self, a: &[u32; N]) -> ([u32; N], usize) {
        let p = self.modulus_limbs();
        let mut u = *p;
        let mut v = *a;
        let mut r = [0u32; N];
        let mut s = [0u32; N];
        s[0] = 1;
        let mut k = 0;

        // invariants: p = u s + v r, and r, s < 2p
        while !limbs::is_zero(&v) {
            if limbs::is_even(&u) {
                limbs::shr1(&mut u);
                limbs::shl1(&mut s);
            } else if limbs::is_even(&v) {
                limbs::shr1(&mut v);
                limbs::shl1(&mut r);
            } else if !limbs::gte(&v, &u) {
                limbs::sub_assign(&mut u, &v);
                limbs::shr1(&mut u);
                limbs::add_assign(&mut r, &s);
                limbs::shl1(&mut s);
            } else {
                limbs::sub_assign(&mut v, &u);
                limbs::shr1(&mut v);
                limbs::add_assign(&mut s, &r);
                limbs::shl1(&mut r);
            }
            k += 1;
        }

        if limbs::gte(&r, p) {
            limbs::sub_assign(&mut r, p);
        }
        let mut out = *p;
        limbs::sub_assign(&mut out, &r);
        (out, k)
    }
}

/// Inverts every element of `xs` in place with a single field inversion.
///
/// `scratch` must hold at least `xs.len()` elements. Fails without touching
/// `xs` if one of them is zero.
pub fn batch_inverse_in_place<const N: usize>(
    field: &MontgomeryField<N>,
    scratch: &mut [FieldElement<N>],
    xs: &mut [FieldElement<N>],
) -> Result<(), FieldError> {
    if let Some(index) = xs.iter().position(|x| field.is_zero(x)) {
        return Err(FieldError::ZeroInverse(index));
    }
    batch_inverse_or_zero_in_place(field, scratch, xs);
    Ok(())
}

/// Like [`batch_inverse_in_place`], but zero elements are left at zero
/// instead of failing the whole batch.
pub fn batch_inverse_or_zero_in_place<const N: usize>(
    field: &MontgomeryField<N>,
    scratch: &mut [FieldElement<N>],
    xs: &mut [FieldElement<N>],
) {
    let n = xs.len();
    if n == 0 {
        return;
    }
    assert!(
        scratch.len() >= n,
        "batch inversion of {n} elements needs as much scratch space"
    );

    // scratch[i] = product of the nonzero xs[0..=i]
    let mut acc = field.one();
    for (partial, x) in scratch.iter_mut().zip(xs.iter()) {
        if !field.is_zero(x) {
            field.mul_assign(&mut acc, x);
        }
        *partial = acc;
    }

    let Some(mut inv) = field.inverse(&acc) else {
        unreachable!("product of nonzero elements is zero");
    };

    for i in (0..n).rev() {
        let x = xs[i];
        if field.is_zero(&x) {
            continue;
        }
        xs[i] = if i == 0 {
            inv
        } else {
            field.mul(&inv, &scratch[i - 1])
        };
        field.mul_assign(&mut inv, &x);
    }
}

/// Writes the inverses of `xs` into `out`.
pub fn batch_inverse<const N: usize>(
    field: &MontgomeryField<N>,
    scratch: &mut [FieldElement<N>],
    out: &mut [FieldElement<N>],
    xs: &[FieldElement<N>],
) -> Result<(), FieldError> {
    assert_eq!(out.len(), xs.len(), "output and input lengths differ");
    out.copy_from_slice(xs);
    batch_inverse_in_place(field, scratch, out)
}

/// Batch inversion taking its scratch space from `arena`.
pub fn batch_inverse_with_arena<const N: usize>(
    field: &MontgomeryField<N>,
    arena: &mut Arena<FieldElement<N>>,
    xs: &mut [FieldElement<N>],
) -> Result<(), FieldError> {
    let mark = arena.mark();
    let scratch = arena.alloc(xs.len());
    let res = batch_inverse_in_place(field, arena.get_mut(scratch), xs);
    arena.rollback(mark);
    res
}
