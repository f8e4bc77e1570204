//! Montgomery arithmetic over `N` limbs of 29 bits.
//!
//! Elements are stored as `x * R mod p` with `R = 2^(29 N)`. Every operation
//! returns a canonical representative in `[0, p)`, so two elements are equal
//! iff their limbs are equal. Intermediate values inside an operation may
//! reach `2p`, which is why the modulus must leave two bits of headroom.

use super::{
    limbs::{self, MASK, MASK64, SHIFT, SHIFT64},
    sqrt::SqrtPrecomputation,
};
use crate::error::FieldError;
use ark_ff::BitIteratorBE;
use msm_utils::BigUintHelpers;
use num_bigint::BigUint;
use rand::Rng;

/// An element of a [`MontgomeryField`], in Montgomery form.
///
/// The element does not know its field: all arithmetic goes through the
/// field object, which holds the modulus and the precomputed constants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FieldElement<const N: usize>(pub(crate) [u32; N]);

impl<const N: usize> Default for FieldElement<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> FieldElement<N> {
    /// Wraps Montgomery-form limbs. Each limb must be below `2^29` and the
    /// value must be below the modulus of the field it is used with.
    pub const fn from_raw_limbs(limbs: [u32; N]) -> Self {
        Self(limbs)
    }

    pub fn raw_limbs(&self) -> &[u32; N] {
        &self.0
    }
}

/// A prime field `F_p` with `p < 2^(29 N - 2)`, set up at runtime from its modulus.
#[derive(Clone, Debug)]
pub struct MontgomeryField<const N: usize> {
    modulus: [u32; N],
    modulus64: [u64; N],
    modulus_biguint: BigUint,
    bits: u32,
    /// -modulus^(-1) mod 2^29
    minv: u64,
    /// R mod p, i.e. one in Montgomery form
    one: FieldElement<N>,
    /// R^2 mod p, used to move integers into Montgomery form
    r2: FieldElement<N>,
    /// R^3 * 2^(-k) mod p for every k the almost-inverse can produce
    pub(crate) inverse_corrections: Vec<[u32; N]>,
    pub(crate) sqrt: SqrtPrecomputation<N>,
}

impl<const N: usize> MontgomeryField<N> {
    pub fn new(modulus: &BigUint) -> Result<Self, FieldError> {
        if !(2..=16).contains(&N) {
            return Err(FieldError::UnsupportedLimbCount(N));
        }
        if modulus <= &BigUint::from(2u8) || !modulus.bit(0) {
            return Err(FieldError::InvalidModulus);
        }
        let capacity = u64::from(SHIFT) * N as u64;
        // lazy reduction needs 4p < R
        if modulus.bits() + 2 > capacity {
            return Err(FieldError::ModulusTooLarge {
                bits: modulus.bits(),
                limbs: N,
            });
        }

        let limbs = to_limb_array::<N>(modulus);
        let mut modulus64 = [0u64; N];
        for (wide, limb) in modulus64.iter_mut().zip(limbs.iter()) {
            *wide = u64::from(*limb);
        }

        // Newton iteration for the inverse of the lowest limb mod 2^64
        let p0 = modulus64[0];
        let mut inv = 1u64;
        for _ in 0..6 {
            inv = inv.wrapping_mul(2u64.wrapping_sub(p0.wrapping_mul(inv)));
        }
        let minv = inv.wrapping_neg() & MASK64;

        let r = (BigUint::from(1u8) << capacity) % modulus;
        let r2 = (&r * &r) % modulus;
        let r3 = (&r2 * &r) % modulus;
        let half = (modulus + 1u8) >> 1;
        let mut inverse_corrections = Vec::with_capacity(2 * capacity as usize + 1);
        let mut correction = r3;
        for _ in 0..=2 * capacity {
            inverse_corrections.push(to_limb_array::<N>(&correction));
            correction = (&correction * &half) % modulus;
        }

        let mut field = Self {
            modulus: limbs,
            modulus64,
            modulus_biguint: modulus.clone(),
            bits: modulus.bits() as u32,
            minv,
            one: FieldElement(to_limb_array::<N>(&r)),
            r2: FieldElement(to_limb_array::<N>(&r2)),
            inverse_corrections,
            sqrt: SqrtPrecomputation::default(),
        };
        field.sqrt = SqrtPrecomputation::new(&field);
        Ok(field)
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus_biguint
    }

    pub fn modulus_limbs(&self) -> &[u32; N] {
        &self.modulus
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Length of the packed byte encoding of an element.
    pub fn byte_len(&self) -> usize {
        self.bits.div_ceil(8) as usize
    }

    /// Number of 64-bit words needed to hold a canonical element.
    pub fn word_len(&self) -> usize {
        self.bits.div_ceil(64) as usize
    }

    pub fn zero(&self) -> FieldElement<N> {
        FieldElement::default()
    }

    pub fn one(&self) -> FieldElement<N> {
        self.one
    }

    pub fn is_zero(&self, x: &FieldElement<N>) -> bool {
        limbs::is_zero(&x.0)
    }

    pub fn is_one(&self, x: &FieldElement<N>) -> bool {
        x == &self.one
    }

    ////////////////////////////////////////////////////////////////////////
    // conversions
    ////////////////////////////////////////////////////////////////////////

    pub fn from_u64(&self, value: u64) -> FieldElement<N> {
        let mut x = FieldElement(limbs::from_u64_words::<N>(&[value]));
        self.mul_assign(&mut x, &self.r2);
        x
    }

    /// Converts a canonical integer into Montgomery form.
    pub fn from_biguint(&self, value: &BigUint) -> Result<FieldElement<N>, FieldError> {
        if value >= &self.modulus_biguint {
            return Err(FieldError::NotCanonical);
        }
        let mut x = FieldElement(to_limb_array::<N>(value));
        self.mul_assign(&mut x, &self.r2);
        Ok(x)
    }

    /// Converts any integer into Montgomery form, reducing it first.
    pub fn from_biguint_reduced(&self, value: &BigUint) -> FieldElement<N> {
        let reduced = value % &self.modulus_biguint;
        let mut x = FieldElement(to_limb_array::<N>(&reduced));
        self.mul_assign(&mut x, &self.r2);
        x
    }

    /// Leaves Montgomery form: returns the limbs of the canonical integer.
    pub fn to_canonical_limbs(&self, x: &FieldElement<N>) -> [u32; N] {
        let mut raw_one = [0u32; N];
        raw_one[0] = 1;
        let mut out = *x;
        self.mul_assign(&mut out, &FieldElement(raw_one));
        out.0
    }

    pub fn to_biguint(&self, x: &FieldElement<N>) -> BigUint {
        let limbs = self.to_canonical_limbs(x).map(u64::from);
        BigUint::from_limbs(&limbs, SHIFT)
    }

    /// Writes the canonical integer as little-endian 64-bit words.
    pub fn to_u64_limbs(&self, x: &FieldElement<N>, words: &mut [u64]) {
        limbs::to_u64_words(&self.to_canonical_limbs(x), words);
    }

    /// Samples a uniformly random element.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement<N> {
        // the modulus may leave the upper limbs empty
        let top_limb = ((self.bits - 1) / SHIFT) as usize;
        let top_bits = self.bits - SHIFT * top_limb as u32;
        let top_mask = if top_bits >= SHIFT {
            MASK
        } else {
            (1 << top_bits) - 1
        };
        loop {
            let mut x = [0u32; N];
            for limb in x[..=top_limb].iter_mut() {
                *limb = rng.gen::<u32>() & MASK;
            }
            x[top_limb] &= top_mask;
            // a uniform integer below p is also a uniform Montgomery representative
            if !limbs::gte(&x, &self.modulus) {
                return FieldElement(x);
            }
        }
    }

    ////////////////////////////////////////////////////////////////////////
    // add, sub, neg
    ////////////////////////////////////////////////////////////////////////

    /// Brings a value in `[0, 2p)` into `[0, p)`.
    #[inline]
    pub fn reduce(&self, x: &mut FieldElement<N>) {
        self.conditional_reduce(&mut x.0);
    }

    #[inline]
    fn conditional_reduce(&self, x: &mut [u32; N]) {
        if limbs::gte(x, &self.modulus) {
            limbs::sub_assign(x, &self.modulus);
        }
    }

    #[inline]
    pub fn add_assign(&self, x: &mut FieldElement<N>, y: &FieldElement<N>) {
        limbs::add_assign(&mut x.0, &y.0);
        self.conditional_reduce(&mut x.0);
    }

    #[inline]
    pub fn sub_assign(&self, x: &mut FieldElement<N>, y: &FieldElement<N>) {
        if !limbs::gte(&x.0, &y.0) {
            limbs::add_assign(&mut x.0, &self.modulus);
        }
        limbs::sub_assign(&mut x.0, &y.0);
    }

    #[inline]
    pub fn double_in_place(&self, x: &mut FieldElement<N>) {
        let copy = *x;
        self.add_assign(x, &copy);
    }

    #[inline]
    pub fn neg(&self, x: &FieldElement<N>) -> FieldElement<N> {
        if self.is_zero(x) {
            return *x;
        }
        let mut out = FieldElement(self.modulus);
        limbs::sub_assign(&mut out.0, &x.0);
        out
    }

    #[inline]
    pub fn add(&self, x: &FieldElement<N>, y: &FieldElement<N>) -> FieldElement<N> {
        let mut out = *x;
        self.add_assign(&mut out, y);
        out
    }

    #[inline]
    pub fn sub(&self, x: &FieldElement<N>, y: &FieldElement<N>) -> FieldElement<N> {
        let mut out = *x;
        self.sub_assign(&mut out, y);
        out
    }

    #[inline]
    pub fn double(&self, x: &FieldElement<N>) -> FieldElement<N> {
        self.add(x, x)
    }

    ////////////////////////////////////////////////////////////////////////
    // mul, square, pow
    ////////////////////////////////////////////////////////////////////////

    /// Montgomery multiplication: `x <- x * y / R mod p`.
    ///
    /// The partial sums are kept in `u64`s without intermediate carries except
    /// for the lowest one, which has to be exact to compute the next `q_i`.
    pub fn mul_assign(&self, x: &mut FieldElement<N>, y: &FieldElement<N>) {
        let mut y_local = [0u64; N];
        for (wide, limb) in y_local.iter_mut().zip(y.0.iter()) {
            *wide = u64::from(*limb);
        }

        // only z[0..N-1] is used
        let mut z = [0u64; N];
        for i in 0..N {
            let xi = u64::from(x.0[i]);

            let tmp = xi * y_local[0] + z[0];
            let qi = ((tmp & MASK64) * self.minv) & MASK64;
            let carry = (tmp + qi * self.modulus64[0]) >> SHIFT64;

            // shift down by one limb while accumulating
            for j in 1..N - 1 {
                z[j - 1] = z[j] + xi * y_local[j] + qi * self.modulus64[j];
            }
            z[N - 2] = xi * y_local[N - 1] + qi * self.modulus64[N - 1];
            z[0] += carry;
        }

        let mut carry = 0u64;
        for i in 0..N - 1 {
            let tmp = z[i] + carry;
            x.0[i] = (tmp & MASK64) as u32;
            carry = tmp >> SHIFT64;
        }
        x.0[N - 1] = carry as u32;

        // x < 2p here
        self.conditional_reduce(&mut x.0);
    }

    /// Montgomery squaring: computes the double-width square using the
    /// symmetry of the cross terms, then reduces it.
    pub fn square_in_place(&self, x: &mut FieldElement<N>) {
        let mut lo = [0u64; N];
        let mut hi = [0u64; N];

        for i in 0..N {
            let xi = u64::from(x.0[i]);
            *slot(&mut lo, &mut hi, 2 * i) += xi * xi;
            let xi2 = xi << 1;
            for j in i + 1..N {
                *slot(&mut lo, &mut hi, i + j) += xi2 * u64::from(x.0[j]);
            }
        }

        for i in 0..N {
            let qi = ((lo[i] & MASK64) * self.minv) & MASK64;
            let low = lo[i] + qi * self.modulus64[0];
            *slot(&mut lo, &mut hi, i + 1) += low >> SHIFT64;
            for j in 1..N {
                *slot(&mut lo, &mut hi, i + j) += qi * self.modulus64[j];
            }
        }

        let mut carry = 0u64;
        for i in 0..N {
            let tmp = hi[i] + carry;
            x.0[i] = (tmp & MASK64) as u32;
            carry = tmp >> SHIFT64;
        }
        debug_assert_eq!(carry, 0);

        self.conditional_reduce(&mut x.0);
    }

    #[inline]
    pub fn mul(&self, x: &FieldElement<N>, y: &FieldElement<N>) -> FieldElement<N> {
        let mut out = *x;
        self.mul_assign(&mut out, y);
        out
    }

    #[inline]
    pub fn square(&self, x: &FieldElement<N>) -> FieldElement<N> {
        let mut out = *x;
        self.square_in_place(&mut out);
        out
    }

    /// Returns `x^exp`, where `exp` is an integer represented with `u64` limbs,
    /// least significant limb first.
    pub fn pow(&self, x: &FieldElement<N>, exp: &[u64]) -> FieldElement<N> {
        let mut res = self.one;
        for bit in BitIteratorBE::without_leading_zeros(exp) {
            self.square_in_place(&mut res);
            if bit {
                self.mul_assign(&mut res, x);
            }
        }
        res
    }

    pub fn pow_biguint(&self, x: &FieldElement<N>, exp: &BigUint) -> FieldElement<N> {
        self.pow(x, &exp.to_u64_digits())
    }
}

#[inline]
fn slot<'a, const N: usize>(lo: &'a mut [u64; N], hi: &'a mut [u64; N], k: usize) -> &'a mut u64 {
    if k < N {
        &mut lo[k]
    } else {
        &mut hi[k - N]
    }
}

/// Splits an integer known to fit into `29 * N` bits into limbs.
pub(crate) fn to_limb_array<const N: usize>(value: &BigUint) -> [u32; N] {
    let mut out = [0u32; N];
    let mut rest = value.clone();
    for limb in out.iter_mut() {
        *limb = (rest.iter_u32_digits().next().unwrap_or(0)) & MASK;
        rest >>= SHIFT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn bn254_base() -> MontgomeryField<9> {
        let p = BigUint::from_str(
            "21888242871839275222246405745257275088696311157297823662689037894645226208583",
        )
        .unwrap();
        MontgomeryField::new(&p).unwrap()
    }

    #[test]
    fn test_montgomery_constants_consistency() {
        let field = bn254_base();
        let p = field.modulus().clone();
        let r = (BigUint::from(1u8) << 261u32) % &p;

        // one is R mod p
        let one = field.one().0.map(u64::from);
        assert_eq!(BigUint::from_limbs(&one, 29), r);

        // MINV * MODULUS = -1 mod 2^29
        let m0 = u64::from(field.modulus_limbs()[0]);
        assert_eq!((field.minv * m0) & MASK64, MASK64);
    }

    #[test]
    fn test_rejects_bad_moduli() {
        assert_eq!(
            MontgomeryField::<9>::new(&BigUint::from(10u8)).unwrap_err(),
            FieldError::InvalidModulus
        );
        let too_big = (BigUint::from(1u8) << 260u32) - 1u8;
        assert!(matches!(
            MontgomeryField::<9>::new(&too_big),
            Err(FieldError::ModulusTooLarge { limbs: 9, .. })
        ));
    }

    #[test]
    fn test_mul_of_extremes() {
        let field = bn254_base();
        let p = field.modulus().clone();
        let minus_one = field.from_biguint(&(&p - 1u8)).unwrap();
        let product = field.mul(&minus_one, &minus_one);
        assert!(field.is_one(&product));
        assert!(field.is_one(&field.square(&minus_one)));
        assert_eq!(field.to_biguint(&field.add(&minus_one, &field.one())), BigUint::default());
    }

    #[test]
    fn test_small_values() {
        let field = bn254_base();
        let six = field.mul(&field.from_u64(2), &field.from_u64(3));
        assert_eq!(six, field.from_u64(6));
        assert_eq!(field.to_biguint(&six), BigUint::from(6u8));
        assert_eq!(field.sub(&field.from_u64(2), &field.from_u64(3)), field.neg(&field.one()));
        assert_eq!(field.pow(&field.from_u64(3), &[4]), field.from_u64(81));
    }

    #[test]
    fn test_random_with_unused_top_limbs() {
        // the BLS12-381 group order held in the 14 limbs of its base field
        let q = BigUint::from_str(
            "52435875175126190479447740508185965837690552500527637822603658699938581184513",
        )
        .unwrap();
        let field = MontgomeryField::<14>::new(&q).unwrap();
        let mut rng = msm_utils::tests::make_test_rng(None);
        let mut top_limb_used = false;
        for _ in 0..256 {
            let x = field.random(&mut rng);
            assert!(x.0[9..].iter().all(|limb| *limb == 0));
            assert!(field.to_biguint(&x) < q);
            top_limb_used |= x.0[8] >> 22 != 0;
        }
        // bit 254 of the order is bit 22 of limb 8
        assert!(top_limb_used);
    }
}
