//! Square roots with Tonelli-Shanks.

use super::{montgomery::FieldElement, MontgomeryField};
use num_bigint::BigUint;

/// Constants derived from `p - 1 = 2^s t` with `t` odd.
#[derive(Clone, Debug, Default)]
pub struct SqrtPrecomputation<const N: usize> {
    two_adicity: u32,
    /// (t - 1) / 2
    trace_minus_one_div_two: Vec<u64>,
    /// (p - 1) / 2
    legendre_exponent: Vec<u64>,
    /// z^t for a quadratic non-residue z, a generator of the 2^s roots of unity
    root_of_unity: FieldElement<N>,
}

impl<const N: usize> SqrtPrecomputation<N> {
    pub(crate) fn new(field: &MontgomeryField<N>) -> Self {
        let p = field.modulus();
        let p_minus_one = p - 1u8;
        let two_adicity = p_minus_one.trailing_zeros().unwrap_or(0) as u32;
        let trace = &p_minus_one >> two_adicity;
        let legendre_exponent = &p_minus_one >> 1u32;

        let mut z = BigUint::from(2u8);
        while z.modpow(&legendre_exponent, p) != p_minus_one {
            z += 1u8;
        }
        let root_of_unity = field.from_biguint_reduced(&z.modpow(&trace, p));

        Self {
            two_adicity,
            trace_minus_one_div_two: ((&trace - 1u8) >> 1u32).to_u64_digits(),
            legendre_exponent: legendre_exponent.to_u64_digits(),
            root_of_unity,
        }
    }
}

impl<const N: usize> MontgomeryField<N> {
    /// Legendre symbol: 0 for zero, 1 for a nonzero square, -1 otherwise.
    pub fn legendre(&self, x: &FieldElement<N>) -> i8 {
        if self.is_zero(x) {
            return 0;
        }
        let symbol = self.pow(x, &self.sqrt.legendre_exponent);
        if self.is_one(&symbol) {
            1
        } else {
            -1
        }
    }

    pub fn is_square(&self, x: &FieldElement<N>) -> bool {
        self.legendre(x) >= 0
    }

    /// Returns a square root of `x`, or `None` if `x` is not a square.
    /// Which of the two roots is returned is unspecified.
    pub fn sqrt(&self, x: &FieldElement<N>) -> Option<FieldElement<N>> {
        if self.is_zero(x) {
            return Some(*x);
        }
        if self.legendre(x) != 1 {
            return None;
        }

        // w = x^((t-1)/2), so that x w = x^((t+1)/2) and x w^2 = x^t
        let w = self.pow(x, &self.sqrt.trace_minus_one_div_two);
        let mut root = self.mul(x, &w);
        let mut b = self.mul(&root, &w);
        let mut z = self.sqrt.root_of_unity;
        let mut v = self.sqrt.two_adicity;

        while !self.is_one(&b) {
            // least k with b^(2^k) = 1, which is below v since x is a square
            let mut k = 0;
            let mut b2k = b;
            while !self.is_one(&b2k) {
                self.square_in_place(&mut b2k);
                k += 1;
            }
            debug_assert!(k < v);

            let mut w = z;
            for _ in 0..v - k - 1 {
                self.square_in_place(&mut w);
            }
            z = self.square(&w);
            self.mul_assign(&mut b, &z);
            self.mul_assign(&mut root, &w);
            v = k;
        }
        Some(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msm_utils::tests::make_test_rng;

    #[test]
    fn test_sqrt_with_high_two_adicity() {
        // Pallas base field, p - 1 = 2^32 t
        let p = BigUint::parse_bytes(
            b"40000000000000000000000000000000224698fc094cf91b992d30ed00000001",
            16,
        )
        .unwrap();
        let field = MontgomeryField::<9>::new(&p).unwrap();
        assert_eq!(field.sqrt.two_adicity, 32);

        let mut rng = make_test_rng(None);
        for _ in 0..20 {
            let x = field.random(&mut rng);
            let square = field.square(&x);
            let root = field.sqrt(&square).unwrap();
            assert!(root == x || root == field.neg(&x));
            assert_eq!(field.legendre(&square), 1);
        }
        assert_eq!(field.sqrt(&field.zero()), Some(field.zero()));
    }

    #[test]
    fn test_non_residue_has_no_root() {
        // 2^255 - 19, p = 5 mod 8 so 2 is not a square
        let p = (BigUint::from(1u8) << 255u32) - 19u8;
        let field = MontgomeryField::<9>::new(&p).unwrap();
        let two = field.from_u64(2);
        assert_eq!(field.legendre(&two), -1);
        assert_eq!(field.sqrt(&two), None);
        let four = field.from_u64(4);
        let root = field.sqrt(&four).unwrap();
        assert_eq!(field.square(&root), four);
    }
}
