//! This module provides helpers to move between `BigUint` and fixed-width limb
//! representations, as used by the Montgomery field engine and the digit
//! extraction of the bucket method.
use num_bigint::BigUint;

/// Helpers for BigUint
pub trait BigUintHelpers {
    /// Returns the minimum number of bits required to represent a BigUint
    /// As opposed to BigUint::bits, this function returns 1 for the input zero
    fn bitlen(&self) -> usize;

    /// Splits `self` into `count` little-endian limbs of `width` bits each.
    /// Returns `None` if `self` does not fit in `count * width` bits.
    fn to_limbs(&self, width: u32, count: usize) -> Option<Vec<u64>>;

    /// Recombines little-endian limbs of `width` bits each.
    /// Limbs are not required to be normalized, i.e. they may exceed `width` bits.
    fn from_limbs(limbs: &[u64], width: u32) -> Self;

    /// Returns the little-endian 64-bit words of `self`, zero-padded to `count` words.
    /// Returns `None` if `self` needs more than `count` words.
    fn to_padded_words(&self, count: usize) -> Option<Vec<u64>>;
}

impl BigUintHelpers for BigUint {
    fn bitlen(&self) -> usize {
        if self.bits() == 0 {
            1
        } else {
            self.bits() as usize
        }
    }

    fn to_limbs(&self, width: u32, count: usize) -> Option<Vec<u64>> {
        assert!(width > 0 && width <= 64, "limb width must be in 1..=64");
        if self.bits() > u64::from(width) * count as u64 {
            return None;
        }
        let mask = if width == 64 {
            BigUint::from(u64::MAX)
        } else {
            BigUint::from((1u64 << width) - 1)
        };
        let mut rest = self.clone();
        let mut limbs = Vec::with_capacity(count);
        for _ in 0..count {
            let limb = &rest & &mask;
            limbs.push(limb.iter_u64_digits().next().unwrap_or(0));
            rest >>= width;
        }
        Some(limbs)
    }

    fn from_limbs(limbs: &[u64], width: u32) -> Self {
        limbs
            .iter()
            .rev()
            .fold(BigUint::default(), |acc, limb| (acc << width) + *limb)
    }

    fn to_padded_words(&self, count: usize) -> Option<Vec<u64>> {
        let mut words = self.to_u64_digits();
        if words.len() > count {
            return None;
        }
        words.resize(count, 0);
        Some(words)
    }
}
