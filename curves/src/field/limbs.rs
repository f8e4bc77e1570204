//! Raw operations on little-endian arrays of 29-bit limbs stored in `u32`s.
//!
//! With 29-bit limbs, a product of two limbs fits in 58 bits, so a `u64`
//! accumulator can absorb the sum of 2N products (N <= 16) without carrying.

pub const SHIFT: u32 = 29;
pub const MASK: u32 = (1 << SHIFT) - 1;

pub const SHIFT64: u64 = SHIFT as u64;
pub const MASK64: u64 = MASK as u64;

/// Splits little-endian 64-bit words into 29-bit limbs.
/// Bits above `29 * N` are dropped.
pub fn from_u64_words<const N: usize>(words: &[u64]) -> [u32; N] {
    let mut limbs = [0u32; N];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let bit = i * SHIFT as usize;
        let (word, offset) = (bit / 64, bit % 64);
        let mut value = words.get(word).copied().unwrap_or(0) >> offset;
        if offset + SHIFT as usize > 64 {
            value |= words.get(word + 1).copied().unwrap_or(0) << (64 - offset);
        }
        *limb = (value & MASK64) as u32;
    }
    limbs
}

/// Packs 29-bit limbs into little-endian 64-bit words, dropping bits that do
/// not fit in `words`.
pub fn to_u64_words<const N: usize>(limbs: &[u32; N], words: &mut [u64]) {
    words.fill(0);
    for (i, limb) in limbs.iter().enumerate() {
        let bit = i * SHIFT as usize;
        let (word, offset) = (bit / 64, bit % 64);
        if word >= words.len() {
            break;
        }
        words[word] |= u64::from(*limb) << offset;
        if offset + SHIFT as usize > 64 && word + 1 < words.len() {
            words[word + 1] |= u64::from(*limb) >> (64 - offset);
        }
    }
}

#[inline]
pub fn gte<const N: usize>(x: &[u32; N], y: &[u32; N]) -> bool {
    for i in (0..N).rev() {
        #[allow(clippy::comparison_chain)]
        if x[i] > y[i] {
            return true;
        } else if x[i] < y[i] {
            return false;
        }
    }
    true
}

#[inline]
pub fn is_zero<const N: usize>(x: &[u32; N]) -> bool {
    x.iter().all(|limb| *limb == 0)
}

/// `x += y`, result must fit in `29 * N` bits.
#[inline]
pub fn add_assign<const N: usize>(x: &mut [u32; N], y: &[u32; N]) {
    let mut carry = 0u32;
    for i in 0..N {
        let tmp = x[i] + y[i] + carry;
        carry = tmp >> SHIFT;
        x[i] = tmp & MASK;
    }
    debug_assert_eq!(carry, 0, "limb addition overflowed");
}

/// `x -= y`, requires `x >= y`.
#[inline]
pub fn sub_assign<const N: usize>(x: &mut [u32; N], y: &[u32; N]) {
    let mut borrow = 0u32;
    for i in 0..N {
        let tmp = x[i].wrapping_sub(y[i]).wrapping_sub(borrow);
        borrow = tmp >> 31;
        x[i] = tmp & MASK;
    }
    debug_assert_eq!(borrow, 0, "limb subtraction underflowed");
}

#[inline]
pub fn shr1<const N: usize>(x: &mut [u32; N]) {
    for i in 0..N - 1 {
        x[i] = (x[i] >> 1) | ((x[i + 1] & 1) << (SHIFT - 1));
    }
    x[N - 1] >>= 1;
}

#[inline]
pub fn shl1<const N: usize>(x: &mut [u32; N]) {
    for i in (1..N).rev() {
        x[i] = ((x[i] << 1) & MASK) | (x[i - 1] >> (SHIFT - 1));
    }
    x[0] = (x[0] << 1) & MASK;
}

#[inline]
pub fn is_even<const N: usize>(x: &[u32; N]) -> bool {
    x[0] & 1 == 0
}
