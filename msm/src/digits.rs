//! Reading windows of bits out of scalars, and the signed-digit recoding
//! used by the bucket kernel.

/// Returns the `len` bits of `words` starting at bit `start`, as an integer.
///
/// `words` holds a little-endian integer; bits past its end read as zero.
/// The window spans at most two words, so `len` is at most 64.
pub fn extract_bit_slice(words: &[u64], start: usize, len: u32) -> u64 {
    debug_assert!(len <= 64);
    if len == 0 {
        return 0;
    }
    let (index, offset) = (start / 64, (start % 64) as u32);
    let low = words.get(index).copied().unwrap_or(0) >> offset;
    let high = if offset > 0 && offset + len > 64 {
        words.get(index + 1).copied().unwrap_or(0) << (64 - offset)
    } else {
        0
    };
    (low | high) & mask(len)
}

/// Byte-level variant of [`extract_bit_slice`], for scalars in packed form.
pub fn extract_bit_slice_bytes(bytes: &[u8], start: usize, len: u32) -> u64 {
    debug_assert!(len <= 64);
    if len == 0 {
        return 0;
    }
    let (index, offset) = (start / 8, (start % 8) as u32);
    let count = (offset + len).div_ceil(8) as usize;
    let window = (0..count).fold(0u128, |acc, i| {
        let byte = bytes.get(index + i).copied().unwrap_or(0);
        acc | (u128::from(byte) << (8 * i))
    });
    (window >> offset) as u64 & mask(len)
}

fn mask(len: u32) -> u64 {
    if len == 64 {
        u64::MAX
    } else {
        (1 << len) - 1
    }
}

/// Turns an unsigned `c`-bit window into a digit in `[-2^(c-1), 2^(c-1)]`.
///
/// `carry` is the borrow from the previous (lower) window and is updated for
/// the next one. A window above `2^(c-1)` becomes `window - 2^c` and carries
/// one into the next window.
pub fn signed_digit(window: u64, carry: &mut u64, c: u32) -> i64 {
    debug_assert!((1..=32).contains(&c));
    let half = 1u64 << (c - 1);
    let value = window + *carry;
    if value > half {
        *carry = 1;
        value as i64 - (1i64 << c)
    } else {
        *carry = 0;
        value as i64
    }
}

/// Signed base-`2^c` digits of a little-endian integer, least significant
/// first. `windows` must leave room for the final carry, that is
/// `windows * c > bits`.
pub fn signed_digits(words: &[u64], c: u32, windows: usize) -> Vec<i64> {
    let mut carry = 0;
    let digits = (0..windows)
        .map(|k| signed_digit(extract_bit_slice(words, k * c as usize, c), &mut carry, c))
        .collect();
    debug_assert_eq!(carry, 0);
    digits
}

/// Number of windows of `c` bits needed for `bits`-bit scalars, counting
/// the carry out of the top window.
pub fn window_count(bits: u32, c: u32) -> usize {
    (bits + 1).div_ceil(c) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::{BigInt, BigUint};
    use proptest::prelude::*;

    #[test]
    fn test_slices_across_word_boundaries() {
        let words = [0xfedc_ba98_7654_3210u64, 0x0123_4567_89ab_cdef];
        assert_eq!(extract_bit_slice(&words, 0, 4), 0x0);
        assert_eq!(extract_bit_slice(&words, 4, 8), 0x21);
        assert_eq!(extract_bit_slice(&words, 60, 8), 0xff);
        assert_eq!(extract_bit_slice(&words, 0, 64), words[0]);
        assert_eq!(extract_bit_slice(&words, 64, 64), words[1]);
        assert_eq!(extract_bit_slice(&words, 120, 16), 0x01);
        assert_eq!(extract_bit_slice(&words, 200, 16), 0);
    }

    #[test]
    fn test_signed_digits_of_small_values() {
        // 255 = 2^8 - 1 with c = 4: [15, 15] -> [-1, 0, 1]
        assert_eq!(signed_digits(&[255], 4, 3), vec![-1, 0, 1]);
        // the midpoint stays positive
        assert_eq!(signed_digits(&[8], 4, 2), vec![8, 0]);
        assert_eq!(signed_digits(&[9], 4, 2), vec![-7, 1]);
        assert_eq!(window_count(8, 4), 3);
        assert_eq!(window_count(7, 4), 2);
    }

    proptest! {
        #[test]
        fn prop_bytes_and_words_agree(
            words in any::<[u64; 4]>(),
            start in 0usize..256,
            len in 1u32..=64,
        ) {
            let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
            prop_assert_eq!(
                extract_bit_slice(&words, start, len),
                extract_bit_slice_bytes(&bytes, start, len)
            );
        }

        #[test]
        fn prop_slice_matches_shift_and_mask(
            words in any::<[u64; 4]>(),
            start in 0usize..256,
            len in 1u32..=64,
        ) {
            let value = BigUint::from_slice(
                &words.iter().flat_map(|w| [*w as u32, (*w >> 32) as u32]).collect::<Vec<_>>(),
            );
            let expected = (value >> start) & ((BigUint::from(1u8) << len) - 1u8);
            prop_assert_eq!(BigUint::from(extract_bit_slice(&words, start, len)), expected);
        }

        #[test]
        fn prop_signed_digits_recompose(words in any::<[u64; 4]>(), c in 1u32..=20) {
            let windows = window_count(256, c);
            let digits = signed_digits(&words, c, windows);
            let half = 1i64 << (c - 1);
            prop_assert!(digits.iter().all(|d| -half <= *d && *d <= half));

            let sum = digits
                .iter()
                .rev()
                .fold(BigInt::from(0u8), |acc, d| (acc << c) + BigInt::from(*d));
            let value = BigUint::from_slice(
                &words.iter().flat_map(|w| [*w as u32, (*w >> 32) as u32]).collect::<Vec<_>>(),
            );
            prop_assert_eq!(sum, BigInt::from(value));
        }
    }
}
