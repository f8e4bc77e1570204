use msm_utils::BigUintHelpers;
use num_bigint::BigUint;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_limbs_round_trip(bytes in any::<[u8; 32]>(), width in 1u32..=64) {
        let x = BigUint::from_bytes_le(&bytes);
        let count = (256 / width as usize) + 1;
        let limbs = x.to_limbs(width, count).unwrap();
        prop_assert_eq!(limbs.len(), count);
        prop_assert_eq!(BigUint::from_limbs(&limbs, width), x);
    }

    #[test]
    fn prop_padded_words_match_digits(bytes in any::<[u8; 32]>()) {
        let x = BigUint::from_bytes_le(&bytes);
        let words = x.to_padded_words(4).unwrap();
        prop_assert_eq!(BigUint::from_limbs(&words, 64), x);
    }
}

#[test]
fn test_bitlen_matches_bits_for_nonzero() {
    for shift in [0u32, 1, 28, 29, 63, 64, 254] {
        let x = BigUint::from(1u8) << shift;
        assert_eq!(x.bitlen(), shift as usize + 1);
    }
}
