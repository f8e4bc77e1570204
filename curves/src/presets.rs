//! Parameters of well-known curves.
//!
//! Constants are little-endian 64-bit words.

use crate::{
    curve::{
        config::{CurveConfig, EndomorphismConfig, Equation, GeneratorConfig},
        Curve,
    },
    error::CurveError,
    LIMBS_255, LIMBS_381,
};
use msm_utils::BigUintHelpers;
use num_bigint::BigUint;

fn from_words(words: &[u64]) -> BigUint {
    BigUint::from_limbs(words, 64)
}

////////////////////////////////////////////////////////////////////////////
// BN254
////////////////////////////////////////////////////////////////////////////

/// 21888242871839275222246405745257275088696311157297823662689037894645226208583
const BN254_MODULUS: [u64; 4] = [
    0x3c208c16d87cfd47,
    0x97816a916871ca8d,
    0xb85045b68181585d,
    0x30644e72e131a029,
];

/// 21888242871839275222246405745257275088548364400416034343698204186575808495617
const BN254_ORDER: [u64; 4] = [
    0x43e1f593f0000001,
    0x2833e84879b97091,
    0xb85045b68181585d,
    0x30644e72e131a029,
];

/// 21888242871839275220042445260109153167277707414472061641714758635765020556616
const BN254_BETA: [u64; 4] = [
    0xe4bd44e5607cfd48,
    0xc28f069fbb966e3d,
    0x5e6dd9e7e0acccb0,
    0x30644e72e131a029,
];

/// 21888242871839275217838484774961031246154997185409878258781734729429964517155
const BN254_LAMBDA: [u64; 4] = [
    0xb8ca0b2d36636f23,
    0xcc37a73fec2bc5e9,
    0x048b6e193fd84104,
    0x30644e72e131a029,
];

/// The G1 group of the BN254 (alt_bn128) pairing curve, `y^2 = x^3 + 3`.
pub fn bn254_config() -> CurveConfig {
    CurveConfig {
        name: "bn254".to_string(),
        modulus: from_words(&BN254_MODULUS),
        order: from_words(&BN254_ORDER),
        cofactor: 1u8.into(),
        equation: Equation::ShortWeierstrass { b: 3u8.into() },
        generator: GeneratorConfig {
            x: 1u8.into(),
            y: 2u8.into(),
        },
        endomorphism: Some(EndomorphismConfig {
            beta: from_words(&BN254_BETA),
            lambda: from_words(&BN254_LAMBDA),
        }),
    }
}

pub fn bn254() -> Result<Curve<LIMBS_255>, CurveError> {
    Curve::new(&bn254_config())
}

////////////////////////////////////////////////////////////////////////////
// Pallas
////////////////////////////////////////////////////////////////////////////

/// 28948022309329048855892746252171976963363056481941560715954676764349967630337
const PALLAS_MODULUS: [u64; 4] = [
    0x992d30ed00000001,
    0x224698fc094cf91b,
    0x0000000000000000,
    0x4000000000000000,
];

/// 28948022309329048855892746252171976963363056481941647379679742748393362948097
const PALLAS_ORDER: [u64; 4] = [
    0x8c46eb2100000001,
    0x224698fc0994a8dd,
    0x0000000000000000,
    0x4000000000000000,
];

/// 12418654782883325593414442427049395787963493412651469444558597405572177144507
const PALLAS_GENERATOR_Y: [u64; 4] = [
    0x19cf7a23caed2abb,
    0x8f655bd4333d4771,
    0x53dfa9f06378ee54,
    0x1b74b5a30a12937c,
];

/// 20444556541222657078399132219657928148671392403212669005631716460534733845831
const PALLAS_BETA: [u64; 4] = [
    0x7b7fd22f0201b547,
    0x05270d29d19fc7d2,
    0xd3552a23a8554e50,
    0x2d33357cb532458e,
];

/// 26005156700822196841419187675678338661165322343552424574062261873906994770353
const PALLAS_LAMBDA: [u64; 4] = [
    0x619d1840af55f1b1,
    0x1259527ec1d4752e,
    0xaee24b27e308f0a6,
    0x397e65a7d7c1ad71,
];

/// Pallas, `y^2 = x^3 + 5`, with generator `(1, sqrt(6))`.
pub fn pallas_config() -> CurveConfig {
    CurveConfig {
        name: "pallas".to_string(),
        modulus: from_words(&PALLAS_MODULUS),
        order: from_words(&PALLAS_ORDER),
        cofactor: 1u8.into(),
        equation: Equation::ShortWeierstrass { b: 5u8.into() },
        generator: GeneratorConfig {
            x: 1u8.into(),
            y: from_words(&PALLAS_GENERATOR_Y),
        },
        endomorphism: Some(EndomorphismConfig {
            beta: from_words(&PALLAS_BETA),
            lambda: from_words(&PALLAS_LAMBDA),
        }),
    }
}

pub fn pallas() -> Result<Curve<LIMBS_255>, CurveError> {
    Curve::new(&pallas_config())
}

////////////////////////////////////////////////////////////////////////////
// BLS12-381
////////////////////////////////////////////////////////////////////////////

const BLS12_381_MODULUS: [u64; 6] = [
    0xb9feffffffffaaab,
    0x1eabfffeb153ffff,
    0x6730d2a0f6b0f624,
    0x64774b84f38512bf,
    0x4b1ba7b6434bacd7,
    0x1a0111ea397fe69a,
];

/// 52435875175126190479447740508185965837690552500527637822603658699938581184513
const BLS12_381_ORDER: [u64; 4] = [
    0xffffffff00000001,
    0x53bda402fffe5bfe,
    0x3339d80809a1d805,
    0x73eda753299d7d48,
];

/// 76329603384216526031706109802092473003
const BLS12_381_COFACTOR: [u64; 2] = [0x8c00aaab0000aaab, 0x396c8c005555e156];

const BLS12_381_GENERATOR_X: [u64; 6] = [
    0xfb3af00adb22c6bb,
    0x6c55e83ff97a1aef,
    0xa14e3a3f171bac58,
    0xc3688c4f9774b905,
    0x2695638c4fa9ac0f,
    0x17f1d3a73197d794,
];

const BLS12_381_GENERATOR_Y: [u64; 6] = [
    0x0caa232946c5e7e1,
    0xd03cc744a2888ae4,
    0x00db18cb2c04b3ed,
    0xfcf5e095d5d00af6,
    0xa09e30ed741d8ae4,
    0x08b3f481e3aaa0f1,
];

const BLS12_381_BETA: [u64; 5] = [
    0x2e01fffffffefffe,
    0xde17d813620a0002,
    0xddb3a93be6f89688,
    0xba69c6076a0f77ea,
    0x5f19672fdf76ce51,
];

/// 52435875175126190479447740508185965837461563690374988244538805122978187051009
const BLS12_381_LAMBDA: [u64; 4] = [
    0xfffffffe00000001,
    0xa7780001fffcb7fc,
    0x3339d80809a1d804,
    0x73eda753299d7d48,
];

/// The G1 group of BLS12-381, `y^2 = x^3 + 4`.
pub fn bls12_381_config() -> CurveConfig {
    CurveConfig {
        name: "bls12_381".to_string(),
        modulus: from_words(&BLS12_381_MODULUS),
        order: from_words(&BLS12_381_ORDER),
        cofactor: from_words(&BLS12_381_COFACTOR),
        equation: Equation::ShortWeierstrass { b: 4u8.into() },
        generator: GeneratorConfig {
            x: from_words(&BLS12_381_GENERATOR_X),
            y: from_words(&BLS12_381_GENERATOR_Y),
        },
        endomorphism: Some(EndomorphismConfig {
            beta: from_words(&BLS12_381_BETA),
            lambda: from_words(&BLS12_381_LAMBDA),
        }),
    }
}

pub fn bls12_381() -> Result<Curve<LIMBS_381>, CurveError> {
    Curve::new(&bls12_381_config())
}

////////////////////////////////////////////////////////////////////////////
// Ed25519
////////////////////////////////////////////////////////////////////////////

/// 2^255 - 19
const ED25519_MODULUS: [u64; 4] = [
    0xffffffffffffffed,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0x7fffffffffffffff,
];

/// 7237005577332262213973186563042994240857116359379907606001950938285454250989
const ED25519_ORDER: [u64; 4] = [
    0x5812631a5cf5d3ed,
    0x14def9dea2f79cd6,
    0x0000000000000000,
    0x1000000000000000,
];

/// -121665/121666
const ED25519_D: [u64; 4] = [
    0x75eb4dca135978a3,
    0x00700a4d4141d8ab,
    0x8cc740797779e898,
    0x52036cee2b6ffe73,
];

const ED25519_GENERATOR_X: [u64; 4] = [
    0xc9562d608f25d51a,
    0x692cc7609525a7b2,
    0xc0a4e231fdd6dc5c,
    0x216936d3cd6e53fe,
];

/// 4/5
const ED25519_GENERATOR_Y: [u64; 4] = [
    0x6666666666666658,
    0x6666666666666666,
    0x6666666666666666,
    0x6666666666666666,
];

/// The twisted Edwards form of Curve25519, `-x^2 + y^2 = 1 + d x^2 y^2`.
pub fn ed25519_config() -> CurveConfig {
    CurveConfig {
        name: "ed25519".to_string(),
        modulus: from_words(&ED25519_MODULUS),
        order: from_words(&ED25519_ORDER),
        cofactor: 8u8.into(),
        equation: Equation::TwistedEdwards {
            d: from_words(&ED25519_D),
        },
        generator: GeneratorConfig {
            x: from_words(&ED25519_GENERATOR_X),
            y: from_words(&ED25519_GENERATOR_Y),
        },
        endomorphism: None,
    }
}

pub fn ed25519() -> Result<Curve<LIMBS_255>, CurveError> {
    Curve::new(&ed25519_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_presets_instantiate() {
        assert!(bn254().unwrap().endomorphism().is_some());
        assert!(pallas().unwrap().endomorphism().is_some());
        assert!(bls12_381().unwrap().endomorphism().is_some());
        assert!(ed25519().unwrap().endomorphism().is_none());
    }

    #[test]
    fn test_words_match_decimal() {
        assert_eq!(
            from_words(&BN254_ORDER),
            BigUint::from_str(
                "21888242871839275222246405745257275088548364400416034343698204186575808495617"
            )
            .unwrap()
        );
        assert_eq!(
            from_words(&ED25519_MODULUS),
            (BigUint::from(1u8) << 255u32) - 19u8
        );
    }
}
