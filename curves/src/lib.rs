#![deny(unsafe_code)]
#![deny(clippy::all)]
// Cryptographic constants use unseparated hex literals for consistency with
// reference implementations
#![allow(clippy::unreadable_literal)]

//! Prime fields in Montgomery form over 29-bit limbs, and the elliptic curve
//! group laws (short Weierstraß and twisted Edwards) built on top of them.

pub mod curve;
pub mod error;
pub mod field;
pub mod presets;

pub use curve::{
    config::{CurveConfig, EndomorphismConfig, Equation, GeneratorConfig},
    glv::{Decomposition, Endomorphism, GlvBasis},
    point::{AffinePoint, ProjectivePoint},
    AdditionMode, Curve, CurveFamily, PairIndices,
};
pub use error::{CurveError, FieldError};
pub use field::{arena::Arena, FieldElement, MontgomeryField};

/// Number of 29-bit limbs for moduli of up to 259 bits (BN254, Pallas, Ed25519).
pub const LIMBS_255: usize = 9;

/// Number of 29-bit limbs for moduli of up to 404 bits (BLS12-381).
pub const LIMBS_381: usize = 14;
