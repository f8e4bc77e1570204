//! This module implements the [`FieldError`] and [`CurveError`] types.

use thiserror::Error;

/// Errors that can arise when setting up or using a Montgomery field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("the modulus must be an odd integer greater than 2")]
    InvalidModulus,

    #[error("fields are supported for 2 to 16 limbs, got {0}")]
    UnsupportedLimbCount(usize),

    #[error("a {bits}-bit modulus does not fit in {limbs} limbs of 29 bits with room for lazy reduction")]
    ModulusTooLarge { bits: u64, limbs: usize },

    #[error("expected {expected} packed bytes, got {got}")]
    WrongByteLength { expected: usize, got: usize },

    #[error("the value is not smaller than the modulus")]
    NotCanonical,

    #[error("cannot invert zero (element {0} of the batch)")]
    ZeroInverse(usize),

    #[error("failed to decode hex")]
    DecodeHex,
}

/// Errors that can arise when instantiating a curve from its parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("the curve configuration could not be parsed: {0}")]
    Config(String),

    #[error("the {0} is not on the curve")]
    NotOnCurve(&'static str),

    #[error("the generator does not have the configured order")]
    GeneratorOrder,

    #[error("the cofactor must be nonzero")]
    ZeroCofactor,

    #[error("the curve coefficient {0} is degenerate")]
    DegenerateCoefficient(&'static str),

    #[error("inconsistent endomorphism parameters: {0}")]
    InconsistentEndomorphism(&'static str),
}
