//! Serializable curve parameters.
//!
//! Big integers are written as decimal strings, e.g.
//!
//! ```json
//! {
//!   "name": "bn254",
//!   "modulus": "21888242871839275222246405745257275088696311157297823662689037894645226208583",
//!   "order": "21888242871839275222246405745257275088548364400416034343698204186575808495617",
//!   "cofactor": "1",
//!   "equation": { "family": "short_weierstrass", "b": "3" },
//!   "generator": { "x": "1", "y": "2" }
//! }
//! ```

use crate::error::CurveError;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveConfig {
    pub name: String,
    /// The base field prime `p`.
    #[serde_as(as = "DisplayFromStr")]
    pub modulus: BigUint,
    /// The prime order `q` of the generator.
    #[serde_as(as = "DisplayFromStr")]
    pub order: BigUint,
    #[serde_as(as = "DisplayFromStr")]
    pub cofactor: BigUint,
    pub equation: Equation,
    pub generator: GeneratorConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endomorphism: Option<EndomorphismConfig>,
}

/// The curve equation.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Equation {
    /// `y^2 = x^3 + b`
    ShortWeierstrass {
        #[serde_as(as = "DisplayFromStr")]
        b: BigUint,
    },
    /// `-x^2 + y^2 = 1 + d x^2 y^2`
    TwistedEdwards {
        #[serde_as(as = "DisplayFromStr")]
        d: BigUint,
    },
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub x: BigUint,
    #[serde_as(as = "DisplayFromStr")]
    pub y: BigUint,
}

/// A cube root of unity `beta` in the base field and the matching eigenvalue
/// `lambda` in the scalar field: `(beta x, y) = lambda (x, y)`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndomorphismConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub beta: BigUint,
    #[serde_as(as = "DisplayFromStr")]
    pub lambda: BigUint,
}

impl CurveConfig {
    pub fn from_json(json: &str) -> Result<Self, CurveError> {
        serde_json::from_str(json).map_err(|e| CurveError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CurveError> {
        serde_json::to_string_pretty(self).map_err(|e| CurveError::Config(e.to_string()))
    }
}
