//! Conversions between field elements and their packed byte encodings.
//!
//! An element packs to exactly `byte_len()` bytes (the modulus bit length
//! rounded up to whole bytes) holding the canonical integer, little-endian by
//! default. The big-endian variants and the hex form (big-endian) are what
//! most serialized curve parameters and test vectors use.

use super::{montgomery::FieldElement, MontgomeryField};
use crate::error::FieldError;
use num_bigint::BigUint;

impl<const N: usize> MontgomeryField<N> {
    pub fn to_packed_bytes(&self, x: &FieldElement<N>) -> Vec<u8> {
        let mut words = vec![0u64; self.word_len()];
        self.to_u64_limbs(x, &mut words);
        let mut bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        bytes.truncate(self.byte_len());
        bytes
    }

    pub fn from_packed_bytes(&self, bytes: &[u8]) -> Result<FieldElement<N>, FieldError> {
        if bytes.len() != self.byte_len() {
            return Err(FieldError::WrongByteLength {
                expected: self.byte_len(),
                got: bytes.len(),
            });
        }
        self.from_biguint(&BigUint::from_bytes_le(bytes))
    }

    pub fn to_packed_bytes_be(&self, x: &FieldElement<N>) -> Vec<u8> {
        let mut bytes = self.to_packed_bytes(x);
        bytes.reverse();
        bytes
    }

    pub fn from_packed_bytes_be(&self, bytes: &[u8]) -> Result<FieldElement<N>, FieldError> {
        let mut le = bytes.to_vec();
        le.reverse();
        self.from_packed_bytes(&le)
    }

    pub fn to_hex(&self, x: &FieldElement<N>) -> String {
        hex::encode(self.to_packed_bytes_be(x))
    }

    /// Parses the big-endian hex encoding produced by [`Self::to_hex`].
    pub fn from_hex(&self, s: &str) -> Result<FieldElement<N>, FieldError> {
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(|_| FieldError::DecodeHex)?;
        self.from_packed_bytes_be(&bytes)
    }
}
