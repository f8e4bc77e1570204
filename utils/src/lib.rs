//! Small helpers shared by the field, curve and MSM crates.

pub mod biguint_helpers;
pub mod tests;

pub use biguint_helpers::BigUintHelpers;
