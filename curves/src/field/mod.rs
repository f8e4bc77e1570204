//! Prime field arithmetic on fixed arrays of 29-bit limbs in Montgomery form.

pub mod arena;
pub mod inverse;
pub mod limbs;
pub mod montgomery;
pub mod packing;
pub mod sqrt;

pub use montgomery::{FieldElement, MontgomeryField};
