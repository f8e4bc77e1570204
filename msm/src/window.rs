//! Window sizes of the bucket method.

use crate::{digits::window_count, error::MsmError};
use serde::{Deserialize, Serialize};

/// Largest supported window, in bits. A window of `c` bits uses `2^(c-1)`
/// buckets per window.
pub const MAX_WINDOW_BITS: u32 = 24;

/// Largest window picked automatically.
const MAX_DEFAULT_WINDOW_BITS: u32 = 20;

/// Caller-facing tuning knobs. Every field is optional in serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsmOptions {
    /// Window size `c`, derived from the number of points when unset.
    pub window_bits: Option<u32>,
    /// Sub-bucket size `c0` used by the bucket reduction, `c / 2` when unset.
    pub sub_window_bits: Option<u32>,
    /// Split scalars with the curve endomorphism, when the curve has one.
    pub use_glv: bool,
}

impl Default for MsmOptions {
    fn default() -> Self {
        Self {
            window_bits: None,
            sub_window_bits: None,
            use_glv: true,
        }
    }
}

impl MsmOptions {
    pub fn with_window(mut self, window_bits: u32, sub_window_bits: u32) -> Self {
        self.window_bits = Some(window_bits);
        self.sub_window_bits = Some(sub_window_bits);
        self
    }

    pub fn without_glv(mut self) -> Self {
        self.use_glv = false;
        self
    }
}

/// Validated window parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    /// Bits per window.
    pub c: u32,
    /// The `2^(c-1)` buckets of a window are reduced in columns of `2^c0`.
    pub c0: u32,
}

impl WindowConfig {
    pub fn new(c: u32, c0: u32) -> Result<Self, MsmError> {
        if !(1..=MAX_WINDOW_BITS).contains(&c) || c0 >= c {
            return Err(MsmError::InvalidWindow {
                window_bits: c,
                sub_window_bits: c0,
            });
        }
        Ok(Self { c, c0 })
    }

    /// `c ≈ log2(n) - 1`, `c0 = c / 2`.
    pub fn default_for(points: usize) -> Self {
        let log = points.max(1).ilog2();
        let c = log.saturating_sub(1).clamp(2, MAX_DEFAULT_WINDOW_BITS);
        Self { c, c0: c / 2 }
    }

    /// Fills in whatever `options` leaves unset, then validates.
    pub fn resolve(options: &MsmOptions, points: usize) -> Result<Self, MsmError> {
        let default = Self::default_for(points);
        match (options.window_bits, options.sub_window_bits) {
            (None, None) => Ok(default),
            (Some(c), None) => Self::new(c, (c / 2).min(c.saturating_sub(1))),
            (None, Some(c0)) => Self::new(default.c.max(c0.saturating_add(1)), c0),
            (Some(c), Some(c0)) => Self::new(c, c0),
        }
    }

    /// Number of buckets per window, `2^(c-1)`.
    pub fn buckets(&self) -> usize {
        1 << (self.c - 1)
    }

    /// Number of windows for scalars of `bits` bits.
    pub fn windows(&self, bits: u32) -> usize {
        window_count(bits, self.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_the_input_size() {
        assert_eq!(WindowConfig::default_for(0), WindowConfig { c: 2, c0: 1 });
        assert_eq!(WindowConfig::default_for(1), WindowConfig { c: 2, c0: 1 });
        assert_eq!(WindowConfig::default_for(1 << 10), WindowConfig { c: 9, c0: 4 });
        assert_eq!(WindowConfig::default_for(1 << 16), WindowConfig { c: 15, c0: 7 });
        assert_eq!(WindowConfig::default_for(usize::MAX).c, MAX_DEFAULT_WINDOW_BITS);
    }

    #[test]
    fn test_resolve_partial_options() {
        let options = MsmOptions {
            window_bits: Some(1),
            ..Default::default()
        };
        assert_eq!(
            WindowConfig::resolve(&options, 8),
            Ok(WindowConfig { c: 1, c0: 0 })
        );

        let options = MsmOptions {
            sub_window_bits: Some(6),
            ..Default::default()
        };
        assert_eq!(
            WindowConfig::resolve(&options, 8),
            Ok(WindowConfig { c: 7, c0: 6 })
        );
    }

    #[test]
    fn test_rejects_invalid_windows() {
        for (c, c0) in [(0, 0), (MAX_WINDOW_BITS + 1, 2), (4, 4), (1, 1)] {
            assert_eq!(
                WindowConfig::new(c, c0),
                Err(MsmError::InvalidWindow {
                    window_bits: c,
                    sub_window_bits: c0
                })
            );
        }
        assert!(WindowConfig::new(MAX_WINDOW_BITS, MAX_WINDOW_BITS - 1).is_ok());
    }

    #[test]
    fn test_options_from_json() {
        let options: MsmOptions = serde_json::from_str(r#"{"window_bits": 12}"#).unwrap();
        assert_eq!(options.window_bits, Some(12));
        assert!(options.use_glv);
        let options: MsmOptions = serde_json::from_str(r#"{"use_glv": false}"#).unwrap();
        assert_eq!(options, MsmOptions::default().without_glv());
    }
}
