//! This module implements the [`MsmError`] type.

use thiserror::Error;

/// Errors that can arise when running a multi-scalar multiplication
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MsmError {
    #[error("got {scalars} scalars for {points} points")]
    LengthMismatch { scalars: usize, points: usize },

    #[error("invalid window configuration: c = {window_bits}, c0 = {sub_window_bits}")]
    InvalidWindow {
        window_bits: u32,
        sub_window_bits: u32,
    },

    #[error("failed to start the worker pool: {0}")]
    ThreadPool(String),

    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("no value was broadcast under the key {0:?}")]
    NotBroadcast(String),
}
