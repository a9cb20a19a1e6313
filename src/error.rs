//! Crate-wide error type.
//!
//! The data-structure operations themselves follow the spec's return-flag
//! idiom (`pop`/`peek`/`find_path` never fail with a `Result` — see each
//! module's doc comments for the exact no-op/`None` behavior on bad input).
//! `GridForgeError` exists for the handful of genuinely exceptional
//! constructor- and registry-level failures a Rust port needs a typed error
//! for.

use thiserror::Error;

/// Convenience alias for results using the crate's error type.
pub type Result<T> = std::result::Result<T, GridForgeError>;

/// Errors raised by `gridforge` constructors and the pool registry.
#[derive(Error, Debug)]
pub enum GridForgeError {
    /// A `Grid` was constructed with a zero dimension, which can never
    /// hold a usable cell and isn't something a capacity clamp can fix.
    #[error("grid dimensions must be non-zero, got {cols}x{rows}")]
    DegenerateGrid {
        /// Requested column count.
        cols: usize,
        /// Requested row count.
        rows: usize,
    },

    /// `ObjectPool::dispose` was called on a pool that was already
    /// disposed; a second `on_remove` emission would double-count in a
    /// caller's metrics, so this is rejected rather than silently ignored.
    #[error("object pool already disposed")]
    AlreadyDisposed,

    /// `EngineConfig::load` failed to build its layered configuration.
    #[error("failed to load engine configuration: {0}")]
    Config(#[from] config::ConfigError),
}
