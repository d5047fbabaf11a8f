//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`IrrigatorError`] via `From` at port boundaries.

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum IrrigatorError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The last poll reported the device as disconnected.
    #[error("device is not connected")]
    NotConnected,

    /// The device answered a command with `success = false`.
    #[error("command rejected by device: {0}")]
    CommandRejected(String),

    /// The device API could not be reached or answered garbage.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The hysteresis band is empty or inverted.
    #[error("low threshold ({low}) must be below high threshold ({high})")]
    InvertedThresholds { low: f64, high: f64 },

    /// A threshold is NaN or infinite.
    #[error("thresholds must be finite numbers")]
    NonFiniteThreshold,
}
