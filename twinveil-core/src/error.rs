//! Error types for Twinveil.
//!
//! Whole-call inputs (a recipient's own secrets, a target meta-address) fail
//! the entire call with one of these errors. Per-candidate failures inside a
//! scan are recoverable and never surface as an error to the caller.

use thiserror::Error;

/// Result type alias using `TwinveilError`.
pub type Result<T> = std::result::Result<T, TwinveilError>;

/// Main error type for all Twinveil operations.
#[derive(Debug, Error)]
pub enum TwinveilError {
    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The request cannot be decoded into the expected shape.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A point or scalar string fails its lexical constraints.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Coordinates parse but do not describe a point on the curve.
    #[error("Invalid {curve} point: {reason}")]
    InvalidPoint {
        /// Curve the point was checked against
        curve: &'static str,
        /// What went wrong
        reason: String,
    },

    /// Invalid meta-address content.
    #[error("Invalid meta-address: {0}")]
    InvalidMetaAddress(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CRYPTOGRAPHIC ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The secure random source or the pairing evaluation failed.
    #[error("Cryptographic failure: {0}")]
    CryptoFailure(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // ENVIRONMENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl TwinveilError {
    /// Shorthand for an [`TwinveilError::InvalidPoint`] on the named curve.
    pub fn invalid_point(curve: &'static str, reason: impl Into<String>) -> Self {
        TwinveilError::InvalidPoint {
            curve,
            reason: reason.into(),
        }
    }

    /// Returns true if this is a cryptographic error.
    pub fn is_crypto_error(&self) -> bool {
        matches!(self, TwinveilError::CryptoFailure(_))
    }

    /// Returns true if this error was caused by the caller's input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            TwinveilError::MalformedInput(_)
                | TwinveilError::InvalidEncoding(_)
                | TwinveilError::InvalidPoint { .. }
                | TwinveilError::InvalidMetaAddress(_)
                | TwinveilError::JsonError(_)
                | TwinveilError::HexError(_)
        )
    }

    /// Returns true if a scan may skip the offending candidate and continue.
    ///
    /// Only lexical and on-curve failures of a single candidate qualify.
    pub fn is_candidate_recoverable(&self) -> bool {
        matches!(
            self,
            TwinveilError::InvalidEncoding(_) | TwinveilError::InvalidPoint { .. }
        )
    }
}
