//! Payload error types.

use thiserror::Error;

/// Structural footer errors.
///
/// These are raised before any cryptographic work is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Image too short to carry a footer
    #[error("image too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// Minimum image size
        expected: u64,
        /// Actual image size
        actual: u64,
    },

    /// Footer magic does not match
    #[error("invalid footer magic")]
    BadMagic,

    /// Declared payload length is zero or exceeds the bytes before the footer
    #[error("invalid payload size in footer: declared {declared}, available {available}")]
    InvalidPayloadSize {
        /// Length declared by the footer
        declared: u64,
        /// Bytes available in front of the footer
        available: u64,
    },
}

/// Payload errors
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Footer structure is invalid
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Stored tag does not match the recomputed one (corruption or tampering)
    #[error("authentication failed: payload tag mismatch")]
    Authentication,

    /// Ciphertext handed to `open` is not the length the footer declares
    #[error("ciphertext length mismatch: footer declares {expected}, got {actual}")]
    LengthMismatch {
        /// Length declared by the footer
        expected: u64,
        /// Length of the supplied ciphertext
        actual: u64,
    },

    /// An empty payload cannot be sealed (it would never open)
    #[error("refusing to seal an empty payload")]
    EmptyPayload,

    /// Reading the image failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Random number generation failed
    #[error("random generation failed: {0}")]
    RandomFailed(String),
}
