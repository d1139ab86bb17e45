//! Nonce generation.
//!
//! All randomness comes from the operating system CSPRNG.

use crate::PayloadError;
use crate::footer::{NONCE_SIZE, Nonce};

/// Fill a buffer with random bytes from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`PayloadError::RandomFailed`] if the underlying OS CSPRNG fails.
pub fn fill_random(buf: &mut [u8]) -> Result<(), PayloadError> {
    getrandom::getrandom(buf).map_err(|e| PayloadError::RandomFailed(e.to_string()))
}

/// Generate a fresh per-build nonce.
///
/// # Errors
///
/// Returns [`PayloadError::RandomFailed`] if the underlying OS CSPRNG fails.
pub fn random_nonce() -> Result<Nonce, PayloadError> {
    let mut nonce = [0u8; NONCE_SIZE];
    fill_random(&mut nonce)?;
    Ok(nonce)
}
