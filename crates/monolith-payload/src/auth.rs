//! Payload authentication tag.
//!
//! The 16-byte tag is two independent FNV-1a 64 digests, each over
//! `key || nonce || domain || ciphertext` with its own seed and domain
//! string, concatenated little-endian. Neither half alone determines the tag.

use subtle::ConstantTimeEq;

use crate::PayloadError;
use crate::footer::{AuthTag, Nonce, TAG_SIZE};
use crate::hash::fnv1a64;
use crate::key::PayloadKey;

/// Seed of the first tag half
pub const AUTH_SEED_A: u64 = 0x9f8b_7c6d_5e4f_3021;

/// Seed of the second tag half
pub const AUTH_SEED_B: u64 = 0x1023_4567_89ab_cdef;

/// Domain string of the first tag half
pub const AUTH_DOMAIN_A: &[u8] = b"auth-v1";

/// Domain string of the second tag half
pub const AUTH_DOMAIN_B: &[u8] = b"auth-v2";

/// Compute the expected tag over `ciphertext`.
#[must_use]
pub fn compute_tag(key: &PayloadKey, nonce: &Nonce, ciphertext: &[u8]) -> AuthTag {
    let a = fnv1a64(&[&key.as_bytes()[..], &nonce[..], AUTH_DOMAIN_A, ciphertext], AUTH_SEED_A);
    let b = fnv1a64(&[&key.as_bytes()[..], &nonce[..], AUTH_DOMAIN_B, ciphertext], AUTH_SEED_B);

    let mut tag = [0u8; TAG_SIZE];
    tag[..8].copy_from_slice(&a.to_le_bytes());
    tag[8..].copy_from_slice(&b.to_le_bytes());
    tag
}

/// Recompute the tag and compare it to `stored` in constant time.
///
/// # Errors
///
/// Returns [`PayloadError::Authentication`] on any mismatch.
pub fn verify_tag(
    key: &PayloadKey,
    nonce: &Nonce,
    ciphertext: &[u8],
    stored: &AuthTag,
) -> Result<(), PayloadError> {
    let computed = compute_tag(key, nonce, ciphertext);

    if bool::from(computed[..].ct_eq(&stored[..])) {
        Ok(())
    } else {
        Err(PayloadError::Authentication)
    }
}
