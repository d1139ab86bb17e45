//! Sealing and opening payloads.
//!
//! [`seal`] produces the trailer a host image carries (`ciphertext || footer`).
//! [`open`] is its inverse and always verifies the tag before a single byte
//! is decrypted; a payload that fails authentication is never returned,
//! not even partially.
//!
//! ## Usage
//!
//! ```rust
//! use monolith_payload::{PayloadKey, open_image, seal};
//!
//! let key = PayloadKey::builtin();
//! let mut image = b"host executable".to_vec();
//! image.extend(seal(b"archive bytes", &key, [7u8; 16]).expect("seal failed"));
//!
//! let plaintext = open_image(&image, &key).expect("open failed");
//! assert_eq!(plaintext, b"archive bytes");
//! ```

use crate::auth::{compute_tag, verify_tag};
use crate::cipher::apply_keystream;
use crate::error::PayloadError;
use crate::footer::{FOOTER_SIZE, Footer, Nonce};
use crate::key::PayloadKey;
use crate::random::random_nonce;

/// Encrypt `plaintext` and append its footer.
///
/// # Errors
///
/// Returns [`PayloadError::EmptyPayload`] for an empty plaintext: the footer
/// format reserves a zero length as invalid, so the result could never open.
pub fn seal(plaintext: &[u8], key: &PayloadKey, nonce: Nonce) -> Result<Vec<u8>, PayloadError> {
    if plaintext.is_empty() {
        return Err(PayloadError::EmptyPayload);
    }

    let mut sealed = Vec::with_capacity(plaintext.len() + FOOTER_SIZE);
    sealed.extend_from_slice(plaintext);
    apply_keystream(key, &nonce, &mut sealed);

    let tag = compute_tag(key, &nonce, &sealed);
    let footer = Footer::new(plaintext.len() as u64, nonce, tag);
    sealed.extend_from_slice(&footer.to_bytes());

    Ok(sealed)
}

/// Seal with a fresh nonce from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`PayloadError::RandomFailed`] if no nonce can be generated, or
/// [`PayloadError::EmptyPayload`] for an empty plaintext.
pub fn seal_with_random_nonce(plaintext: &[u8], key: &PayloadKey) -> Result<Vec<u8>, PayloadError> {
    seal(plaintext, key, random_nonce()?)
}

/// Verify, then decrypt, the ciphertext described by `footer`.
///
/// Decryption happens in place in the supplied buffer.
///
/// # Errors
///
/// - [`PayloadError::LengthMismatch`] if `ciphertext` is not the declared length
/// - [`PayloadError::Authentication`] if the tag does not match
pub fn open(
    footer: &Footer,
    mut ciphertext: Vec<u8>,
    key: &PayloadKey,
) -> Result<Vec<u8>, PayloadError> {
    if ciphertext.len() as u64 != footer.payload_size() {
        return Err(PayloadError::LengthMismatch {
            expected: footer.payload_size(),
            actual: ciphertext.len() as u64,
        });
    }

    verify_tag(key, footer.nonce(), &ciphertext, footer.auth_tag())?;
    apply_keystream(key, footer.nonce(), &mut ciphertext);

    Ok(ciphertext)
}

/// Parse, verify and decrypt the payload of an in-memory image.
///
/// # Errors
///
/// Returns [`PayloadError::Format`] before any cryptographic work if the
/// footer is structurally invalid, otherwise the errors of [`open`].
pub fn open_image(image: &[u8], key: &PayloadKey) -> Result<Vec<u8>, PayloadError> {
    let footer = Footer::from_image(image)?;
    let range = footer.payload_range(image.len() as u64);

    // Bounds were validated against image.len(), so they fit in usize
    let ciphertext = image[range.start as usize..range.end as usize].to_vec();
    open(&footer, ciphertext, key)
}
