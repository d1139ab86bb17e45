//! Keystream cipher.
//!
//! A splitmix64 generator seeded with `fnv1a64(key || nonce || "v1")` yields
//! eight keystream bytes per step, consumed least-significant byte first.
//! Payload bytes are XORed with the keystream position by position, so the
//! same call encrypts and decrypts.
//!
//! There is no padding and no partial/streaming mode: the whole payload is
//! processed in one buffer, starting at keystream position zero.

use crate::footer::Nonce;
use crate::hash::{FNV1A_OFFSET, SplitMix64, fnv1a64};
use crate::key::PayloadKey;

/// Domain string mixed into the keystream seed
pub const STREAM_DOMAIN: &[u8] = b"v1";

/// Keystream bytes produced per generator step
pub const BLOCK_SIZE: usize = 8;

/// Deterministic keystream for one (key, nonce) pair.
#[derive(Debug, Clone)]
pub struct Keystream {
    generator: SplitMix64,
}

impl Keystream {
    /// Create the keystream for `key` and `nonce`.
    #[must_use]
    pub fn new(key: &PayloadKey, nonce: &Nonce) -> Self {
        let seed = fnv1a64(&[&key.as_bytes()[..], &nonce[..], STREAM_DOMAIN], FNV1A_OFFSET);
        Self {
            generator: SplitMix64::new(seed),
        }
    }

    /// Next eight keystream bytes.
    pub fn next_block(&mut self) -> [u8; BLOCK_SIZE] {
        self.generator.next_u64().to_le_bytes()
    }

    /// XOR the keystream into `buf`.
    ///
    /// Every call starts a fresh block, so a buffer must be processed in a
    /// single call to match [`apply_keystream`].
    pub fn apply(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(BLOCK_SIZE) {
            let block = self.next_block();
            for (byte, mask) in chunk.iter_mut().zip(block) {
                *byte ^= mask;
            }
        }
    }
}

/// Encrypt or decrypt `buf` in place.
pub fn apply_keystream(key: &PayloadKey, nonce: &Nonce, buf: &mut [u8]) {
    Keystream::new(key, nonce).apply(buf);
}
