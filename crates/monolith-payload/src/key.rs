//! Payload key resolution.
//!
//! The key comes from `HCAI_MONOLITH_KEY` when that variable holds exactly
//! 32 hexadecimal characters (either case). Anything else, including an
//! absent variable, silently resolves to the built-in default key. Startup
//! availability is preferred over refusing to run on a malformed override.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Key size in bytes
pub const KEY_SIZE: usize = 16;

/// Environment variable carrying the key override
pub const KEY_ENV_VAR: &str = "HCAI_MONOLITH_KEY";

/// Built-in default key.
///
/// Shipped inside the image it protects, so it only provides obfuscation.
pub const DEFAULT_KEY: [u8; KEY_SIZE] = [
    0x91, 0x2f, 0xd7, 0x4a, 0x83, 0xbc, 0x55, 0x19, 0xe0, 0x6d, 0x33, 0xfa, 0x08, 0xc4, 0x72, 0xae,
];

/// Where a resolved key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Valid override from the environment
    Environment,
    /// Built-in default (override absent or malformed)
    BuiltIn,
}

/// 16-byte symmetric payload key, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PayloadKey {
    key: [u8; KEY_SIZE],
}

impl PayloadKey {
    /// Create from raw bytes.
    #[must_use]
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// The built-in default key.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(DEFAULT_KEY)
    }

    /// Resolve the key from the process environment.
    #[must_use]
    pub fn resolve() -> (Self, KeySource) {
        let value = std::env::var(KEY_ENV_VAR).ok();
        Self::resolve_from(value.as_deref())
    }

    /// Resolve the key from an optional override value.
    ///
    /// Never fails: a value that is not exactly 32 hex characters yields the
    /// built-in key.
    #[must_use]
    pub fn resolve_from(value: Option<&str>) -> (Self, KeySource) {
        let Some(hex_key) = value else {
            return (Self::builtin(), KeySource::BuiltIn);
        };

        let mut key = [0u8; KEY_SIZE];
        match hex::decode_to_slice(hex_key, &mut key) {
            Ok(()) => (Self::new(key), KeySource::Environment),
            Err(_) => {
                key.zeroize();
                (Self::builtin(), KeySource::BuiltIn)
            }
        }
    }

    /// Get the key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// Whether this is the built-in default key.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.key[..].ct_eq(&DEFAULT_KEY[..]).into()
    }
}

impl fmt::Debug for PayloadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadKey")
            .field("builtin", &self.is_builtin())
            .finish_non_exhaustive()
    }
}
