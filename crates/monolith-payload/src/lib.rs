//! # Monolith Payload
//!
//! The byte-exact format of the encrypted archive a Monolith image carries
//! at the tail of its own executable.
//!
//! This crate provides:
//! - Footer parsing and encoding (48-byte trailer, magic, declared length)
//! - Key resolution (environment override with silent fallback)
//! - Authentication tag computation and constant-time verification
//! - Keystream cipher (self-inverse, position-by-position XOR)
//! - Sealing (producer side) and verify-then-decrypt opening
//!
//! ## Image Layout
//!
//! ```text
//! +-----------------+---------------------------+-------------------+
//! | host executable | ciphertext (payload_size) | footer (48 bytes) |
//! +-----------------+---------------------------+-------------------+
//! ```
//!
//! ## Primitives
//!
//! | Function | Construction |
//! |----------|--------------|
//! | Tag | 2 x FNV-1a 64, domain separated (`auth-v1`, `auth-v2`), distinct seeds |
//! | Keystream | splitmix64 seeded with FNV-1a 64 of key, nonce, `v1` |
//! | Key | 16 bytes, `HCAI_MONOLITH_KEY` override or built-in default |
//!
//! ## Threat Model
//!
//! The default key ships inside the binary it protects. The tag detects
//! accidental corruption and casual tampering; it is not a defense against
//! anyone who can read the binary. The constants are frozen for
//! compatibility with already produced images.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod cipher;
pub mod error;
pub mod footer;
pub mod hash;
pub mod key;
pub mod random;
pub mod seal;

pub use auth::{compute_tag, verify_tag};
pub use cipher::{Keystream, apply_keystream};
pub use error::{FormatError, PayloadError};
pub use footer::{AuthTag, FOOTER_SIZE, Footer, MAGIC, NONCE_SIZE, Nonce, TAG_SIZE};
pub use key::{DEFAULT_KEY, KEY_ENV_VAR, KEY_SIZE, KeySource, PayloadKey};
pub use seal::{open, open_image, seal, seal_with_random_nonce};
