//! Footer parsing and encoding.
//!
//! The footer is the fixed-size trailer at the very end of a Monolith image.
//! All multi-byte integers are little-endian.
//!
//! ```text
//! offset  size  field
//!      0     8  payload_size   length of the ciphertext in front of the footer
//!      8    16  nonce          per-build randomness, not secret
//!     24    16  auth_tag       expected tag over the ciphertext
//!     40     8  magic          6a c1 53 8f 2d b7 44 e9
//! ```
//!
//! Validation is purely structural. A footer that passes [`Footer::parse`]
//! still has to pass tag verification before its payload is trusted.

use std::io::{Read, Seek, SeekFrom};
use std::ops::Range;

use crate::error::{FormatError, PayloadError};

/// Footer size in bytes
pub const FOOTER_SIZE: usize = 48;

/// Nonce size in bytes
pub const NONCE_SIZE: usize = 16;

/// Authentication tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Magic constant identifying a valid footer
pub const MAGIC: [u8; 8] = [0x6a, 0xc1, 0x53, 0x8f, 0x2d, 0xb7, 0x44, 0xe9];

/// Per-build nonce
pub type Nonce = [u8; NONCE_SIZE];

/// Authentication tag
pub type AuthTag = [u8; TAG_SIZE];

const SIZE_OFFSET: usize = 0;
const NONCE_OFFSET: usize = 8;
const TAG_OFFSET: usize = 24;
const MAGIC_OFFSET: usize = 40;

/// Parsed footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    payload_size: u64,
    nonce: Nonce,
    auth_tag: AuthTag,
}

impl Footer {
    /// Create a footer from its fields.
    #[must_use]
    pub fn new(payload_size: u64, nonce: Nonce, auth_tag: AuthTag) -> Self {
        Self {
            payload_size,
            nonce,
            auth_tag,
        }
    }

    /// Parse and validate the trailing 48 bytes of an image of `image_len` bytes.
    ///
    /// # Errors
    ///
    /// - [`FormatError::TooShort`] if `image_len` cannot hold a footer
    /// - [`FormatError::BadMagic`] if the magic field mismatches
    /// - [`FormatError::InvalidPayloadSize`] if the declared length is zero or
    ///   larger than the bytes in front of the footer
    pub fn parse(bytes: &[u8; FOOTER_SIZE], image_len: u64) -> Result<Self, FormatError> {
        let available = image_len
            .checked_sub(FOOTER_SIZE as u64)
            .ok_or(FormatError::TooShort {
                expected: FOOTER_SIZE as u64,
                actual: image_len,
            })?;

        if bytes[MAGIC_OFFSET..] != MAGIC {
            return Err(FormatError::BadMagic);
        }

        let mut size = [0u8; 8];
        size.copy_from_slice(&bytes[SIZE_OFFSET..NONCE_OFFSET]);
        let payload_size = u64::from_le_bytes(size);

        if payload_size == 0 || payload_size > available {
            return Err(FormatError::InvalidPayloadSize {
                declared: payload_size,
                available,
            });
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[NONCE_OFFSET..TAG_OFFSET]);

        let mut auth_tag = [0u8; TAG_SIZE];
        auth_tag.copy_from_slice(&bytes[TAG_OFFSET..MAGIC_OFFSET]);

        Ok(Self {
            payload_size,
            nonce,
            auth_tag,
        })
    }

    /// Parse the footer of an in-memory image.
    ///
    /// # Errors
    ///
    /// Same as [`Footer::parse`].
    pub fn from_image(image: &[u8]) -> Result<Self, FormatError> {
        let image_len = image.len() as u64;
        let start = image
            .len()
            .checked_sub(FOOTER_SIZE)
            .ok_or(FormatError::TooShort {
                expected: FOOTER_SIZE as u64,
                actual: image_len,
            })?;

        let mut bytes = [0u8; FOOTER_SIZE];
        bytes.copy_from_slice(&image[start..]);
        Self::parse(&bytes, image_len)
    }

    /// Read and validate the footer from the end of a seekable image.
    ///
    /// Returns the footer together with the total image length.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Format`] for structural violations and
    /// [`PayloadError::Io`] if the image cannot be read.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<(Self, u64), PayloadError> {
        let image_len = reader.seek(SeekFrom::End(0))?;
        if image_len < FOOTER_SIZE as u64 {
            return Err(FormatError::TooShort {
                expected: FOOTER_SIZE as u64,
                actual: image_len,
            }
            .into());
        }

        reader.seek(SeekFrom::Start(image_len - FOOTER_SIZE as u64))?;
        let mut bytes = [0u8; FOOTER_SIZE];
        reader.read_exact(&mut bytes)?;

        let footer = Self::parse(&bytes, image_len)?;
        Ok((footer, image_len))
    }

    /// Read exactly the ciphertext region this footer describes.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Io`] if the region cannot be read, or
    /// [`PayloadError::Format`] if the declared length does not fit in memory
    /// on this target.
    pub fn read_ciphertext<R: Read + Seek>(
        &self,
        reader: &mut R,
        image_len: u64,
    ) -> Result<Vec<u8>, PayloadError> {
        let range = self.payload_range(image_len);
        let len = usize::try_from(self.payload_size).map_err(|_| {
            FormatError::InvalidPayloadSize {
                declared: self.payload_size,
                available: image_len.saturating_sub(FOOTER_SIZE as u64),
            }
        })?;

        reader.seek(SeekFrom::Start(range.start))?;
        let mut ciphertext = vec![0u8; len];
        reader.read_exact(&mut ciphertext)?;
        Ok(ciphertext)
    }

    /// Encode the footer to its on-disk form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; FOOTER_SIZE] {
        let mut bytes = [0u8; FOOTER_SIZE];
        bytes[SIZE_OFFSET..NONCE_OFFSET].copy_from_slice(&self.payload_size.to_le_bytes());
        bytes[NONCE_OFFSET..TAG_OFFSET].copy_from_slice(&self.nonce);
        bytes[TAG_OFFSET..MAGIC_OFFSET].copy_from_slice(&self.auth_tag);
        bytes[MAGIC_OFFSET..].copy_from_slice(&MAGIC);
        bytes
    }

    /// Byte range of the ciphertext within an image of `image_len` bytes.
    ///
    /// Only meaningful for a footer that was validated against the same length.
    #[must_use]
    pub fn payload_range(&self, image_len: u64) -> Range<u64> {
        let end = image_len.saturating_sub(FOOTER_SIZE as u64);
        end.saturating_sub(self.payload_size)..end
    }

    /// Declared ciphertext length
    #[must_use]
    pub fn payload_size(&self) -> u64 {
        self.payload_size
    }

    /// Per-build nonce
    #[must_use]
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Stored authentication tag
    #[must_use]
    pub fn auth_tag(&self) -> &AuthTag {
        &self.auth_tag
    }
}
