//! Reading the sealed payload out of an executable image.

use std::fs::File;
use std::path::{Path, PathBuf};

use monolith_payload::{Footer, PayloadKey};
use tracing::debug;

use crate::UnpackError;

/// Footer and ciphertext read from an image, not yet authenticated.
#[derive(Debug)]
pub struct SealedImage {
    path: PathBuf,
    footer: Footer,
    ciphertext: Vec<u8>,
}

impl SealedImage {
    /// Read and structurally validate the trailer of the image at `path`.
    ///
    /// Only the footer and the ciphertext region are read. A structurally
    /// invalid footer is rejected before the ciphertext is touched.
    ///
    /// # Errors
    ///
    /// Returns [`UnpackError::Format`] for footer violations and
    /// [`UnpackError::Io`] if the image cannot be read.
    pub fn load(path: &Path) -> Result<Self, UnpackError> {
        let mut file = File::open(path)?;
        let (footer, image_len) = Footer::read_from(&mut file)?;

        debug!(
            path = %path.display(),
            image_len,
            payload_size = footer.payload_size(),
            "footer validated"
        );

        let ciphertext = footer.read_ciphertext(&mut file, image_len)?;

        Ok(Self {
            path: path.to_path_buf(),
            footer,
            ciphertext,
        })
    }

    /// Authenticate, then decrypt, the payload.
    ///
    /// # Errors
    ///
    /// Returns [`UnpackError::Authentication`] if the stored tag does not
    /// match; nothing is decrypted in that case.
    pub fn unseal(self, key: &PayloadKey) -> Result<Vec<u8>, UnpackError> {
        let plaintext = monolith_payload::open(&self.footer, self.ciphertext, key)?;
        debug!(path = %self.path.display(), bytes = plaintext.len(), "payload decrypted");
        Ok(plaintext)
    }

    /// Path the image was read from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validated footer
    #[must_use]
    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    /// Raw ciphertext
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monolith_payload::{FormatError, MAGIC, seal};
    use proptest::prelude::*;
    use std::io::Write;

    fn write_image(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    fn sealed_image(plaintext: &[u8], key: &PayloadKey) -> Vec<u8> {
        let mut image = b"\x7fELF host executable".to_vec();
        image.extend(seal(plaintext, key, [0x33; 16]).unwrap());
        image
    }

    #[test]
    fn test_load_and_unseal() {
        let key = PayloadKey::builtin();
        let file = write_image(&sealed_image(b"archive", &key));

        let image = SealedImage::load(file.path()).unwrap();
        assert_eq!(image.footer().payload_size(), 7);
        assert_eq!(image.ciphertext().len(), 7);
        assert_eq!(image.unseal(&key).unwrap(), b"archive");
    }

    #[test]
    fn test_short_image_is_format_error() {
        let file = write_image(&[0u8; 47]);

        assert!(matches!(
            SealedImage::load(file.path()),
            Err(UnpackError::Format(FormatError::TooShort { actual: 47, .. }))
        ));
    }

    #[test]
    fn test_plain_executable_is_format_error() {
        // An image that never had a payload appended
        let file = write_image(&[0x90u8; 4096]);

        assert!(matches!(
            SealedImage::load(file.path()),
            Err(UnpackError::Format(FormatError::BadMagic))
        ));
    }

    #[test]
    fn test_declared_length_beyond_image() {
        let mut footer = [0u8; 48];
        footer[..8].copy_from_slice(&1000u64.to_le_bytes());
        footer[40..].copy_from_slice(&MAGIC);
        let mut bytes = vec![0u8; 100];
        bytes.extend_from_slice(&footer);
        let file = write_image(&bytes);

        assert!(matches!(
            SealedImage::load(file.path()),
            Err(UnpackError::Format(FormatError::InvalidPayloadSize {
                declared: 1000,
                available: 100
            }))
        ));
    }

    #[test]
    fn test_tampered_payload_is_authentication_error() {
        let key = PayloadKey::builtin();
        let mut bytes = sealed_image(b"archive", &key);
        let last_payload_byte = bytes.len() - 49;
        bytes[last_payload_byte] ^= 0x10;
        let file = write_image(&bytes);

        let image = SealedImage::load(file.path()).unwrap();
        assert!(matches!(
            image.unseal(&key),
            Err(UnpackError::Authentication)
        ));
    }

    #[test]
    fn test_missing_image_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SealedImage::load(&dir.path().join("absent"));

        assert!(matches!(result, Err(UnpackError::Io(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_arbitrary_image_never_unseals(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let file = write_image(&bytes);
            let result = SealedImage::load(file.path())
                .and_then(|image| image.unseal(&PayloadKey::builtin()));

            prop_assert!(result.is_err());
        }
    }
}
