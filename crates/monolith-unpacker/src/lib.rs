//! # Monolith Unpacker
//!
//! Stage one of the Monolith bootstrap. Runs once per invocation, strictly
//! in order, with no retries:
//!
//! 1. Resolve the path of the running executable
//! 2. Read and validate the 48-byte footer at its tail
//! 3. Resolve the payload key
//! 4. Verify the authentication tag over the ciphertext
//! 5. Decrypt the payload
//! 6. Expand the archive into a fresh ephemeral directory
//! 7. Replace this process with the extracted launcher
//!
//! Any failure aborts the whole bootstrap. A payload that fails
//! authentication is never decrypted, written or extracted.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod extract;
pub mod handoff;
pub mod image;
pub mod locate;

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use monolith_payload::PayloadKey;

pub use error::UnpackError;
pub use extract::{EphemeralDir, extract, extract_into};
pub use handoff::{handoff, locate_inner};
pub use image::SealedImage;
pub use locate::locate_self;

/// Name of the executable at the archive root that receives the handoff
pub const INNER_EXECUTABLE: &str = "huaweicloudai";

/// Name prefix of the per-run extraction directory
pub const EPHEMERAL_PREFIX: &str = "huaweicloudai-monolith-";

/// File the decrypted archive is written to before expansion
pub const ARCHIVE_FILE_NAME: &str = "payload.tar.gz";

/// Variable pointing the launcher at the extraction directory
pub const APP_ROOT_ENV: &str = "APP_ROOT";

/// A verified, extracted payload ready for handoff.
#[derive(Debug)]
pub struct Unpacked {
    /// Extraction directory (becomes `APP_ROOT`)
    pub dir: EphemeralDir,
    /// Inner executable inside `dir`
    pub launcher: PathBuf,
}

/// Steps 2 to 6 for the image at `image_path`, plus locating the launcher.
///
/// # Errors
///
/// Returns the first error of the pipeline; see [`UnpackError`].
pub fn unpack(image_path: &Path, key: &PayloadKey) -> Result<Unpacked, UnpackError> {
    unpack_in(image_path, key, EphemeralDir::create)
}

/// Like [`unpack`], extracting into a directory created by `make_dir`.
///
/// The directory is only created once the payload has been authenticated
/// and decrypted.
///
/// # Errors
///
/// Returns the first error of the pipeline; see [`UnpackError`].
pub fn unpack_in<F>(image_path: &Path, key: &PayloadKey, make_dir: F) -> Result<Unpacked, UnpackError>
where
    F: FnOnce() -> Result<EphemeralDir, UnpackError>,
{
    let image = SealedImage::load(image_path)?;
    let archive = image.unseal(key)?;
    let dir = extract_into(make_dir()?, &archive)?;
    let launcher = locate_inner(dir.path())?;

    Ok(Unpacked { dir, launcher })
}

/// Run the full bootstrap for the current process.
///
/// Does not return on success.
///
/// # Errors
///
/// Returns the first error of the pipeline; see [`UnpackError`].
pub fn bootstrap(key: &PayloadKey) -> Result<Infallible, UnpackError> {
    let image_path = locate_self()?;
    let unpacked = unpack(&image_path, key)?;
    handoff(&unpacked.launcher, unpacked.dir.path())
}
