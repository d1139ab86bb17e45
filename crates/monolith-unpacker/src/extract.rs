//! Archive extraction into an ephemeral directory.
//!
//! The decrypted payload is a gzip-compressed tar archive. It is written to
//! `payload.tar.gz` inside a freshly created, uniquely named `0700`
//! directory and expanded there by the system `tar`.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::{ARCHIVE_FILE_NAME, EPHEMERAL_PREFIX, UnpackError};

/// External archive tool
const TAR_PROGRAM: &str = "tar";

/// Per-run extraction directory.
///
/// The directory is removed if this value is dropped, which only happens
/// when the bootstrap fails. A successful handoff replaces the process image
/// before any destructor runs, so the directory outlives this process.
#[derive(Debug)]
pub struct EphemeralDir {
    dir: TempDir,
}

impl EphemeralDir {
    /// Create a new directory under the system temporary root.
    ///
    /// # Errors
    ///
    /// Returns [`UnpackError::Io`] if the directory cannot be created.
    pub fn create() -> Result<Self, UnpackError> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a new directory under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`UnpackError::Io`] if the directory cannot be created.
    pub fn create_in<P: AsRef<Path>>(root: P) -> Result<Self, UnpackError> {
        let dir = tempfile::Builder::new()
            .prefix(EPHEMERAL_PREFIX)
            .tempdir_in(root)?;
        debug!(path = %dir.path().display(), "created ephemeral directory");
        Ok(Self { dir })
    }

    /// Directory path
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Extract `archive` into a new ephemeral directory.
///
/// # Errors
///
/// Returns [`UnpackError::Io`] if the directory or archive file cannot be
/// created, and [`UnpackError::Extraction`] if `tar` cannot be started or
/// reports failure.
pub fn extract(archive: &[u8]) -> Result<EphemeralDir, UnpackError> {
    extract_into(EphemeralDir::create()?, archive)
}

/// Extract `archive` into an existing ephemeral directory.
///
/// # Errors
///
/// Same as [`extract`].
pub fn extract_into(dir: EphemeralDir, archive: &[u8]) -> Result<EphemeralDir, UnpackError> {
    let archive_path = dir.path().join(ARCHIVE_FILE_NAME);
    fs::write(&archive_path, archive)?;

    let status = Command::new(TAR_PROGRAM)
        .arg("-xzf")
        .arg(&archive_path)
        .arg("-C")
        .arg(dir.path())
        .stdin(Stdio::null())
        .status()
        .map_err(|e| UnpackError::Extraction(format!("cannot run {TAR_PROGRAM}: {e}")))?;

    if !status.success() {
        return Err(UnpackError::Extraction(format!(
            "{TAR_PROGRAM} exited with {status}"
        )));
    }

    info!(path = %dir.path().display(), bytes = archive.len(), "payload extracted");
    Ok(dir)
}
