//! Handoff to the extracted launcher.
//!
//! On Unix the unpacker replaces its own process image with the launcher
//! (`execve`), so the launcher inherits the process id, stdio and signal
//! disposition of the original invocation. Other platforms have no
//! equivalent primitive and fail the handoff explicitly.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{APP_ROOT_ENV, INNER_EXECUTABLE, UnpackError};

/// Locate the inner executable at the root of the extracted archive.
///
/// # Errors
///
/// Returns [`UnpackError::Handoff`] if it is missing.
pub fn locate_inner(app_root: &Path) -> Result<PathBuf, UnpackError> {
    let inner = app_root.join(INNER_EXECUTABLE);
    if inner.is_file() {
        Ok(inner)
    } else {
        Err(UnpackError::Handoff(format!(
            "extracted launcher not found at {}",
            inner.display()
        )))
    }
}

/// Replace the current process with `inner`, exporting `APP_ROOT=app_root`.
///
/// Never returns on success.
///
/// # Errors
///
/// Returns [`UnpackError::Handoff`] if the new image cannot be started.
#[cfg(unix)]
pub fn handoff(inner: &Path, app_root: &Path) -> Result<Infallible, UnpackError> {
    use std::os::unix::process::CommandExt;
    use std::process::Command;

    info!(
        launcher = %inner.display(),
        app_root = %app_root.display(),
        "handing off to extracted launcher"
    );

    let err = Command::new(inner).env(APP_ROOT_ENV, app_root).exec();

    Err(UnpackError::Handoff(format!(
        "cannot exec {}: {err}",
        inner.display()
    )))
}

/// Process replacement is not available on this platform.
///
/// # Errors
///
/// Always returns [`UnpackError::Handoff`].
#[cfg(not(unix))]
pub fn handoff(inner: &Path, _app_root: &Path) -> Result<Infallible, UnpackError> {
    Err(UnpackError::Handoff(format!(
        "cannot hand off to {}: process replacement is not supported on this platform",
        inner.display()
    )))
}
