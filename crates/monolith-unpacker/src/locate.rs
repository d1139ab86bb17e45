//! Self-location.

use std::path::PathBuf;

use tracing::debug;

use crate::UnpackError;

/// Resolve the absolute path of the running executable image.
///
/// # Errors
///
/// Returns [`UnpackError::SelfLocate`] if the platform cannot report it.
pub fn locate_self() -> Result<PathBuf, UnpackError> {
    let path = std::env::current_exe().map_err(UnpackError::SelfLocate)?;
    debug!(path = %path.display(), "resolved own executable");
    Ok(path)
}
