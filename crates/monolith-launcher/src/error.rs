//! Supervisor error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::process::Role;

/// Fatal supervisor errors.
///
/// A child exiting is never an error; it is reported through
/// [`Outcome`](crate::Outcome).
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A child could not be started
    #[error("failed to start {role} ({}): {source}", path.display())]
    Spawn {
        /// Role of the child that failed
        role: Role,
        /// Executable that was tried
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Termination signal listeners could not be installed
    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),
}
