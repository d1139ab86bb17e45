//! Termination signal delivery.
//!
//! Signals are turned into an awaitable event on the main loop. Nothing
//! runs in signal context; all signaling and reaping of children happens in
//! the supervisor once [`ShutdownSignals::recv`] resolves.

use crate::SupervisorError;

/// Listeners for `SIGINT` and `SIGTERM`.
///
/// Register before starting any child so that a signal arriving during
/// startup is not lost.
#[cfg(unix)]
#[derive(Debug)]
pub struct ShutdownSignals {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    /// Install the listeners. Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Signal`] if a listener cannot be installed.
    pub fn register() -> Result<Self, SupervisorError> {
        use tokio::signal::unix::{SignalKind, signal};

        let sigterm = signal(SignalKind::terminate()).map_err(SupervisorError::Signal)?;
        let sigint = signal(SignalKind::interrupt()).map_err(SupervisorError::Signal)?;
        Ok(Self { sigterm, sigint })
    }

    /// Wait for the next termination signal and return its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }
}

/// Listener for Ctrl-C.
#[cfg(not(unix))]
#[derive(Debug)]
pub struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    /// Nothing to install ahead of time on this platform.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn register() -> Result<Self, SupervisorError> {
        Ok(Self)
    }

    /// Wait for Ctrl-C.
    pub async fn recv(&mut self) -> &'static str {
        // A listener that cannot be installed never fires
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        "CTRL_C"
    }
}
