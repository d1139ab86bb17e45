//! Supervised child processes.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::SupervisorError;

/// Role of a supervised child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Retrieval server, started first
    Backend,
    /// Application server, started after the stagger
    Frontend,
}

impl Role {
    /// Lowercase name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Frontend => "frontend",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A running (or reaped) child and what it was started with.
///
/// The child is reaped at most once. After that the recorded status is
/// returned and the process is never signaled again, since its pid may
/// already belong to someone else.
#[derive(Debug)]
pub struct ProcessRecord {
    role: Role,
    path: PathBuf,
    pid: u32,
    overlay: Vec<(&'static str, OsString)>,
    child: Child,
    status: Option<ExitStatus>,
}

impl ProcessRecord {
    /// Start `path` with no arguments in `cwd`.
    ///
    /// The child inherits stdio and the environment, plus `overlay`.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Spawn`] if the process cannot be started.
    pub fn spawn(
        role: Role,
        path: &Path,
        overlay: &[(&'static str, OsString)],
        cwd: &Path,
    ) -> Result<Self, SupervisorError> {
        let spawn_error = |source| SupervisorError::Spawn {
            role,
            path: path.to_path_buf(),
            source,
        };

        let mut cmd = Command::new(path);
        cmd.current_dir(cwd)
            .envs(overlay.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false);

        let child = cmd.spawn().map_err(spawn_error)?;
        let pid = child
            .id()
            .ok_or_else(|| spawn_error(io::Error::other("child exited before its pid was read")))?;

        info!(role = %role, pid, path = %path.display(), "child started");

        Ok(Self {
            role,
            path: path.to_path_buf(),
            pid,
            overlay: overlay.to_vec(),
            child,
            status: None,
        })
    }

    /// Wait for the child to exit.
    ///
    /// Cancel safe; once reaped, the recorded status is returned again.
    ///
    /// # Errors
    ///
    /// Returns the OS error if waiting fails.
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.status {
            return Ok(status);
        }

        let status = self.child.wait().await?;
        self.record(status);
        Ok(status)
    }

    /// Ask the child to stop with `SIGTERM`, then wait for it.
    ///
    /// A child that already exited is reaped without being signaled.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the child cannot be signaled or waited on.
    pub async fn terminate(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.status {
            return Ok(status);
        }
        if let Some(status) = self.child.try_wait()? {
            self.record(status);
            return Ok(status);
        }

        debug!(role = %self.role, pid = self.pid, "sending SIGTERM");
        self.send_sigterm()?;
        self.wait().await
    }

    #[cfg(unix)]
    fn send_sigterm(&self) -> io::Result<()> {
        let pid = libc::pid_t::try_from(self.pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

        // SAFETY: kill(2) has no memory-safety preconditions. The child has
        // not been reaped yet, so the pid still refers to it.
        #[allow(unsafe_code)]
        let ret = unsafe { libc::kill(pid, libc::SIGTERM) };
        if ret == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(unix))]
    fn send_sigterm(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }

    fn record(&mut self, status: ExitStatus) {
        info!(role = %self.role, pid = self.pid, %status, "child exited");
        self.status = Some(status);
    }

    /// Role of this child
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// OS process id
    #[must_use]
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Executable the child was started from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Variables added to the child's environment
    #[must_use]
    pub fn overlay(&self) -> &[(&'static str, OsString)] {
        &self.overlay
    }

    /// Exit status, once reaped
    #[must_use]
    pub fn status(&self) -> Option<ExitStatus> {
        self.status
    }
}
