//! Two-process supervisor.
//!
//! Starts the backend, waits out the stagger, starts the frontend, then
//! races both children against a shutdown request:
//!
//! ```text
//! INIT -> SPAWN_BACKEND -> STAGGER_WAIT -> SPAWN_FRONTEND -> RUNNING
//!                                                               |
//!                              TERMINATED <- SHUTTING_DOWN <----+
//! ```
//!
//! Whichever child exits first ends the unit: the survivor is sent
//! `SIGTERM` and reaped, and the first child's exit code becomes the
//! supervisor's. A shutdown request instead terminates both and exits 0.
//! There is no restart policy.

use std::future::Future;
use std::io;
use std::process::ExitStatus;

use tracing::{debug, error, info, warn};

use crate::config::LauncherConfig;
use crate::process::{ProcessRecord, Role};
use crate::SupervisorError;

/// Supervisor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Configuration resolved, nothing started
    Init,
    /// Starting the backend
    SpawnBackend,
    /// Backend running, frontend not started yet
    StaggerWait,
    /// Starting the frontend
    SpawnFrontend,
    /// Both children running
    Running,
    /// Terminating and reaping children
    ShuttingDown,
    /// Done; no further transitions
    Terminated,
}

/// How a supervised unit ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A child exited on its own first
    ChildExited {
        /// Child that exited
        role: Role,
        /// Its exit code; `None` if it was killed by a signal or its status
        /// could not be read
        code: Option<i32>,
    },
    /// A termination signal was received
    Shutdown,
}

impl Outcome {
    fn from_wait(role: Role, result: io::Result<ExitStatus>) -> Self {
        let code = match result {
            Ok(status) => status.code(),
            Err(e) => {
                warn!(role = %role, error = %e, "cannot read child exit status");
                None
            }
        };
        Self::ChildExited { role, code }
    }

    /// Exit status the supervisor should report.
    ///
    /// A child exit without a readable code in `0..=255` maps to 1.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match *self {
            Self::Shutdown => 0,
            Self::ChildExited { code, .. } => code.and_then(|c| u8::try_from(c).ok()).unwrap_or(1),
        }
    }
}

/// Supervises one backend and one frontend.
#[derive(Debug)]
pub struct Supervisor {
    config: LauncherConfig,
    state: State,
}

impl Supervisor {
    /// Create a supervisor in [`State::Init`].
    #[must_use]
    pub fn new(config: LauncherConfig) -> Self {
        Self {
            config,
            state: State::Init,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Run the unit to completion.
    ///
    /// `shutdown` resolving is treated as a termination signal. It is polled
    /// from the moment the backend is started.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Spawn`] if either child cannot be started.
    /// A frontend spawn failure terminates the backend first.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<Outcome, SupervisorError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let overlay = self.config.overlay();
        info!(
            base_dir = %self.config.base_dir.display(),
            port = self.config.port,
            "starting supervised unit"
        );

        self.transition(State::SpawnBackend);
        let mut backend = match ProcessRecord::spawn(
            Role::Backend,
            &self.config.backend_bin,
            &overlay,
            &self.config.base_dir,
        ) {
            Ok(process) => process,
            Err(e) => {
                error!(error = %e, "backend failed to start");
                self.transition(State::Terminated);
                return Err(e);
            }
        };

        self.transition(State::StaggerWait);
        tokio::select! {
            () = tokio::time::sleep(self.config.stagger) => {}
            result = backend.wait() => {
                warn!("backend exited before the frontend was started");
                let outcome = Outcome::from_wait(Role::Backend, result);
                self.transition(State::Terminated);
                return Ok(outcome);
            }
            () = &mut shutdown => {
                self.transition(State::ShuttingDown);
                reap(&mut backend).await;
                self.transition(State::Terminated);
                return Ok(Outcome::Shutdown);
            }
        }

        self.transition(State::SpawnFrontend);
        let mut frontend = match ProcessRecord::spawn(
            Role::Frontend,
            &self.config.frontend_bin,
            &overlay,
            &self.config.base_dir,
        ) {
            Ok(process) => process,
            Err(e) => {
                error!(error = %e, "frontend failed to start, stopping backend");
                self.transition(State::ShuttingDown);
                reap(&mut backend).await;
                self.transition(State::Terminated);
                return Err(e);
            }
        };

        self.transition(State::Running);
        let outcome = tokio::select! {
            result = frontend.wait() => {
                let outcome = Outcome::from_wait(Role::Frontend, result);
                info!(?outcome, "frontend exited, stopping backend");
                self.transition(State::ShuttingDown);
                reap(&mut backend).await;
                outcome
            }
            result = backend.wait() => {
                let outcome = Outcome::from_wait(Role::Backend, result);
                info!(?outcome, "backend exited, stopping frontend");
                self.transition(State::ShuttingDown);
                reap(&mut frontend).await;
                outcome
            }
            () = &mut shutdown => {
                info!("shutdown requested, stopping both children");
                self.transition(State::ShuttingDown);
                reap(&mut frontend).await;
                reap(&mut backend).await;
                Outcome::Shutdown
            }
        };

        self.transition(State::Terminated);
        Ok(outcome)
    }

    fn transition(&mut self, next: State) {
        debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }
}

/// Terminate and reap `process`, logging instead of failing.
async fn reap(process: &mut ProcessRecord) {
    if let Err(e) = process.terminate().await {
        warn!(
            role = %process.role(),
            pid = process.pid(),
            error = %e,
            "failed to stop child"
        );
    }
}
