//! # Monolith Launcher
//!
//! Stage two of the Monolith bootstrap: the extracted `huaweicloudai`
//! executable. It runs the retrieval backend and the application frontend
//! side by side and treats them as one unit.
//!
//! - The backend starts first; the frontend follows after a fixed stagger.
//! - Both children get `APP_ROOT`, `RAG_CACHE_DIR` and `RAG_SERVER_URL`.
//! - The first child to exit takes the other down with it, and its exit
//!   code becomes the launcher's.
//! - `SIGINT`/`SIGTERM` stop both children and exit 0.
//!
//! ## Usage
//!
//! ```no_run
//! use monolith_launcher::{LauncherConfig, ShutdownSignals, Supervisor};
//!
//! # async fn run() -> Result<(), monolith_launcher::SupervisorError> {
//! let mut signals = ShutdownSignals::register()?;
//! let mut supervisor = Supervisor::new(LauncherConfig::from_env());
//! let outcome = supervisor
//!     .run(async move {
//!         signals.recv().await;
//!     })
//!     .await?;
//! std::process::exit(i32::from(outcome.exit_code()));
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod process;
pub mod signal;
pub mod supervisor;

pub use config::LauncherConfig;
pub use error::SupervisorError;
pub use process::{ProcessRecord, Role};
pub use signal::ShutdownSignals;
pub use supervisor::{Outcome, State, Supervisor};
