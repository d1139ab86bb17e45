//! Monolith launcher entry point
//!
//! Supervises the backend and frontend servers shipped in the same
//! directory as this executable.

use std::process::ExitCode;

use anyhow::Context;
use monolith_launcher::{LauncherConfig, Outcome, ShutdownSignals, Supervisor};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(outcome) => {
            info!(?outcome, code = outcome.exit_code(), "supervised unit finished");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<Outcome> {
    // Listen before anything is started so no signal is missed
    let mut signals = ShutdownSignals::register().context("launcher startup error")?;

    let mut supervisor = Supervisor::new(LauncherConfig::from_env());
    let outcome = supervisor
        .run(async move {
            let signal = signals.recv().await;
            info!(signal, "termination signal received");
        })
        .await
        .context("launcher startup error")?;

    Ok(outcome)
}
