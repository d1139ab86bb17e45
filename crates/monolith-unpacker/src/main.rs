//! Monolith self-extracting entry point
//!
//! Verifies and unpacks the payload appended to this executable, then
//! replaces itself with the extracted launcher.

use anyhow::Context;
use monolith_payload::{KeySource, PayloadKey};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Quiet by default; a normal start prints nothing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (key, source) = PayloadKey::resolve();
    if source == KeySource::BuiltIn {
        tracing::debug!("using built-in payload key");
    }

    match monolith_unpacker::bootstrap(&key).context("monolith startup error")? {}
}
