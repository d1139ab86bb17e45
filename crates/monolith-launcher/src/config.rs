//! Launcher configuration.
//!
//! Everything is taken from the environment once, at start. Resolution goes
//! through a lookup function so tests never touch the process environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

/// Overrides the backend executable
pub const BACKEND_BIN_ENV: &str = "RAG_SERVER_BIN";
/// Overrides the frontend executable
pub const FRONTEND_BIN_ENV: &str = "TS_SERVER_BIN";
/// Backend listen port
pub const PORT_ENV: &str = "RAG_SERVER_PORT";

/// Application root handed to both children
pub const APP_ROOT_ENV: &str = "APP_ROOT";
/// Backend cache directory handed to both children
pub const CACHE_DIR_ENV: &str = "RAG_CACHE_DIR";
/// Backend base URL handed to both children
pub const BACKEND_URL_ENV: &str = "RAG_SERVER_URL";

/// Backend executable name next to the launcher
pub const DEFAULT_BACKEND_BIN: &str = "rag-cpp-server";
/// Frontend executable name next to the launcher
pub const DEFAULT_FRONTEND_BIN: &str = "ts-server";
/// Cache directory name under the application root
pub const CACHE_DIR_NAME: &str = "rag_cache";

/// Resolved launcher configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Launcher directory; working directory of both children
    pub base_dir: PathBuf,
    /// Backend executable
    pub backend_bin: PathBuf,
    /// Frontend executable
    pub frontend_bin: PathBuf,
    /// Backend listen port
    pub port: u16,
    /// Delay between starting the backend and the frontend
    pub stagger: Duration,
}

// Default values

/// Default backend listen port
#[must_use]
pub fn default_port() -> u16 {
    8088
}

/// Default backend-to-frontend stagger
#[must_use]
pub fn default_stagger() -> Duration {
    Duration::from_secs(1)
}

fn default_backend_bin(base_dir: &Path) -> PathBuf {
    base_dir.join(DEFAULT_BACKEND_BIN)
}

fn default_frontend_bin(base_dir: &Path) -> PathBuf {
    base_dir.join(DEFAULT_FRONTEND_BIN)
}

impl LauncherConfig {
    /// Resolve from the process environment, relative to the directory of
    /// the running executable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(executable_dir(), |name| std::env::var(name).ok())
    }

    /// Resolve with `lookup` standing in for the environment.
    ///
    /// Empty values count as unset. Relative executable overrides are taken
    /// relative to `base_dir`, never searched for on `PATH`.
    pub fn from_lookup<F>(base_dir: PathBuf, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let backend_bin = get(BACKEND_BIN_ENV)
            .map_or_else(|| default_backend_bin(&base_dir), |v| base_dir.join(v));
        let frontend_bin = get(FRONTEND_BIN_ENV)
            .map_or_else(|| default_frontend_bin(&base_dir), |v| base_dir.join(v));
        let port = get(PORT_ENV).map_or_else(default_port, |v| parse_port(&v));

        Self {
            base_dir,
            backend_bin,
            frontend_bin,
            port,
            stagger: default_stagger(),
        }
    }

    /// Application root
    #[must_use]
    pub fn app_root(&self) -> &Path {
        &self.base_dir
    }

    /// Backend cache directory
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join(CACHE_DIR_NAME)
    }

    /// Base URL the frontend uses to reach the backend
    #[must_use]
    pub fn backend_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Variables set for both children on top of the inherited environment.
    ///
    /// The resolved port is exported too, so a backend started after a port
    /// fallback listens where the URL points.
    #[must_use]
    pub fn overlay(&self) -> Vec<(&'static str, OsString)> {
        vec![
            (APP_ROOT_ENV, self.app_root().as_os_str().to_owned()),
            (CACHE_DIR_ENV, self.cache_dir().into_os_string()),
            (BACKEND_URL_ENV, self.backend_url().into()),
            (PORT_ENV, self.port.to_string().into()),
        ]
    }
}

/// Parse a port, falling back to [`default_port`] for anything that is not
/// a nonzero `u16`.
fn parse_port(value: &str) -> u16 {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => {
            warn!(
                value,
                fallback = default_port(),
                "invalid {PORT_ENV}, using default port"
            );
            default_port()
        }
    }
}

/// Directory of the running executable, or the working directory if it
/// cannot be resolved.
fn executable_dir() -> PathBuf {
    match std::env::current_exe() {
        Ok(exe) => {
            if let Some(dir) = exe.parent() {
                return dir.to_path_buf();
            }
            warn!(path = %exe.display(), "executable has no parent directory");
        }
        Err(e) => warn!(error = %e, "cannot resolve own executable"),
    }

    std::env::current_dir().unwrap_or_else(|e| {
        warn!(error = %e, "cannot resolve working directory");
        PathBuf::from(".")
    })
}
