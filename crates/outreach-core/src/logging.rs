//! Logging init: append to a file under the user's state dir.
//!
//! The terminal UI owns the screen, so there is no stderr fallback; callers
//! decide what to do when the file cannot be opened.

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,outreach_core=debug,outreach=debug";

/// `<state dir>/outreach`, falling back to the local data dir where no state dir exists.
pub fn default_log_dir() -> Result<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("outreach"))
        .ok_or_else(|| anyhow!("Could not determine a directory for logs"))
}

/// Install the global subscriber writing to `<dir>/outreach.log`. Returns the log path.
pub fn init_logging(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let log_file_path = dir.join("outreach.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))?;

    tracing::info!("outreach logging initialized at {}", log_file_path.display());

    Ok(log_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");
        // Another test may already own the global subscriber; the file is created first either way.
        let _ = init_logging(&log_dir);
        assert!(log_dir.join("outreach.log").exists());
    }
}
