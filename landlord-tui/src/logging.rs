//! File-backed tracing setup.
//!
//! The terminal is owned by the alternate screen while the app runs, so log
//! output goes to `log_path` instead of stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Builds the filter from `RUST_LOG` when set, else from `default_filter`.
pub fn build_filter(default_filter: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_filter).map_err(|err| LoggingError::Filter {
        filter: default_filter.to_string(),
        reason: err.to_string(),
    })
}

pub fn init(path: &Path, default_filter: &str) -> Result<(), LoggingError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| LoggingError::Open {
                path: path.display().to_string(),
                source,
            })?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.display().to_string(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_filter)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| LoggingError::Install(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        assert!(build_filter("landlord_tui=debug,landlord_core=info").is_ok());
    }
}
