//! Configuration loading for the landlord TUI.
//!
//! All fields are required. No defaults.

use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "LANDLORD_TUI_CONFIG";
pub const API_BASE_URL_ENV: &str = "LANDLORD_API_BASE_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    /// Page size the server paginates with.
    pub page_size: usize,
    /// Pages moved by a single jump in the listing.
    pub page_step: usize,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or LANDLORD_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let mut config = Self::from_path(&path)?;
        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            config.api_base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: TuiConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if let Err(err) = Url::parse(self.api_base_url.trim()) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: err.to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_size",
                reason: "must be > 0".to_string(),
            });
        }
        if self.page_step == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_step",
                reason: "must be > 0".to_string(),
            });
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "persistence_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_filter",
                reason: "must not be empty".to_string(),
            });
        }
        if self.theme.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.theme.name.to_ascii_lowercase() != "ledger" {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "only 'ledger' is supported".to_string(),
            });
        }
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    arg_value("--config").map(PathBuf::from)
}

/// Value following `flag` on the command line, if present.
pub fn arg_value(flag: &str) -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == flag {
            return args.next();
        }
    }
    None
}
