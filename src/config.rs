use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File looked up in the working directory when no explicit path is given.
pub const CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Dashboard settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// CSV with the CCEE consumption records.
    pub data_path: PathBuf,
    /// `env_logger` filter directives, e.g. `"info"` or `"ccee_dashboard=debug"`.
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data").join("CCEE_BR_Data.csv"),
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
