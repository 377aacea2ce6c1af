use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use manual_engine::{FetchSettings, OrchestratorConfig};
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "manual.ron";
pub const DEFAULT_STORE_FILE: &str = "manual_store.json";

/// Settings read from `manual.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub log_destination: LogDestination,
    pub progress_delay_ms: u64,
    pub harvest_workers: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            log_destination: LogDestination::File,
            progress_delay_ms: 50,
            harvest_workers: 10,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
        }
    }
}

/// Outcome of reading the config file. Warnings are kept until a logger
/// exists to report them.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub warning: Option<String>,
}

impl AppConfig {
    /// A missing file yields defaults silently; an unreadable or invalid one
    /// yields defaults plus a warning.
    pub fn load(path: &Path) -> LoadedConfig {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return LoadedConfig {
                    config: AppConfig::default(),
                    warning: None,
                };
            }
            Err(err) => {
                return LoadedConfig {
                    config: AppConfig::default(),
                    warning: Some(format!("Failed to read config from {:?}: {}", path, err)),
                };
            }
        };

        match ron::from_str(&content) {
            Ok(config) => LoadedConfig {
                config,
                warning: None,
            },
            Err(err) => LoadedConfig {
                config: AppConfig::default(),
                warning: Some(format!("Failed to parse config from {:?}: {}", path, err)),
            },
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            progress_delay: Duration::from_millis(self.progress_delay_ms),
            harvest_workers: self.harvest_workers,
            ..OrchestratorConfig::default()
        }
    }
}
