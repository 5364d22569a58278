//! Runtime configuration from `NOTEASK_*` environment variables
//!
//! Persisted user settings (the executable path) live in the settings store;
//! this covers per-run knobs only.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use noteask_core::application::constants::DEFAULT_INVOCATION_TIMEOUT;

/// Per-run settings
///
/// # Environment Variables
///
/// - `NOTEASK_TIMEOUT_SECS`: bound on one request (default: 300)
/// - `NOTEASK_EXTRA_PATH`: extra search-path directories, OS list syntax
/// - `NOTEASK_LOG_FORMAT`: `pretty` (default) or `json`
/// - `NOTEASK_LOG_DIR`: directory for `debug.log`
#[derive(Debug, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub extra_path: Option<String>,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_INVOCATION_TIMEOUT.as_secs()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl RuntimeConfig {
    pub fn load() -> Result<Self> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("NOTEASK").try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .context("Invalid NOTEASK_* environment configuration")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Directories from `NOTEASK_EXTRA_PATH`
    pub fn extra_search_dirs(&self) -> Vec<PathBuf> {
        self.extra_path
            .as_deref()
            .map(|raw| std::env::split_paths(raw).collect())
            .unwrap_or_default()
    }
}
