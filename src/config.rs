//! Configuration for swipecheck
//!
//! Reads an optional file from `~/.config/swipecheck/config.json`:
//!
//! ```json
//! {
//!   "base_url": "https://staging.example.com/api",
//!   "timeout_secs": 10,
//!   "actors": {
//!     "alice": { "email": "alice@example.com", "password": "secret", "name": "Alice" }
//!   }
//! }
//! ```
//!
//! Flags beat the `SWIPECHECK_BASE_URL` environment variable, which beats the
//! file, which beats the built-in defaults. The resolved [`HarnessConfig`] is
//! passed explicitly to the runner.

use crate::payload::RegisterRequest;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "SWIPECHECK_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine config directory. HOME environment variable not set.")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid base URL '{0}': expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}

/// Contents of the config file; every field is optional
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Credential overrides by actor name
    #[serde(default)]
    pub actors: BTreeMap<String, RegisterRequest>,
}

impl FileConfig {
    /// Load from `path`, or from the default location when `path` is None
    ///
    /// A missing file at the default location yields defaults; a missing file
    /// that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path()?, false),
        };

        if !explicit && !path.exists() {
            return Ok(FileConfig::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::ParseError { path, source })
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Credential overrides layered over each suite's own actors
    pub actors: BTreeMap<String, RegisterRequest>,
    /// Substituted for `{run}` in actor credentials
    pub run_id: String,
}

impl HarnessConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            actors: BTreeMap::new(),
            run_id: default_run_id(),
        }
    }

    /// Combine flags, environment and file into one config
    pub fn resolve(
        overrides: &Overrides,
        env_base_url: Option<String>,
        file: FileConfig,
    ) -> Result<Self, ConfigError> {
        let base_url = overrides
            .base_url
            .clone()
            .or(env_base_url.filter(|v| !v.trim().is_empty()))
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !crate::payload::is_http_url(&base_url) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }

        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            actors: file.actors,
            run_id: default_run_id(),
        })
    }

    /// Credentials for every actor: suite defaults overlaid by configured ones, `{run}` resolved
    pub fn actor_credentials(
        &self,
        suite_actors: &BTreeMap<String, RegisterRequest>,
    ) -> BTreeMap<String, RegisterRequest> {
        let mut merged = suite_actors.clone();
        for (name, creds) in &self.actors {
            merged.insert(name.clone(), creds.clone());
        }
        merged
            .into_iter()
            .map(|(name, creds)| (name, creds.for_run(&self.run_id)))
            .collect()
    }
}

/// Returns the config file path: `~/.config/swipecheck/config.json`
pub fn config_path() -> Result<PathBuf, ConfigError> {
    // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".config"))
                .unwrap_or_default()
        });

    if config_base.as_os_str().is_empty() {
        return Err(ConfigError::NoConfigDir);
    }

    Ok(config_base.join("swipecheck").join("config.json"))
}

fn default_run_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
        .to_string()
}
