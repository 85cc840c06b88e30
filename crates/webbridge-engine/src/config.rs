//! Bridge configuration (webbridge.toml)
//!
//! ```toml
//! worker_threads = 4
//! thread_name = "webbridge-worker"
//! snippet_namespace = "__webbridge"
//! ```
//!
//! Every key is optional. `WEBBRIDGE_WORKER_THREADS` overrides
//! `worker_threads` when [`BridgeConfig::with_env_overrides`] is applied.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use webbridge_sdk::DEFAULT_NAMESPACE;

/// Environment variable overriding the worker count
pub const WORKER_THREADS_ENV: &str = "WEBBRIDGE_WORKER_THREADS";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),

    /// Environment override could not be parsed
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name
        var: String,
        /// Rejected value
        value: String,
    },
}

/// Bridge settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Worker pool size; `None` means one per CPU core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_threads: Option<usize>,

    /// Name prefix of worker threads
    pub thread_name: String,

    /// Prefix of the script runtime's global functions
    pub snippet_namespace: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "webbridge-worker".to_string(),
            snippet_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parse a config from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a config from a string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `WEBBRIDGE_WORKER_THREADS` from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(WORKER_THREADS_ENV) {
            let threads = value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnv {
                var: WORKER_THREADS_ENV.to_string(),
                value: value.clone(),
            })?;
            self.worker_threads = Some(threads);
        }
        self.validate()?;
        Ok(self)
    }

    /// Effective worker count
    pub fn effective_worker_threads(&self) -> usize {
        self.worker_threads
            .unwrap_or_else(|| num_cpus::get().max(1))
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == Some(0) {
            return Err(ConfigError::ValidationError(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        if self.thread_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "thread_name cannot be empty".to_string(),
            ));
        }

        // The namespace is spliced into `window.<ns>_notify(...)`
        let mut chars = self.snippet_namespace.chars();
        let valid = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
            }
            _ => false,
        };
        if !valid {
            return Err(ConfigError::ValidationError(format!(
                "snippet_namespace '{}' is not a valid identifier",
                self.snippet_namespace
            )));
        }

        Ok(())
    }
}
