//! Monitoring policy (command-line arguments or TOML)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration problems that keep the monitor from running at all.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("process name must not be empty")]
    EmptyName,
    #[error("maximum lifetime must be greater than zero minutes")]
    ZeroLifetime,
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
    #[error("failed to read policy file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse policy file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Immutable policy for one monitoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Name of the process to watch, matched case-insensitively.
    pub process_name: String,
    /// Minutes a matching process may run before it becomes eligible.
    pub max_lifetime_minutes: u64,
    /// Milliseconds between scan cycles.
    pub poll_interval_millis: u64,
}

impl Policy {
    /// Build a policy from the minute-based command-line arguments.
    pub fn from_minutes(
        process_name: String,
        max_lifetime_minutes: u64,
        poll_frequency_minutes: u64,
    ) -> Self {
        Self {
            process_name,
            max_lifetime_minutes,
            poll_interval_millis: poll_frequency_minutes.saturating_mul(60_000),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }

    /// The name must be non-empty and both numeric fields strictly positive.
    /// Zero values parse fine on the command line but are refused here, so
    /// they never reach the loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process_name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.max_lifetime_minutes == 0 {
            return Err(ConfigError::ZeroLifetime);
        }
        if self.poll_interval_millis == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
