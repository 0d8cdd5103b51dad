//! Configuration management.
//!
//! Settings come from a JSON file and are then overridden by command-line
//! flags. Every field has a default, so a missing file or a partial file is
//! fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tally_engine::PoolConfig;
use tally_fetch::FetchSettings;
use tracing::{debug, info};

use crate::Cli;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Substring to count.
    #[serde(default = "default_target")]
    pub target: String,
    /// Number of concurrent workers.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Capacity of the pool's queues.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Per-subject timeout in seconds; none means no limit.
    #[serde(default)]
    pub task_timeout_secs: Option<u64>,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    /// User agent override for HTTP requests.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_target() -> String {
    "Go".to_string()
}

fn default_workers() -> usize {
    tally_engine::pool::DEFAULT_WORKERS
}

fn default_queue_capacity() -> usize {
    tally_engine::pool::DEFAULT_QUEUE_CAPACITY
}

fn default_http_timeout() -> u64 {
    FetchSettings::default().timeout.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: default_target(),
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            task_timeout_secs: None,
            http_timeout_secs: default_http_timeout(),
            user_agent: None,
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tally")
            .join("config.json")
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Loads the file named by `--config` (or the default one) and applies the flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let path = cli.config.clone().unwrap_or_else(Self::default_path);
        if cli.config.is_some() && !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let mut config = Self::load_from(&path)?;
        config.apply(cli);
        Ok(config)
    }

    /// Overrides file values with any flags that were given.
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(target) = &cli.target {
            self.target.clone_from(target);
        }
        if let Some(workers) = cli.workers {
            self.workers = workers;
        }
        if let Some(secs) = cli.timeout {
            self.task_timeout_secs = Some(secs);
        }
        if let Some(secs) = cli.http_timeout {
            self.http_timeout_secs = secs;
        }
    }

    /// Returns the per-subject timeout, if any.
    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_secs.map(Duration::from_secs)
    }

    /// Builds the worker pool settings.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(&self.target)
            .with_workers(self.workers)
            .with_queue_capacity(self.queue_capacity)
    }

    /// Builds the HTTP and file source settings.
    pub fn fetch_settings(&self) -> FetchSettings {
        let settings =
            FetchSettings::default().with_timeout(Duration::from_secs(self.http_timeout_secs));
        match &self.user_agent {
            Some(agent) => settings.with_user_agent(agent),
            None => settings,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.target, "Go");
        assert_eq!(config.workers, 5);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.http_timeout_secs, 30);
        assert!(config.task_timeout().is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"target": "Rust", "task_timeout_secs": 4}}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.target, "Rust");
        assert_eq!(config.task_timeout(), Some(Duration::from_secs(4)));
        assert_eq!(config.workers, 5);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "workers = 3").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = Config {
            target: "Rust".to_string(),
            workers: 2,
            ..Config::default()
        };
        let cli = Cli {
            workers: Some(9),
            http_timeout: Some(5),
            timeout: Some(1),
            ..Cli::default()
        };

        config.apply(&cli);

        assert_eq!(config.target, "Rust");
        assert_eq!(config.workers, 9);
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.task_timeout_secs, Some(1));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("nope.json")),
            ..Cli::default()
        };

        assert!(Config::resolve(&cli).is_err());
    }

    #[test]
    fn test_derived_settings() {
        let config = Config {
            target: "Go".to_string(),
            workers: 3,
            queue_capacity: 2,
            task_timeout_secs: None,
            http_timeout_secs: 7,
            user_agent: Some("probe/1".to_string()),
        };

        let pool = config.pool_config();
        assert_eq!(pool.workers, 3);
        assert_eq!(pool.queue_capacity, 2);

        let fetch = config.fetch_settings();
        assert_eq!(fetch.timeout, Duration::from_secs(7));
        assert_eq!(fetch.user_agent, "probe/1");
    }
}
