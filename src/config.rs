use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use tracing::trace;

use crate::classify::DEFAULT_DEGRADED_THRESHOLD_MS;
use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Snapshot location configuration
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SnapshotConfig {
    /// Path of the JSON document shared with the dashboard and the API
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(crate::util::DEFAULT_SNAPSHOT_PATH)
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub targets: Vec<TargetConfig>,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// A monitored endpoint. The `id` must stay stable across runs since
/// persisted state and incident identities are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct TargetConfig {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl TargetConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Cycle settings shared by every target
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MonitorConfig {
    /// Probe timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between the start of two cycles
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Latency samples kept per target
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Successful probes at or above this latency are degraded
    #[serde(default = "default_degraded_threshold_ms")]
    pub degraded_threshold_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            interval: default_interval(),
            history_capacity: default_history_capacity(),
            degraded_threshold_ms: default_degraded_threshold_ms(),
        }
    }
}

impl MonitorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn degraded_threshold(&self) -> Duration {
        Duration::from_millis(self.degraded_threshold_ms)
    }
}

fn default_timeout() -> u64 {
    5
}

fn default_interval() -> u64 {
    60
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_degraded_threshold_ms() -> u64 {
    DEFAULT_DEGRADED_THRESHOLD_MS
}

impl Config {
    /// Check the roster and settings for values the monitor cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.targets.is_empty() {
            bail!("no targets configured");
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.id.trim().is_empty() {
                bail!("target '{}' has an empty id", target.name);
            }
            if !seen.insert(target.id.as_str()) {
                bail!("duplicate target id '{}'", target.id);
            }

            let url = reqwest::Url::parse(&target.url)
                .with_context(|| format!("invalid url for target '{}'", target.id))?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!(
                    "target '{}' uses unsupported scheme '{}'",
                    target.id,
                    url.scheme()
                );
            }
        }

        if self.monitor.history_capacity == 0 {
            bail!("history_capacity must be at least 1");
        }
        if self.monitor.timeout == 0 {
            bail!("timeout must be at least 1 second");
        }
        if self.monitor.interval == 0 {
            bail!("interval must be at least 1 second");
        }

        Ok(())
    }
}

/// Read and validate a config file. Files ending in `.toml` are parsed as
/// TOML, everything else as JSON.
pub fn read_config_file(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let file_content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let config = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str::<Config>(&file_content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))?
    } else {
        serde_json::from_str::<Config>(&file_content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))?
    };

    config.validate()?;
    trace!("loaded config: {config:?}");

    Ok(config)
}
