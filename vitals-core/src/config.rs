use crate::health::{HealthScorer, ScoreWeights};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Default config file looked up by [`Config::load_or_default`].
pub const DEFAULT_CONFIG_FILE: &str = "vitals.yaml";

/// Configuration for the health monitor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Timing of the monitor loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between the start of consecutive cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Stop after this many cycles; run until shutdown when unset
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

fn default_interval_secs() -> u64 {
    30
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_cycles: None,
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// How category scores combine into the overall score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Unweighted mean when unset
    #[serde(default)]
    pub weights: Option<ScoreWeights>,
}

impl HealthConfig {
    pub fn scorer(&self) -> HealthScorer {
        match self.weights {
            Some(weights) => HealthScorer::weighted(weights),
            None => HealthScorer::new(),
        }
    }
}

/// Where cycle outcomes are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Write one JSON file per cycle into `output_dir`
    #[serde(default = "default_true")]
    pub write_snapshots: bool,
    /// Summary log, relative to `output_dir`; disabled when null
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_true() -> bool {
    true
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("system_health.log"))
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            write_snapshots: true,
            log_file: default_log_file(),
        }
    }
}

/// Sampling settings handed to the system provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Window over which CPU usage is measured
    #[serde(default = "default_cpu_sample_millis")]
    pub cpu_sample_millis: u64,
}

fn default_cpu_sample_millis() -> u64 {
    1000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            cpu_sample_millis: default_cpu_sample_millis(),
        }
    }
}

impl ProviderConfig {
    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `vitals.yaml` if it exists, otherwise use defaults.
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Create a new Config with default values and builder-style configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check values serde can't: a usable interval and sane weights.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "monitor.interval_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(weights) = &self.health.weights {
            let all = [weights.cpu, weights.memory, weights.disk];
            if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(ConfigError::Invalid(
                    "health.weights must be finite and non-negative".to_string(),
                ));
            }
            if all.iter().sum::<f64>() <= 0.0 {
                return Err(ConfigError::Invalid(
                    "health.weights must not all be zero".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Render the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Set the seconds between cycles.
    pub fn with_interval_secs(mut self, interval_secs: u64) -> Self {
        self.monitor.interval_secs = interval_secs;
        self
    }

    /// Stop the monitor after a number of cycles.
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.monitor.max_cycles = Some(max_cycles);
        self
    }

    /// Combine category scores with a weighted mean.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.health.weights = Some(weights);
        self
    }

    /// Set the directory snapshots and the summary log are written to.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report.output_dir = dir.into();
        self
    }

    /// Configure report settings.
    pub fn with_report_config(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    /// Set the log level filter.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }
}
