use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::ui::ControllerSettings;

/// Placeholder visualization shown when no URL is configured
pub const DEFAULT_DASHBOARD_URL: &str = "https://public.tableau.com/views/Dashboard/Overview";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Gate re-evaluation period (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long notifications stay visible (milliseconds)
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,

    /// Delay before the welcome page returns after "back" (milliseconds)
    #[serde(default = "default_back_transition_ms")]
    pub back_transition_ms: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Embedded visualization settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Source URL of the embedded visualization
    pub url: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DASHBOARD_URL.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log messages containing any of these are dropped
    #[serde(default = "default_suppress")]
    pub suppress: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            suppress: default_suppress(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_notification_ms() -> u64 {
    3000
}

fn default_back_transition_ms() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_suppress() -> Vec<String> {
    // Noise the embedded visualization host produces on every unload
    vec!["Permissions policy violation: unload".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dashboard: DashboardConfig::default(),
            poll_interval_ms: default_poll_interval_ms(),
            notification_ms: default_notification_ms(),
            back_transition_ms: default_back_transition_ms(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Timing settings for the page controller
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            notification_duration: Duration::from_millis(self.notification_ms),
            back_transition: Duration::from_millis(self.back_transition_ms),
        }
    }
}

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load configuration, falling back to defaults when the file does not exist
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!("No config file at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_dashboard_url(&config.dashboard.url).context("Invalid dashboard configuration")?;

    for (name, value) in [
        ("poll_interval_ms", config.poll_interval_ms),
        ("notification_ms", config.notification_ms),
        ("back_transition_ms", config.back_transition_ms),
    ] {
        if value == 0 {
            anyhow::bail!("{} must be greater than zero", name);
        }
    }

    Ok(())
}

/// Check that a visualization URL is an absolute http(s) URL
pub fn validate_dashboard_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;

    if parsed.scheme() != "https" && parsed.scheme() != "http" {
        anyhow::bail!("URL must use http or https, got '{}'", parsed.scheme());
    }

    if parsed.host_str().is_none() {
        anyhow::bail!("URL has no host: {}", url);
    }

    Ok(())
}
