//! YAML settings for the listener binary

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use wslisten::ListenerConfig;

/// Endpoint used when no settings file exists
pub const DEFAULT_URL: &str = "ws://127.0.0.1:8000/macro/sample/";

/// Environment variable that overrides the configured URL
pub const URL_ENV_VAR: &str = "WS_LISTENER_URL";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid settings: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Listener binary settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerSettings {
    /// WebSocket endpoint (ws:// or wss://)
    pub url: String,
    /// Time allowed for one connect attempt, handshake included, in seconds
    pub connect_timeout_secs: f64,
    /// Silence tolerated before a liveness probe, in seconds
    pub reply_timeout_secs: f64,
    /// Time allowed for a pong, in seconds
    pub ping_timeout_secs: f64,
    /// Pause between a failure and the next connect attempt, in seconds
    pub retry_delay_secs: f64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            connect_timeout_secs: 10.0,
            reply_timeout_secs: 10.0,
            ping_timeout_secs: 5.0,
            retry_delay_secs: 5.0,
            log_level: "info".to_string(),
        }
    }
}

impl ListenerSettings {
    /// Load settings from a YAML file
    ///
    /// A missing file yields the defaults. The URL environment override is
    /// applied in both cases before validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut settings = if path.exists() {
            Self::from_yaml(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(URL_ENV_VAR) {
            info!("Overriding listener URL from environment variable");
            settings.url = url;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from YAML text without env overrides
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate settings values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(SettingsError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        // durations and URL shape
        self.to_listener_config()?;
        Ok(())
    }

    /// Build the library configuration
    pub fn to_listener_config(&self) -> Result<ListenerConfig> {
        let connect_timeout = seconds("connect_timeout_secs", self.connect_timeout_secs)?;
        let reply_timeout = seconds("reply_timeout_secs", self.reply_timeout_secs)?;
        let ping_timeout = seconds("ping_timeout_secs", self.ping_timeout_secs)?;
        let retry_delay = seconds("retry_delay_secs", self.retry_delay_secs)?;

        ListenerConfig::new(self.url.clone())
            .and_then(|c| c.with_connect_timeout(connect_timeout))
            .and_then(|c| c.with_reply_timeout(reply_timeout))
            .and_then(|c| c.with_ping_timeout(ping_timeout))
            .and_then(|c| c.with_retry_delay(retry_delay))
            .map_err(|e| SettingsError::ValidationError(e.to_string()))
    }

    /// Log settings summary
    pub fn log(&self) {
        info!("Settings loaded:");
        info!("  URL: {}", self.url);
        info!("  Connect timeout: {} seconds", self.connect_timeout_secs);
        info!("  Reply timeout: {} seconds", self.reply_timeout_secs);
        info!("  Ping timeout: {} seconds", self.ping_timeout_secs);
        info!("  Retry delay: {} seconds", self.retry_delay_secs);
        info!("  Log level: {}", self.log_level);
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    if value <= 0.0 {
        return Err(SettingsError::ValidationError(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Duration::try_from_secs_f64(value)
        .map_err(|e| SettingsError::ValidationError(format!("{}: {}", name, e)))
}
