use crate::traits::*;
use std::time::Duration;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;

/// Default time to wait for an inbound message before probing
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default time to wait for a pong after a ping
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on one connect attempt (DNS, TCP and WebSocket handshake)
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause before every reconnection attempt
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Configuration for a `ConnectionManager`
///
/// Fixed at construction. Every duration must be non-zero; there is no
/// upper bound.
///
/// # Example
/// ```ignore
/// let config = ListenerConfig::new("ws://127.0.0.1:8000/macro/sample/")?
///     .with_reply_timeout(Duration::from_secs(10))?
///     .with_ping_timeout(Duration::from_secs(5))?
///     .with_retry_delay(Duration::from_secs(5))?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// WebSocket URL (wss:// or ws://)
    pub(crate) url: String,

    /// Upper bound on one connect attempt, handshake included
    pub(crate) connect_timeout: Duration,

    /// How long to wait for a message before sending a liveness probe
    pub(crate) reply_timeout: Duration,

    /// How long to wait for the pong of a liveness probe
    pub(crate) ping_timeout: Duration,

    /// Pause after any connection failure before reconnecting
    pub(crate) retry_delay: Duration,
}

impl ListenerConfig {
    /// Create a configuration with default timings
    ///
    /// Fails if `url` is not a `ws://` / `wss://` URL with a host.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        validate_url(&url)?;

        Ok(Self {
            url,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.connect_timeout = positive("connect_timeout", timeout)?;
        Ok(self)
    }

    pub fn with_reply_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.reply_timeout = positive("reply_timeout", timeout)?;
        Ok(self)
    }

    pub fn with_ping_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.ping_timeout = positive("ping_timeout", timeout)?;
        Ok(self)
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Result<Self> {
        self.retry_delay = positive("retry_delay", delay)?;
        Ok(self)
    }

    /// Get a reference to the URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn reply_timeout(&self) -> Duration {
        self.reply_timeout
    }

    pub fn ping_timeout(&self) -> Duration {
        self.ping_timeout
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}

fn positive(name: &str, value: Duration) -> Result<Duration> {
    if value.is_zero() {
        return Err(ListenerError::Configuration(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(value)
}

fn validate_url(url: &str) -> Result<()> {
    let request = url
        .into_client_request()
        .map_err(|e| ListenerError::Configuration(format!("Invalid URL '{}': {}", url, e)))?;
    let uri = request.uri();

    match uri.scheme_str() {
        Some("ws") | Some("wss") => {}
        other => {
            return Err(ListenerError::Configuration(format!(
                "Unsupported URL scheme {:?} in '{}' (expected ws or wss)",
                other, url
            )))
        }
    }

    if uri.host().map_or(true, str::is_empty) {
        return Err(ListenerError::Configuration(format!(
            "URL '{}' has no host",
            url
        )));
    }

    Ok(())
}
