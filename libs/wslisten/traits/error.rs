use thiserror::Error;

/// Main error type for wslisten
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The endpoint host could not be resolved
    #[error("Name resolution failed for {host}: {reason}")]
    NameResolution { host: String, reason: String },

    /// Nothing is listening on the resolved endpoint
    #[error("Connection refused by {0}")]
    ConnectionRefused(String),

    /// Any other transport failure (handshake, TLS, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Connection closed by the peer or already torn down
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// An observer rejected a message
    #[error("Observer error: {0}")]
    Observer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ListenerError {
    /// True for the two connect failures that mean "the endpoint is not there"
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            ListenerError::NameResolution { .. } | ListenerError::ConnectionRefused(_)
        )
    }
}

/// Result type for wslisten operations
pub type Result<T> = std::result::Result<T, ListenerError>;
