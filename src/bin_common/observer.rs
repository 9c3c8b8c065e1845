//! Example observer used by the listener binary

use tracing::info;
use wslisten::{ListenerHandle, Observer, WsMessage};

/// Logs every message it receives, tagged with its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintObserver {
    id: u64,
}

impl PrintObserver {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    /// Observer tagged with the current unix timestamp
    pub fn with_timestamp_id() -> Self {
        Self::new(chrono::Utc::now().timestamp().max(0) as u64)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Line logged for a message
    pub fn format_message(&self, message: &WsMessage) -> String {
        format!("A {}, got message {}", self.id, message)
    }
}

impl Observer for PrintObserver {
    fn notify(&self, _source: &ListenerHandle, message: &WsMessage) -> wslisten::Result<()> {
        info!("{}", self.format_message(message));
        Ok(())
    }
}
