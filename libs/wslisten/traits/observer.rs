//! Observer capability
//!
//! Observers are the fan-out side of the listener: every data message the
//! connection receives is handed to each registered observer in turn.
//!
//! ```text
//! WebSocket → ConnectionManager → ObserverRegistry::dispatch
//!                                        │ (registration order)
//!                                        ├─► observer #0 .notify(source, msg)
//!                                        ├─► observer #1 .notify(source, msg)
//!                                        └─► observer #N .notify(source, msg)
//! ```
//!
//! A failing observer (an `Err` or a panic) is logged and skipped; the
//! remaining observers still receive the message.

use crate::core::handle::ListenerHandle;
use crate::{Result, WsMessage};

/// Anything that wants to receive the messages of a listener
///
/// `notify` runs inline on the listener's task, between two receives. Keep
/// it short; hand heavy work off to a channel or a spawned task.
///
/// # Example
///
/// ```ignore
/// struct Printer {
///     id: u64,
/// }
///
/// impl Observer for Printer {
///     fn notify(&self, _source: &ListenerHandle, message: &WsMessage) -> Result<()> {
///         println!("Printer {} got message {}", self.id, message);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send + Sync + 'static {
    /// Handle one inbound message
    ///
    /// `source` identifies the listener that received the message and can be
    /// used to inspect its state or to (un)register observers, including
    /// `self`, from inside the callback.
    ///
    /// # Errors
    /// A returned error is logged by the registry; it never reaches the
    /// connection state machine.
    fn notify(&self, source: &ListenerHandle, message: &WsMessage) -> Result<()>;
}

/// Observer that accepts every message and does nothing
pub struct NoOpObserver;

impl Observer for NoOpObserver {
    fn notify(&self, _source: &ListenerHandle, _message: &WsMessage) -> Result<()> {
        Ok(())
    }
}
