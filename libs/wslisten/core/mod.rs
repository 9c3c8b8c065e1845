//! # wslisten core
//!
//! The connection-resilience state machine and the pieces it drives.
//!
//! ```text
//!             ┌──────────────── outer loop ────────────────┐
//!             ▼                                            │
//!      Disconnected ── connect ok ──► Listening ──msg──► dispatch
//!        │    ▲                         │    ▲
//!  refused/   │              idle/closed│    │pong
//!  no DNS ────┘ (retry_delay)           ▼    │
//!             ▲                       Probing
//!             └────── ping error (retry_delay) ─┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use wslisten::{ConnectionManager, ListenerConfig};
//!
//! #[tokio::main]
//! async fn main() -> wslisten::Result<()> {
//!     let config = ListenerConfig::new("ws://127.0.0.1:8000/macro/sample/")?
//!         .with_reply_timeout(Duration::from_secs(10))?;
//!
//!     let manager = ConnectionManager::new(config);
//!     manager.register(Arc::new(MyObserver));
//!
//!     let task = manager.spawn();
//!     tokio::signal::ctrl_c().await.ok();
//!     task.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection_state;
pub mod handle;
pub mod manager;
pub mod registry;
pub mod socket;

// Re-export main types
pub use config::ListenerConfig;
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
pub use handle::{ListenerHandle, Metrics};
pub use manager::{ClientEvent, ConnectionManager, ListenerTask, EVENT_CAPACITY};
pub use registry::{DispatchOutcome, ObserverRegistry};
pub use socket::{TungsteniteConnection, TungsteniteTransport};

// Re-export traits for convenience
pub use crate::traits::*;
