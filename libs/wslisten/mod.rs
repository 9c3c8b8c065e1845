//! # wslisten
//!
//! A long-lived WebSocket listener that keeps one logical connection alive
//! over an unreliable network and fans every received message out to a
//! dynamic set of observers.
//!
//! ## Features
//!
//! - **Self-healing**: DNS failures, refused connections and dead peers are
//!   logged and retried forever at a fixed delay
//! - **Liveness probing**: an idle channel is checked with a ping/pong
//!   round-trip instead of being torn down
//! - **Observer fan-out**: registration order, per-observer failure
//!   isolation, safe (un)registration from any task
//! - **Pluggable transport**: tokio-tungstenite by default, any `Transport`
//!   implementation for tests or alternative stacks

pub mod traits;
pub mod core;

// Re-export all traits
pub use traits::*;

// Re-export core functionality
pub use self::core::{
    config, connection_state, handle, manager, registry, socket,
    config::ListenerConfig,
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState},
    handle::{ListenerHandle, Metrics},
    manager::{ClientEvent, ConnectionManager, ListenerTask, EVENT_CAPACITY},
    registry::{DispatchOutcome, ObserverRegistry},
    socket::{TungsteniteConnection, TungsteniteTransport},
};
