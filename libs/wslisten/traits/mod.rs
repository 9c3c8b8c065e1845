//! # wslisten traits
//!
//! Core traits and types shared by the listener:
//!
//! - **WsMessage**: a received Text/Binary message
//! - **Observer**: receives every message a listener gets
//! - **Transport / Connection**: the network seam driven by the state machine
//! - **ListenerError**: error taxonomy used across the crate

pub mod error;
pub mod message;
pub mod observer;
pub mod transport;

// Re-export commonly used types
pub use error::{ListenerError, Result};
pub use message::WsMessage;
pub use observer::{NoOpObserver, Observer};
pub use transport::{Connection, Transport};
