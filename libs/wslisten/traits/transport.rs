use crate::{Result, WsMessage};
use async_trait::async_trait;

/// Opens connections to a WebSocket endpoint
///
/// The connection manager only talks to the network through this trait, so
/// the state machine can be driven by a scripted transport in tests.
///
/// Implementations must classify connect failures:
/// - host lookup failed → `ListenerError::NameResolution`
/// - nobody listening → `ListenerError::ConnectionRefused`
/// - anything else → `ListenerError::Transport`
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Connection type produced by this transport
    type Connection: Connection;

    /// Open a new connection to `url`
    async fn connect(&self, url: &str) -> Result<Self::Connection>;
}

/// A single open WebSocket connection
///
/// Dropping a connection releases it. `close` is the graceful variant.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Wait for the next data message
    ///
    /// Control frames are handled internally and never returned. When the
    /// peer closes, or the connection was already closed, this returns
    /// `ListenerError::ConnectionClosed`.
    ///
    /// Must be cancel-safe: the manager calls it under a timeout and a
    /// message must not be lost when the timeout wins the race.
    async fn recv(&mut self) -> Result<WsMessage>;

    /// Send a ping and wait for the matching pong
    ///
    /// Data messages that arrive while waiting are kept for later `recv`
    /// calls. The caller bounds this with its own timeout.
    async fn ping(&mut self) -> Result<()>;

    /// Best-effort graceful close
    async fn close(&mut self);
}
