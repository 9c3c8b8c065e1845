//! Lock-free connection state and counters
//!
//! Both types are shared between the listener task and any number of
//! `ListenerHandle`s, so every access is a single atomic operation.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Lifecycle of a listener
///
/// ```text
/// Disconnected ──► Connecting ──► Listening ◄──► Probing
///      ▲               │                            │
///      └───────────────┴──────── failure ───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    /// No connection; waiting out the retry delay or about to connect
    Disconnected = 0,
    /// Transport connect in progress
    Connecting = 1,
    /// Connected and waiting for messages
    Listening = 2,
    /// Connected, idle, waiting for the pong of a liveness probe
    Probing = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Listening,
            3 => ConnectionState::Probing,
            _ => ConnectionState::Disconnected,
        }
    }

    /// Listening and Probing both hold an open connection
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Listening | ConnectionState::Probing)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Listening => "listening",
            ConnectionState::Probing => "probing",
        };
        f.write_str(name)
    }
}

/// Atomic wrapper around `ConnectionState`
#[derive(Debug)]
pub struct AtomicConnectionState {
    inner: AtomicU8,
}

impl AtomicConnectionState {
    pub fn new(state: ConnectionState) -> Self {
        Self {
            inner: AtomicU8::new(state as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.inner.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, state: ConnectionState) {
        self.inner.store(state as u8, Ordering::Release);
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.get().is_connected()
    }

    #[inline]
    pub fn is_connecting(&self) -> bool {
        self.get() == ConnectionState::Connecting
    }

    #[inline]
    pub fn is_probing(&self) -> bool {
        self.get() == ConnectionState::Probing
    }

    #[inline]
    pub fn is_disconnected(&self) -> bool {
        self.get() == ConnectionState::Disconnected
    }
}

impl Default for AtomicConnectionState {
    fn default() -> Self {
        Self::new(ConnectionState::Disconnected)
    }
}

/// Listener counters
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    messages_received: AtomicU64,
    connect_attempts: AtomicU64,
    connections: AtomicU64,
    probes_sent: AtomicU64,
    probe_failures: AtomicU64,
    observer_failures: AtomicU64,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_connect_attempts(&self) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_connections(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_probes(&self) {
        self.probes_sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_probe_failures(&self) {
        self.probe_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_observer_failures(&self, count: u64) {
        self.observer_failures.fetch_add(count, Ordering::Relaxed);
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    pub fn connect_attempts(&self) -> u64 {
        self.connect_attempts.load(Ordering::Relaxed)
    }

    pub fn connections(&self) -> u64 {
        self.connections.load(Ordering::Relaxed)
    }

    /// Successful connections after the first one
    pub fn reconnect_count(&self) -> u64 {
        self.connections().saturating_sub(1)
    }

    pub fn probes_sent(&self) -> u64 {
        self.probes_sent.load(Ordering::Relaxed)
    }

    pub fn probe_failures(&self) -> u64 {
        self.probe_failures.load(Ordering::Relaxed)
    }

    pub fn observer_failures(&self) -> u64 {
        self.observer_failures.load(Ordering::Relaxed)
    }
}
