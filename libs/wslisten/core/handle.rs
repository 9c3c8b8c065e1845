use crate::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::registry::ObserverRegistry;
use crate::traits::*;
use std::fmt;
use std::sync::Arc;

/// Listener metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metrics {
    pub messages_received: u64,
    pub connect_attempts: u64,
    pub connections: u64,
    pub reconnect_count: u64,
    pub probes_sent: u64,
    pub probe_failures: u64,
    pub observer_failures: u64,
    pub connection_state: ConnectionState,
}

/// Shared view of a running listener
///
/// Cheap to clone. This is the `source` every observer receives, and what
/// host code keeps to register observers after the listener was spawned.
#[derive(Clone)]
pub struct ListenerHandle {
    url: Arc<str>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    observers: Arc<ObserverRegistry>,
}

impl ListenerHandle {
    pub(crate) fn new(url: &str) -> Self {
        Self {
            url: Arc::from(url),
            state: Arc::new(AtomicConnectionState::default()),
            metrics: Arc::new(AtomicMetrics::new()),
            observers: Arc::new(ObserverRegistry::new()),
        }
    }

    /// Endpoint this listener connects to
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Register an observer; see `ObserverRegistry::register`
    pub fn register(&self, observer: Arc<dyn Observer>) -> bool {
        self.observers.register(observer)
    }

    /// Unregister an observer; see `ObserverRegistry::unregister`
    pub fn unregister(&self, observer: &Arc<dyn Observer>) -> bool {
        self.observers.unregister(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Get current metrics
    pub fn metrics(&self) -> Metrics {
        Metrics {
            messages_received: self.metrics.messages_received(),
            connect_attempts: self.metrics.connect_attempts(),
            connections: self.metrics.connections(),
            reconnect_count: self.metrics.reconnect_count(),
            probes_sent: self.metrics.probes_sent(),
            probe_failures: self.metrics.probe_failures(),
            observer_failures: self.metrics.observer_failures(),
            connection_state: self.state.get(),
        }
    }

    /// True when both handles belong to the same listener
    pub fn same_listener(&self, other: &ListenerHandle) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    pub(crate) fn state_cell(&self) -> &AtomicConnectionState {
        &self.state
    }

    pub(crate) fn counters(&self) -> &AtomicMetrics {
        &self.metrics
    }

    pub(crate) fn registry(&self) -> &ObserverRegistry {
        &self.observers
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("url", &self.url)
            .field("state", &self.state.get())
            .field("observers", &self.observers.len())
            .finish()
    }
}
