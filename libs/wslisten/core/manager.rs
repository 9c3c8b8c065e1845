use crate::config::ListenerConfig;
use crate::connection_state::ConnectionState;
use crate::handle::ListenerHandle;
use crate::socket::TungsteniteTransport;
use crate::traits::*;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, trace, warn};

/// Capacity of the lifecycle event channel
pub const EVENT_CAPACITY: usize = 1024;

/// Lifecycle events emitted by a listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Connect attempt started (1-based count of consecutive attempts)
    Connecting(usize),
    /// Connected to the server
    Connected,
    /// Liveness probe answered in time
    ProbeOk,
    /// Connection torn down, a reconnect will follow
    Disconnected,
    /// Error occurred
    Error(String),
}

/// Where the state machine is, and the connection it owns while connected
///
/// The connection lives inside the variant, so leaving the connected phases
/// by any path (including the task being aborted) drops it.
enum Phase<C> {
    Disconnected,
    Listening(C),
    Probing(C),
}

/// Resilient WebSocket listener
///
/// Keeps one logical connection to `config.url()` alive forever:
///
/// - **Outer loop**: connect within `connect_timeout`; on failure log the
///   cause, wait `retry_delay`, try again.
/// - **Inner loop**: wait up to `reply_timeout` for a message and hand it
///   to every observer. An idle channel (or a transport that reports itself
///   closed) triggers a ping; a pong within `ping_timeout` keeps the
///   connection, anything else drops it and goes back to the outer loop.
///
/// # Type Parameters
/// - `T`: Transport implementation (tokio-tungstenite by default)
///
/// # Example
/// ```ignore
/// let config = ListenerConfig::new("ws://127.0.0.1:8000/macro/sample/")?;
/// let manager = ConnectionManager::new(config);
/// manager.register(Arc::new(MyObserver));
///
/// let task = manager.spawn();
/// tokio::signal::ctrl_c().await?;
/// task.shutdown().await;
/// ```
pub struct ConnectionManager<T: Transport = TungsteniteTransport> {
    config: Arc<ListenerConfig>,
    transport: T,
    handle: ListenerHandle,
    event_tx: Option<Sender<ClientEvent>>,
}

impl ConnectionManager<TungsteniteTransport> {
    /// Create a listener over real sockets
    pub fn new(config: ListenerConfig) -> Self {
        Self::with_transport(config, TungsteniteTransport::new())
    }
}

impl<T: Transport> ConnectionManager<T> {
    /// Create a listener over a custom transport
    pub fn with_transport(config: ListenerConfig, transport: T) -> Self {
        let handle = ListenerHandle::new(config.url());
        Self {
            config: Arc::new(config),
            transport,
            handle,
            event_tx: None,
        }
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    /// Shared handle for registering observers and reading state
    pub fn handle(&self) -> ListenerHandle {
        self.handle.clone()
    }

    pub fn register(&self, observer: Arc<dyn Observer>) -> bool {
        self.handle.register(observer)
    }

    pub fn unregister(&self, observer: &Arc<dyn Observer>) -> bool {
        self.handle.unregister(observer)
    }

    /// Subscribe to lifecycle events
    ///
    /// Each call replaces the previous subscription. Events are only
    /// produced once a subscription exists. The channel holds at most
    /// `EVENT_CAPACITY` events; while it is full new events are dropped, so
    /// a receiver that is never drained costs a fixed amount of memory.
    pub fn events(&mut self) -> Receiver<ClientEvent> {
        let (tx, rx) = bounded(EVENT_CAPACITY);
        self.event_tx = Some(tx);
        rx
    }

    /// Run the listener until the future is dropped
    ///
    /// Never returns on its own: every failure is logged and retried.
    pub async fn run(&self) {
        let mut phase = Phase::Disconnected;
        let mut attempt = 0usize;

        loop {
            phase = match phase {
                Phase::Disconnected => {
                    attempt += 1;
                    match self.connect(attempt).await {
                        Some(connection) => {
                            attempt = 0;
                            Phase::Listening(connection)
                        }
                        None => Phase::Disconnected,
                    }
                }
                Phase::Listening(connection) => self.listen(connection).await,
                Phase::Probing(connection) => self.probe(connection).await,
            };
        }
    }

    /// Run the listener on its own tokio task
    pub fn spawn(self) -> ListenerTask {
        let handle = self.handle();
        let task = tokio::spawn(async move {
            self.run().await;
        });
        ListenerTask { handle, task }
    }

    /// One connect attempt; on failure waits `retry_delay` before returning
    async fn connect(&self, attempt: usize) -> Option<T::Connection> {
        let url = self.config.url();
        let delay = self.config.retry_delay;

        self.set_state(ConnectionState::Connecting);
        self.emit(ClientEvent::Connecting(attempt));
        self.handle.counters().increment_connect_attempts();
        debug!("Creating new connection to {} (attempt {})", url, attempt);

        let bound = self.config.connect_timeout;
        let result = match timeout(bound, self.transport.connect(url)).await {
            Ok(result) => result,
            Err(_) => Err(ListenerError::Timeout(format!(
                "no connection to {} within {:?}",
                url, bound
            ))),
        };

        match result {
            Ok(connection) => {
                info!("Connected to {}", url);
                self.handle.counters().increment_connections();
                self.set_state(ConnectionState::Listening);
                self.emit(ClientEvent::Connected);
                Some(connection)
            }
            Err(e) => {
                match &e {
                    ListenerError::NameResolution { .. } => {
                        warn!(
                            "Socket error ({}) - retrying connection in {:?} (Ctrl-C to quit)",
                            e, delay
                        );
                    }
                    ListenerError::ConnectionRefused(_) => {
                        warn!("Nobody seems to listen to {}. Please check the URL.", url);
                        warn!("Retrying connection in {:?} (Ctrl-C to quit)", delay);
                    }
                    ListenerError::Timeout(_) => {
                        warn!(
                            "Connect timed out ({}) - retrying connection in {:?} (Ctrl-C to quit)",
                            e, delay
                        );
                    }
                    _ => {
                        error!(
                            "Connect error ({}) - retrying connection in {:?} (Ctrl-C to quit)",
                            e, delay
                        );
                    }
                }
                self.set_state(ConnectionState::Disconnected);
                self.emit(ClientEvent::Error(e.to_string()));
                sleep(delay).await;
                None
            }
        }
    }

    /// Wait for one message; an idle or closed channel moves to probing
    async fn listen(&self, mut connection: T::Connection) -> Phase<T::Connection> {
        self.set_state(ConnectionState::Listening);

        match timeout(self.config.reply_timeout, connection.recv()).await {
            Ok(Ok(message)) => {
                self.handle.counters().increment_received();
                debug!("Server said > {}", message);

                let outcome = self.handle.registry().dispatch(&self.handle, &message);
                if outcome.failed > 0 {
                    self.handle.counters().add_observer_failures(outcome.failed as u64);
                }
                debug!(
                    "Observers notified ({} ok, {} failed)",
                    outcome.delivered, outcome.failed
                );
                Phase::Listening(connection)
            }
            Ok(Err(e)) => {
                debug!("Receive failed ({}), probing connection", e);
                Phase::Probing(connection)
            }
            Err(_) => {
                debug!(
                    "No message within {:?}, probing connection",
                    self.config.reply_timeout
                );
                Phase::Probing(connection)
            }
        }
    }

    /// Ping/pong round-trip; any failure drops the connection
    async fn probe(&self, mut connection: T::Connection) -> Phase<T::Connection> {
        self.set_state(ConnectionState::Probing);
        self.handle.counters().increment_probes();

        let reason = match timeout(self.config.ping_timeout, connection.ping()).await {
            Ok(Ok(())) => {
                debug!("Ping OK, keeping connection alive...");
                self.emit(ClientEvent::ProbeOk);
                return Phase::Listening(connection);
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("no pong within {:?}", self.config.ping_timeout),
        };

        let delay = self.config.retry_delay;
        warn!(
            "Ping error ({}) - retrying connection in {:?} (Ctrl-C to quit)",
            reason, delay
        );
        self.handle.counters().increment_probe_failures();

        if timeout(self.config.ping_timeout, connection.close()).await.is_err() {
            debug!("Close handshake timed out, dropping connection");
        }
        drop(connection);

        self.set_state(ConnectionState::Disconnected);
        self.emit(ClientEvent::Disconnected);
        sleep(delay).await;
        Phase::Disconnected
    }

    #[inline]
    fn set_state(&self, state: ConnectionState) {
        self.handle.state_cell().set(state);
    }

    fn emit(&self, event: ClientEvent) {
        if let Some(tx) = &self.event_tx {
            if let Err(TrySendError::Full(event)) = tx.try_send(event) {
                trace!("Event channel full, dropping {:?}", event);
            }
        }
    }
}

/// A listener running on a tokio task
///
/// Dropping this value detaches the task; it keeps running until the
/// runtime shuts down. Use `abort` or `shutdown` to stop it.
pub struct ListenerTask {
    handle: ListenerHandle,
    task: tokio::task::JoinHandle<()>,
}

impl ListenerTask {
    pub fn handle(&self) -> &ListenerHandle {
        &self.handle
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Request cancellation without waiting for it
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Cancel the listener and wait until its connection is released
    pub async fn shutdown(self) {
        info!("Shutting down listener for {}", self.handle.url());
        self.task.abort();
        let _ = self.task.await;
        self.handle.state_cell().set(ConnectionState::Disconnected);
    }
}
