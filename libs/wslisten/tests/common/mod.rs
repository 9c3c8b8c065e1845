//! Common test utilities for wslisten integration tests
//!
//! This module provides a scriptable WebSocket server and a channel-backed
//! observer.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Notify};
use wslisten::{ListenerHandle, Observer, WsMessage};

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Install a fmt subscriber when TEST_VERBOSE is set
pub fn init_tracing() {
    if std::env::var("TEST_VERBOSE").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("wslisten=debug")
            .with_test_writer()
            .try_init();
    }
}

/// What the server does with each accepted connection
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Send these messages, then stay connected answering pings
    Greet(Vec<String>),
    /// Send these messages, then close the connection
    GreetAndClose(Vec<String>),
    /// Complete the handshake, then never read or write again
    Unresponsive,
}

/// A scriptable mock WebSocket server
pub struct MockWsServer {
    pub addr: SocketAddr,
    accepted: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
}

impl MockWsServer {
    /// Create and start a new mock WebSocket server
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(Notify::new());

        let accepted_clone = Arc::clone(&accepted);
        let shutdown_clone = Arc::clone(&shutdown);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                accepted_clone.fetch_add(1, Ordering::SeqCst);
                                let behavior = behavior.clone();
                                let shutdown = Arc::clone(&shutdown_clone);
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, behavior, shutdown).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown_clone.notified() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            accepted,
            shutdown,
        }
    }

    async fn handle_connection(stream: TcpStream, behavior: Behavior, shutdown: Arc<Notify>) {
        use futures::{SinkExt, StreamExt};
        use tokio_tungstenite::accept_async;
        use tokio_tungstenite::tungstenite::Message;

        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        let greeting = match &behavior {
            Behavior::Greet(messages) | Behavior::GreetAndClose(messages) => messages.clone(),
            Behavior::Unresponsive => Vec::new(),
        };
        for text in greeting {
            if write.send(Message::Text(text)).await.is_err() {
                return;
            }
        }

        match behavior {
            Behavior::GreetAndClose(_) => {
                let _ = write.close().await;
            }
            Behavior::Unresponsive => {
                // hold the socket open without ever polling it
                shutdown.notified().await;
            }
            Behavior::Greet(_) => loop {
                tokio::select! {
                    msg = read.next() => {
                        match msg {
                            Some(Ok(Message::Ping(data))) => {
                                if write.send(Message::Pong(data)).await.is_err() {
                                    break;
                                }
                            }
                            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                            Some(Ok(_)) => {}
                        }
                    }
                    _ = shutdown.notified() => {
                        break;
                    }
                }
            },
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/feed", self.addr)
    }

    /// Number of TCP connections accepted so far
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A local address with nothing listening on it
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Observer that forwards every message to a channel
pub struct ChannelObserver {
    pub id: u64,
    tx: mpsc::UnboundedSender<(u64, String)>,
}

impl ChannelObserver {
    pub fn new(id: u64) -> (Arc<Self>, mpsc::UnboundedReceiver<(u64, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { id, tx }), rx)
    }
}

impl Observer for ChannelObserver {
    fn notify(&self, _source: &ListenerHandle, message: &WsMessage) -> wslisten::Result<()> {
        let _ = self.tx.send((self.id, message.to_string()));
        Ok(())
    }
}

/// Poll `check` every 10ms until it holds or `limit` elapses
pub async fn wait_until(limit: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
