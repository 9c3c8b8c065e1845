//! tokio-tungstenite transport
//!
//! Connecting is split into its three stages so each failure can be told
//! apart:
//!
//! ```text
//! URL ──► lookup_host ──► TcpStream::connect ──► client_async_tls (handshake)
//!            │                    │                        │
//!      NameResolution     ConnectionRefused            Transport
//! ```

use crate::traits::*;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use tokio::net::{lookup_host, TcpStream};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::Uri;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{client_async_tls, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport over real TCP/TLS sockets
#[derive(Debug, Clone, Default)]
pub struct TungsteniteTransport;

impl TungsteniteTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for TungsteniteTransport {
    type Connection = TungsteniteConnection;

    async fn connect(&self, url: &str) -> Result<Self::Connection> {
        let request = url
            .into_client_request()
            .map_err(|e| ListenerError::Configuration(format!("Invalid URL '{}': {}", url, e)))?;
        let (host, port) = host_and_port(request.uri())?;

        let addrs: Vec<SocketAddr> = lookup_host((host.as_str(), port))
            .await
            .map_err(|e| ListenerError::NameResolution {
                host: host.clone(),
                reason: e.to_string(),
            })?
            .collect();

        if addrs.is_empty() {
            return Err(ListenerError::NameResolution {
                host,
                reason: "no addresses returned".to_string(),
            });
        }

        let stream = connect_any(&addrs, &host, port).await?;

        let (ws_stream, _response) = client_async_tls(request, stream)
            .await
            .map_err(|e| ListenerError::Transport(format!("Handshake with {} failed: {}", url, e)))?;

        debug!("WebSocket handshake with {} complete", url);
        Ok(TungsteniteConnection::new(ws_stream))
    }
}

/// Try every resolved address in order, keeping the last failure
async fn connect_any(addrs: &[SocketAddr], host: &str, port: u16) -> Result<TcpStream> {
    let mut last_error: Option<io::Error> = None;

    for addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                trace!("TCP connect to {} failed: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    let endpoint = format!("{}:{}", host, port);
    Err(match last_error {
        Some(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
            ListenerError::ConnectionRefused(endpoint)
        }
        Some(e) => ListenerError::Transport(format!("TCP connect to {} failed: {}", endpoint, e)),
        None => ListenerError::Transport(format!("No address to connect to for {}", endpoint)),
    })
}

fn host_and_port(uri: &Uri) -> Result<(String, u16)> {
    let host = uri
        .host()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ListenerError::Configuration(format!("URL '{}' has no host", uri)))?;
    // IPv6 literals come bracketed
    let host = host.trim_start_matches('[').trim_end_matches(']').to_string();

    let port = match (uri.port_u16(), uri.scheme_str()) {
        (Some(port), _) => port,
        (None, Some("wss")) => 443,
        (None, _) => 80,
    };

    Ok((host, port))
}

/// One open tokio-tungstenite connection
///
/// Pings carry an increasing 8-byte counter so a pong can be matched to the
/// probe that caused it. Data messages read while waiting for a pong are
/// queued and handed out by later `recv` calls, in arrival order.
pub struct TungsteniteConnection {
    stream: WsStream,
    pending: VecDeque<WsMessage>,
    next_ping: u64,
}

impl TungsteniteConnection {
    fn new(stream: WsStream) -> Self {
        Self {
            stream,
            pending: VecDeque::new(),
            next_ping: 0,
        }
    }

    fn next_ping_payload(&mut self) -> Vec<u8> {
        let payload = self.next_ping.to_be_bytes().to_vec();
        self.next_ping = self.next_ping.wrapping_add(1);
        payload
    }
}

#[async_trait]
impl Connection for TungsteniteConnection {
    async fn recv(&mut self) -> Result<WsMessage> {
        if let Some(message) = self.pending.pop_front() {
            return Ok(message);
        }

        loop {
            match self.stream.next().await {
                Some(Ok(msg)) => {
                    if let Some(ws_msg) = tungstenite_to_ws_message(&msg) {
                        return Ok(ws_msg);
                    }
                    if let Message::Close(frame) = msg {
                        return Err(ListenerError::ConnectionClosed(format!(
                            "Close frame received: {:?}",
                            frame
                        )));
                    }
                    // ping/pong/raw frames are handled by tungstenite
                }
                Some(Err(e)) => return Err(ws_error(e)),
                None => return Err(ListenerError::ConnectionClosed("Stream ended".into())),
            }
        }
    }

    async fn ping(&mut self) -> Result<()> {
        let payload = self.next_ping_payload();
        self.stream
            .send(Message::Ping(payload.clone()))
            .await
            .map_err(ws_error)?;

        loop {
            match self.stream.next().await {
                Some(Ok(Message::Pong(data))) if data == payload => return Ok(()),
                Some(Ok(Message::Pong(_))) => {
                    trace!("Ignoring stale pong");
                }
                Some(Ok(Message::Close(frame))) => {
                    return Err(ListenerError::ConnectionClosed(format!(
                        "Close frame received while probing: {:?}",
                        frame
                    )));
                }
                Some(Ok(msg)) => {
                    if let Some(ws_msg) = tungstenite_to_ws_message(&msg) {
                        self.pending.push_back(ws_msg);
                    }
                }
                Some(Err(e)) => return Err(ws_error(e)),
                None => return Err(ListenerError::ConnectionClosed("Stream ended".into())),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = SinkExt::close(&mut self.stream).await {
            debug!("Close handshake failed: {}", e);
        }
    }
}

fn ws_error(e: tungstenite::Error) -> ListenerError {
    match e {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            ListenerError::ConnectionClosed(e.to_string())
        }
        other => ListenerError::Transport(other.to_string()),
    }
}

/// Convert tungstenite Message to WsMessage (data messages only)
fn tungstenite_to_ws_message(msg: &Message) -> Option<WsMessage> {
    match msg {
        Message::Text(text) => Some(WsMessage::Text(text.to_string())),
        Message::Binary(data) => Some(WsMessage::Binary(data.to_vec())),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}
