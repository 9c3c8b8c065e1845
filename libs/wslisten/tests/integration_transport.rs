//! Integration tests for the tokio-tungstenite transport
//!
//! These tests verify connect-failure classification and the ping/pong
//! round-trip without the state machine on top.

#[macro_use]
mod common;

use common::{refused_addr, Behavior, MockWsServer};
use std::time::Duration;
use wslisten::{Connection, ListenerError, Transport, TungsteniteTransport, WsMessage};

#[tokio::test]
async fn test_refused_connection_is_classified() {
    let addr = refused_addr().await;
    let result = TungsteniteTransport::new()
        .connect(&format!("ws://{}/", addr))
        .await;

    match result {
        Err(ListenerError::ConnectionRefused(endpoint)) => {
            verbose_println!("  Refused: {}", endpoint);
            assert!(endpoint.ends_with(&addr.port().to_string()));
        }
        Err(other) => panic!("expected ConnectionRefused, got {}", other),
        Ok(_) => panic!("expected ConnectionRefused, got a connection"),
    }
}

#[tokio::test]
async fn test_unknown_host_is_classified_as_name_resolution() {
    // .invalid is reserved and never resolves
    let result = TungsteniteTransport::new()
        .connect("ws://listener-test.invalid:9000/")
        .await;

    match result {
        Err(ListenerError::NameResolution { host, .. }) => {
            assert_eq!(host, "listener-test.invalid");
        }
        Err(other) => panic!("expected NameResolution, got {}", other),
        Ok(_) => panic!("expected NameResolution, got a connection"),
    }
}

#[tokio::test]
async fn test_recv_and_ping_round_trip() {
    let server = MockWsServer::start(Behavior::Greet(vec!["hello".into()])).await;
    let mut conn = TungsteniteTransport::new()
        .connect(&server.ws_url())
        .await
        .unwrap();

    let first = tokio::time::timeout(Duration::from_secs(5), conn.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first, WsMessage::Text("hello".into()));

    for _ in 0..3 {
        tokio::time::timeout(Duration::from_secs(5), conn.ping())
            .await
            .expect("pong not received")
            .unwrap();
    }

    conn.close().await;
}

#[tokio::test]
async fn test_messages_read_during_ping_are_kept() {
    let server =
        MockWsServer::start(Behavior::Greet(vec!["a".into(), "b".into()])).await;
    let mut conn = TungsteniteTransport::new()
        .connect(&server.ws_url())
        .await
        .unwrap();

    // the greeting is already in flight; the ping has to read past it
    tokio::time::timeout(Duration::from_secs(5), conn.ping())
        .await
        .unwrap()
        .unwrap();

    let a = conn.recv().await.unwrap();
    let b = conn.recv().await.unwrap();
    assert_eq!((a.as_text(), b.as_text()), (Some("a"), Some("b")));
}

#[tokio::test]
async fn test_closed_connection_reports_closed_then_ping_fails() {
    let server = MockWsServer::start(Behavior::GreetAndClose(Vec::new())).await;
    let mut conn = TungsteniteTransport::new()
        .connect(&server.ws_url())
        .await
        .unwrap();

    let recv = tokio::time::timeout(Duration::from_secs(5), conn.recv())
        .await
        .unwrap();
    assert!(matches!(recv, Err(ListenerError::ConnectionClosed(_))));

    let ping = tokio::time::timeout(Duration::from_secs(5), conn.ping())
        .await
        .unwrap();
    assert!(ping.is_err());
}

#[tokio::test]
async fn test_unresponsive_peer_never_answers_ping() {
    let server = MockWsServer::start(Behavior::Unresponsive).await;
    let mut conn = TungsteniteTransport::new()
        .connect(&server.ws_url())
        .await
        .unwrap();

    let ping = tokio::time::timeout(Duration::from_millis(200), conn.ping()).await;
    assert!(ping.is_err(), "pong arrived from a peer that never reads");
}
