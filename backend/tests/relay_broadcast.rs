//! End-to-end tests for the broadcast hub over real sockets.

use futures_util::{SinkExt, StreamExt};
use peerchat_relay::RelayServer;
use peerchat_relay::config::ServerConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay() -> SocketAddr {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };
    let (addr, _) = start_relay_with(&config).await;
    addr
}

async fn start_relay_with(config: &ServerConfig) -> (SocketAddr, Arc<RelayServer>) {
    let server = RelayServer::bind(config, logging::Logger::discard())
        .await
        .expect("bind relay");
    let addr = server.local_addr().expect("local addr");
    let server = Arc::new(server);
    let running = Arc::clone(&server);
    tokio::spawn(async move { running.run().await });
    (addr, server)
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{}", addr))
        .await
        .expect("connect to relay");
    client
}

async fn next_text(client: &mut Client) -> String {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("read error");
        if let Message::Text(text) = frame {
            return text;
        }
    }
}

/// Gives the server a moment to subscribe freshly accepted clients.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_frame_reaches_every_client_including_sender() {
    let addr = start_relay().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    settle().await;

    let frame = r#"{"op":"join","code":"AB12X"}"#;
    alice.send(Message::Text(frame.to_string())).await.unwrap();

    assert_eq!(next_text(&mut bob).await, frame);
    assert_eq!(next_text(&mut alice).await, frame);
}

#[tokio::test]
async fn test_frames_keep_sender_order() {
    let addr = start_relay().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    settle().await;

    for i in 0..10 {
        alice.send(Message::Text(format!("frame {}", i))).await.unwrap();
    }
    for i in 0..10 {
        assert_eq!(next_text(&mut bob).await, format!("frame {}", i));
    }
}

#[tokio::test]
async fn test_binary_frames_are_not_relayed() {
    let addr = start_relay().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    settle().await;

    alice.send(Message::Binary(vec![1, 2, 3])).await.unwrap();
    alice.send(Message::Text("after".to_string())).await.unwrap();

    assert_eq!(next_text(&mut bob).await, "after");
}

#[tokio::test]
async fn test_departed_client_does_not_break_the_hub() {
    let addr = start_relay().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    let mut carol = connect(addr).await;
    settle().await;

    carol.close(None).await.unwrap();
    settle().await;

    alice.send(Message::Text("still here".to_string())).await.unwrap();
    assert_eq!(next_text(&mut bob).await, "still here");
}

#[tokio::test]
async fn test_oversized_frame_is_dropped_and_sender_stays_connected() {
    let config = ServerConfig {
        port: 0,
        max_message_bytes: 1024,
        ..ServerConfig::default()
    };
    let (addr, _server) = start_relay_with(&config).await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    settle().await;

    alice.send(Message::Text("x".repeat(4096))).await.unwrap();
    alice.send(Message::Text("after".to_string())).await.unwrap();

    assert_eq!(next_text(&mut bob).await, "after");
    assert_eq!(next_text(&mut alice).await, "after");
}

#[tokio::test]
async fn test_client_count_follows_connects_and_departures() {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };
    let (addr, server) = start_relay_with(&config).await;
    assert_eq!(server.client_count(), 0);

    let mut alice = connect(addr).await;
    let _bob = connect(addr).await;
    settle().await;
    assert_eq!(server.client_count(), 2);

    alice.close(None).await.unwrap();
    settle().await;
    assert_eq!(server.client_count(), 1);
}
