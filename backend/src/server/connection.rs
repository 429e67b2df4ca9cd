use futures_util::{SinkExt, StreamExt};
use logging::Logger;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::accept_async_with_config;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;

/// One client of the hub.
pub(super) struct Connection {
    pub(super) remote: SocketAddr,
    pub(super) hub: broadcast::Sender<String>,
    pub(super) max_message_bytes: usize,
    pub(super) logger: Logger,
}

impl Connection {
    pub(super) async fn serve<S>(self, stream: S)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        // Oversized frames must reach the read loop so they can be skipped
        // without tearing down the socket.
        let mut ws_config = WebSocketConfig::default();
        ws_config.max_message_size = ws_config
            .max_message_size
            .map(|limit| limit.max(self.max_message_bytes));
        ws_config.max_frame_size = ws_config
            .max_frame_size
            .map(|limit| limit.max(self.max_message_bytes));

        let socket = match accept_async_with_config(stream, Some(ws_config)).await {
            Ok(socket) => socket,
            Err(e) => {
                self.logger
                    .warn(&format!("Handshake with {} failed: {}", self.remote, e));
                return;
            }
        };
        // Subscribe before reading so this client also sees its own frames.
        let mut relayed = self.hub.subscribe();
        self.logger.info(&format!(
            "Client {} connected ({} online)",
            self.remote,
            self.hub.receiver_count()
        ));
        let (mut write, mut read) = socket.split();

        loop {
            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) if text.len() > self.max_message_bytes => {
                        self.logger.warn(&format!(
                            "Dropped {} byte frame from {} (limit {})",
                            text.len(),
                            self.remote,
                            self.max_message_bytes
                        ));
                    }
                    Some(Ok(Message::Text(text))) => {
                        self.logger.debug(&format!(
                            "{} bytes from {}",
                            text.len(),
                            self.remote
                        ));
                        let _ = self.hub.send(text);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        self.logger
                            .warn(&format!("Read from {} failed: {}", self.remote, e));
                        break;
                    }
                },
                next = relayed.recv() => match next {
                    Ok(text) => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            self.logger
                                .warn(&format!("Write to {} failed: {}", self.remote, e));
                            break;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        self.logger.warn(&format!(
                            "Client {} lagged, {} frames dropped",
                            self.remote, missed
                        ));
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        drop(relayed);
        self.logger.info(&format!(
            "Client {} disconnected ({} online)",
            self.remote,
            self.hub.receiver_count()
        ));
    }
}
