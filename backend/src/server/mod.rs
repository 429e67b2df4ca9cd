//! WebSocket broadcast server.

mod connection;

use crate::config::ServerConfig;
use crate::error::RelayError;
use connection::Connection;
use logging::Logger;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_native_tls::TlsAcceptor;

pub struct RelayServer {
    listener: TcpListener,
    hub: broadcast::Sender<String>,
    tls_acceptor: Option<TlsAcceptor>,
    max_message_bytes: usize,
    logger: Logger,
}

impl RelayServer {
    /// Binds the listener. Port 0 picks a free port, see [`RelayServer::local_addr`].
    pub async fn bind(config: &ServerConfig, logger: Logger) -> Result<Self, RelayError> {
        let listener = TcpListener::bind(config.bind_addr()).await?;
        let (hub, _) = broadcast::channel(config.channel_capacity.max(1));
        Ok(RelayServer {
            listener,
            hub,
            tls_acceptor: None,
            max_message_bytes: config.max_message_bytes,
            logger,
        })
    }

    /// Serve `wss://` instead of `ws://`.
    pub fn with_tls(mut self, acceptor: TlsAcceptor) -> Self {
        self.tls_acceptor = Some(acceptor);
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        Ok(self.listener.local_addr()?)
    }

    /// Number of clients currently subscribed to the hub.
    pub fn client_count(&self) -> usize {
        self.hub.receiver_count()
    }

    /// Accepts clients until the task is dropped. Share the server through an
    /// `Arc` to keep reading [`RelayServer::client_count`] while it runs.
    pub async fn run(&self) -> Result<(), RelayError> {
        let protocol = if self.tls_acceptor.is_some() { "wss" } else { "ws" };
        self.logger.info(&format!(
            "Relay listening on {}://{}",
            protocol,
            self.local_addr()?
        ));

        loop {
            let (stream, remote) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    self.logger
                        .error(&format!("Failed to accept connection: {}", e));
                    continue;
                }
            };

            let connection = Connection {
                remote,
                hub: self.hub.clone(),
                max_message_bytes: self.max_message_bytes,
                logger: self
                    .logger
                    .for_component("Client")
                    .unwrap_or_else(|_| self.logger.clone()),
            };
            let tls_acceptor = self.tls_acceptor.clone();

            tokio::spawn(async move {
                match tls_acceptor {
                    Some(acceptor) => match acceptor.accept(stream).await {
                        Ok(tls_stream) => connection.serve(tls_stream).await,
                        Err(e) => connection
                            .logger
                            .warn(&format!("TLS handshake with {} failed: {}", remote, e)),
                    },
                    None => connection.serve(stream).await,
                }
            });
        }
    }
}
