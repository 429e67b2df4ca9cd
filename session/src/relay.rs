//! Relay Client: a WebSocket connection to the shared relay.
//!
//! The relay is an unauthenticated broadcast channel. Every frame any
//! client sends may reach every other client, so addressing happens in the
//! envelopes and filtering happens on arrival, in the controller.

use crate::controller::SessionEvent;
use crate::protocol::Envelope;
use crate::sink::EventSink;
use futures_util::{SinkExt, StreamExt};
use logging::Logger;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{Connector, connect_async_tls_with_config};

/// Relay used when no configuration says otherwise.
pub const DEFAULT_RELAY_URL: &str = "wss://ws.postman-echo.com/raw";

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default)]
pub struct RelayOptions {
    /// Skip certificate checks, for self-hosted relays with self-signed certs.
    pub accept_invalid_certs: bool,
}

pub struct RelayClient {
    outgoing: Option<UnboundedSender<String>>,
    open: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
    logger: Logger,
}

impl RelayClient {
    /// Starts connecting in the background and returns at once.
    /// `RelayOpened` or `RelayError` reports the outcome through `sink`.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn open(url: &str, options: &RelayOptions, sink: EventSink, logger: Logger) -> Self {
        let (outgoing, queue) = unbounded_channel();
        let open = Arc::new(AtomicBool::new(false));

        logger.info(&format!("[RELAY] Connecting to {}", url));
        let task = tokio::spawn(run_connection(
            url.to_string(),
            options.clone(),
            queue,
            open.clone(),
            sink,
            logger.clone(),
        ));

        Self {
            outgoing: Some(outgoing),
            open,
            task: Some(task),
            logger,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Queues `envelope`. Dropped without error when the socket is not open.
    pub fn send(&self, envelope: &Envelope) {
        let queued = self.is_open()
            && self
                .outgoing
                .as_ref()
                .is_some_and(|tx| tx.send(envelope.encode()).is_ok());
        if !queued {
            self.logger
                .debug("[RELAY] Channel not open, envelope dropped");
        }
    }

    /// Closes the socket. Calling it again, or before the socket opened, is fine.
    pub fn close(&mut self) {
        let _ = self.detach();
    }

    /// Like [`RelayClient::close`], but waits until the close frame is out.
    pub async fn shutdown(&mut self) {
        if let Some(task) = self.detach()
            && tokio::time::timeout(SHUTDOWN_GRACE, task).await.is_err()
        {
            self.logger.warn("[RELAY] Close timed out");
        }
    }

    /// Stops the connection. Returns the task when it still has a goodbye
    /// to send.
    fn detach(&mut self) -> Option<JoinHandle<()>> {
        let was_open = self.open.swap(false, Ordering::SeqCst);
        // Dropping the queue sender lets an open connection say goodbye.
        self.outgoing = None;
        let task = self.task.take()?;
        self.logger.info("[RELAY] Closed");
        if was_open {
            Some(task)
        } else {
            task.abort();
            None
        }
    }
}

impl Drop for RelayClient {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_connection(
    url: String,
    options: RelayOptions,
    mut queue: UnboundedReceiver<String>,
    open: Arc<AtomicBool>,
    sink: EventSink,
    logger: Logger,
) {
    let tls = match native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(options.accept_invalid_certs)
        .build()
    {
        Ok(tls) => tls,
        Err(e) => {
            logger.error(&format!("[RELAY] TLS setup failed: {}", e));
            sink.emit(SessionEvent::RelayError(e.to_string()));
            return;
        }
    };

    let socket = match connect_async_tls_with_config(
        url.as_str(),
        None,
        false,
        Some(Connector::NativeTls(tls)),
    )
    .await
    {
        Ok((socket, _response)) => socket,
        Err(e) => {
            logger.error(&format!("[RELAY] Connection to {} failed: {}", url, e));
            sink.emit(SessionEvent::RelayError(e.to_string()));
            return;
        }
    };

    open.store(true, Ordering::SeqCst);
    logger.info("[RELAY] Connected");
    sink.emit(SessionEvent::RelayOpened);

    let (mut write, mut read) = socket.split();
    loop {
        tokio::select! {
            queued = queue.recv() => match queued {
                Some(text) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        logger.error(&format!("[RELAY] Send failed: {}", e));
                        open.store(false, Ordering::SeqCst);
                        sink.emit(SessionEvent::RelayError(e.to_string()));
                        return;
                    }
                }
                None => {
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
            },
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => sink.emit(SessionEvent::RelayMessage(text)),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    logger.error(&format!("[RELAY] Read failed: {}", e));
                    open.store(false, Ordering::SeqCst);
                    sink.emit(SessionEvent::RelayError(e.to_string()));
                    return;
                }
            },
        }
    }

    open.store(false, Ordering::SeqCst);
    logger.info("[RELAY] Connection closed");
    sink.emit(SessionEvent::RelayClosed);
}
