//! Peer Session: one WebRTC peer connection carrying one data channel.
//!
//! Descriptions are exchanged non-trickle. Each side publishes its offer or
//! answer only after ICE gathering finished, so the SDP already lists every
//! candidate and one signal per side is enough.

mod state;

pub use state::PeerState;

use crate::controller::SessionEvent;
use crate::protocol::{SignalKind, SignalPayload};
use crate::sink::EventSink;
use logging::Logger;
use state::StateCell;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::interceptor::registry::Registry;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

pub const CHANNEL_LABEL: &str = "chat";
pub const DEFAULT_ICE_SERVER: &str = "stun:stun.l.google.com:19302";

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    #[error("webrtc: {0}")]
    WebRtc(#[from] webrtc::Error),
    #[error("no local description after ICE gathering")]
    MissingDescription,
}

#[derive(Debug, Clone)]
pub struct PeerOptions {
    pub ice_servers: Vec<String>,
}

impl Default for PeerOptions {
    fn default() -> Self {
        Self {
            ice_servers: vec![DEFAULT_ICE_SERVER.to_string()],
        }
    }
}

type ChannelSlot = Arc<Mutex<Option<Arc<RTCDataChannel>>>>;

/// Callback context shared by everything that reports on this session.
#[derive(Clone)]
struct Reporter {
    state: StateCell,
    sink: EventSink,
    logger: Logger,
}

impl Reporter {
    fn connected(&self) {
        if self.state.advance(PeerState::Connected) {
            self.logger.info("[PEER] Data channel open");
            self.sink.emit(SessionEvent::PeerConnected);
        }
    }

    fn closed(&self) {
        if self.state.advance(PeerState::Closed) {
            self.logger.info("[PEER] Closed by remote side");
            self.sink.emit(SessionEvent::PeerClosed);
        }
    }

    fn failed(&self, error: impl std::fmt::Display) {
        if self.state.get() != PeerState::Closed {
            self.logger.error(&format!("[PEER] {}", error));
            self.sink.emit(SessionEvent::PeerError(error.to_string()));
        }
    }
}

pub struct PeerSession {
    pc: Arc<RTCPeerConnection>,
    outgoing: Option<UnboundedSender<Vec<u8>>>,
    reporter: Reporter,
    closed: bool,
}

impl PeerSession {
    /// Builds the peer connection. The initiator opens the data channel and
    /// starts producing its offer, which arrives later as `PeerSignal`. The
    /// responder waits for the remote offer via [`PeerSession::signal`].
    pub async fn create(
        initiator: bool,
        options: &PeerOptions,
        sink: EventSink,
        logger: Logger,
    ) -> Result<Self, PeerError> {
        let pc = Arc::new(build_api()?.new_peer_connection(rtc_config(options)).await?);

        let reporter = Reporter {
            state: StateCell::new(),
            sink,
            logger,
        };
        let slot: ChannelSlot = Arc::new(Mutex::new(None));

        watch_connection(&pc, reporter.clone());

        if initiator {
            let channel = pc.create_data_channel(CHANNEL_LABEL, None).await?;
            attach_channel(channel, &slot, &reporter);
            reporter.state.advance(PeerState::Signaling);

            let pc = pc.clone();
            let reporter = reporter.clone();
            tokio::spawn(async move {
                match make_offer(&pc).await {
                    Ok(sdp) => {
                        reporter.logger.info("[PEER] Offer ready");
                        reporter
                            .sink
                            .emit(SessionEvent::PeerSignal(SignalPayload::offer(sdp)));
                    }
                    Err(e) => reporter.failed(e),
                }
            });
        } else {
            let slot = slot.clone();
            let reporter = reporter.clone();
            pc.on_data_channel(Box::new(move |channel: Arc<RTCDataChannel>| {
                reporter
                    .logger
                    .info(&format!("[PEER] Remote channel '{}'", channel.label()));
                attach_channel(channel, &slot, &reporter);
                Box::pin(async {})
            }));
        }

        let (outgoing, queue) = unbounded_channel();
        tokio::spawn(write_frames(queue, slot, reporter.logger.clone()));

        Ok(Self {
            pc,
            outgoing: Some(outgoing),
            reporter,
            closed: false,
        })
    }

    pub fn state(&self) -> PeerState {
        self.reporter.state.get()
    }

    /// Feeds a remote description. An offer makes this side answer; the
    /// answer arrives as `PeerSignal`.
    pub fn signal(&self, payload: SignalPayload) {
        if self.closed {
            return;
        }
        let pc = self.pc.clone();
        let reporter = self.reporter.clone();
        tokio::spawn(async move {
            let result = match payload.kind {
                SignalKind::Offer => {
                    reporter.state.advance(PeerState::Signaling);
                    answer_offer(&pc, payload.sdp).await.map(Some)
                }
                SignalKind::Answer => accept_answer(&pc, payload.sdp).await.map(|_| None),
            };
            match result {
                Ok(Some(answer)) => {
                    reporter.logger.info("[PEER] Answer ready");
                    reporter.sink.emit(SessionEvent::PeerSignal(answer));
                }
                Ok(None) => reporter.logger.debug("[PEER] Remote answer applied"),
                Err(e) => reporter.failed(e),
            }
        });
    }

    /// Queues a frame for the data channel. Frames leave in call order.
    pub fn send(&self, frame: Vec<u8>) {
        if let Some(outgoing) = &self.outgoing {
            let _ = outgoing.send(frame);
        }
    }

    /// Closes the connection in the background. Idempotent.
    pub fn close(&mut self) {
        if let Some(pc) = self.detach() {
            let logger = self.reporter.logger.clone();
            tokio::spawn(async move { close_connection(&pc, &logger).await });
        }
    }

    /// Closes the connection and waits until the remote side has been told,
    /// for callers about to drop their runtime.
    pub async fn shutdown(&mut self) {
        if let Some(pc) = self.detach() {
            let closing = close_connection(&pc, &self.reporter.logger);
            if tokio::time::timeout(SHUTDOWN_GRACE, closing).await.is_err() {
                self.reporter.logger.warn("[PEER] Close timed out");
            }
        }
    }

    fn detach(&mut self) -> Option<Arc<RTCPeerConnection>> {
        if self.closed {
            return None;
        }
        self.closed = true;
        self.outgoing = None;
        // Local teardown must not be reported back as a remote close.
        self.reporter.state.advance(PeerState::Closed);
        self.reporter.logger.info("[PEER] Closed");
        Some(self.pc.clone())
    }
}

impl Drop for PeerSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn build_api() -> Result<API, PeerError> {
    let mut media_engine = MediaEngine::default();
    media_engine.register_default_codecs()?;
    let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

    Ok(APIBuilder::new()
        .with_media_engine(media_engine)
        .with_interceptor_registry(registry)
        .build())
}

fn rtc_config(options: &PeerOptions) -> RTCConfiguration {
    // No servers means host candidates only, enough on one machine or LAN.
    let ice_servers = if options.ice_servers.is_empty() {
        Vec::new()
    } else {
        vec![RTCIceServer {
            urls: options.ice_servers.clone(),
            ..Default::default()
        }]
    };
    RTCConfiguration {
        ice_servers,
        ..Default::default()
    }
}

async fn close_connection(pc: &RTCPeerConnection, logger: &Logger) {
    if let Err(e) = pc.close().await {
        logger.warn(&format!("[PEER] Close failed: {}", e));
    }
}

fn watch_connection(pc: &RTCPeerConnection, reporter: Reporter) {
    pc.on_peer_connection_state_change(Box::new(move |state: RTCPeerConnectionState| {
        reporter
            .logger
            .debug(&format!("[PEER] Connection state: {}", state));
        match state {
            RTCPeerConnectionState::Failed => reporter.failed("peer connection failed"),
            RTCPeerConnectionState::Closed => reporter.closed(),
            _ => {}
        }
        Box::pin(async {})
    }));
}

fn attach_channel(channel: Arc<RTCDataChannel>, slot: &ChannelSlot, reporter: &Reporter) {
    let on_open = reporter.clone();
    channel.on_open(Box::new(move || {
        on_open.connected();
        Box::pin(async {})
    }));

    let on_message = reporter.clone();
    channel.on_message(Box::new(move |message: DataChannelMessage| {
        on_message
            .sink
            .emit(SessionEvent::PeerData(message.data.to_vec()));
        Box::pin(async {})
    }));

    let on_close = reporter.clone();
    channel.on_close(Box::new(move || {
        on_close.closed();
        Box::pin(async {})
    }));

    *slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(channel);
}

async fn make_offer(pc: &RTCPeerConnection) -> Result<String, PeerError> {
    let offer = pc.create_offer(None).await?;
    publish_local(pc, offer).await
}

async fn answer_offer(pc: &RTCPeerConnection, sdp: String) -> Result<SignalPayload, PeerError> {
    pc.set_remote_description(RTCSessionDescription::offer(sdp)?)
        .await?;
    let answer = pc.create_answer(None).await?;
    let sdp = publish_local(pc, answer).await?;
    Ok(SignalPayload::answer(sdp))
}

async fn accept_answer(pc: &RTCPeerConnection, sdp: String) -> Result<(), PeerError> {
    pc.set_remote_description(RTCSessionDescription::answer(sdp)?)
        .await?;
    Ok(())
}

/// Applies `description` locally and returns the SDP once gathering is done.
async fn publish_local(
    pc: &RTCPeerConnection,
    description: RTCSessionDescription,
) -> Result<String, PeerError> {
    let mut gathered = pc.gathering_complete_promise().await;
    pc.set_local_description(description).await?;
    let _ = gathered.recv().await;
    pc.local_description()
        .await
        .map(|d| d.sdp)
        .ok_or(PeerError::MissingDescription)
}

async fn write_frames(mut queue: UnboundedReceiver<Vec<u8>>, slot: ChannelSlot, logger: Logger) {
    while let Some(frame) = queue.recv().await {
        let channel = slot.lock().unwrap_or_else(|p| p.into_inner()).clone();
        let Some(channel) = channel else {
            logger.warn("[PEER] No data channel yet, frame dropped");
            continue;
        };
        let text = String::from_utf8_lossy(&frame).into_owned();
        if let Err(e) = channel.send_text(text).await {
            logger.warn(&format!("[PEER] Send failed: {}", e));
        }
    }
}
