//! Event loop that owns the controller and performs its actions.
//!
//! Runs on its own thread with a current-thread tokio runtime. The UI talks
//! to it through [`Command`]s and hears back through [`Update`]s.

use crate::code::RandomCodes;
use crate::controller::{Action, Controller, SessionEvent, SessionView};
use crate::peer::{PeerOptions, PeerSession};
use crate::relay::{DEFAULT_RELAY_URL, RelayClient, RelayOptions};
use crate::sink::{EventSink, Source, Tagged};
use logging::Logger;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect(String),
    Send(String),
    Disconnect,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    State(SessionView),
    /// A connect request was refused; nothing changed.
    Rejected(String),
    Error(String),
}

/// Wakes whoever consumes updates, e.g. requests a UI repaint.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub relay_url: String,
    pub relay: RelayOptions,
    pub peer: PeerOptions,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            relay: RelayOptions::default(),
            peer: PeerOptions::default(),
        }
    }
}

/// Blocks until `Shutdown` arrives or every command sender is gone.
pub fn run(
    config: RuntimeConfig,
    launch_code: Option<String>,
    commands: UnboundedReceiver<Command>,
    updates: Sender<Update>,
    notify: Notify,
    logger: Logger,
) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let (session, events) = Runtime::new(config, updates, notify, logger);
        session.run_loop(launch_code, commands, events).await;
    });
    Ok(())
}

struct Runtime {
    controller: Controller<RandomCodes>,
    config: RuntimeConfig,
    relay: Option<RelayClient>,
    peer: Option<PeerSession>,
    relay_gen: u64,
    peer_gen: u64,
    events_tx: UnboundedSender<Tagged>,
    updates: Sender<Update>,
    notify: Notify,
    last_view: Option<SessionView>,
    logger: Logger,
}

impl Runtime {
    fn new(
        config: RuntimeConfig,
        updates: Sender<Update>,
        notify: Notify,
        logger: Logger,
    ) -> (Self, UnboundedReceiver<Tagged>) {
        let (events_tx, events) = unbounded_channel();
        let session = Runtime {
            controller: Controller::new(RandomCodes),
            config,
            relay: None,
            peer: None,
            relay_gen: 0,
            peer_gen: 0,
            events_tx,
            updates,
            notify,
            last_view: None,
            logger,
        };
        (session, events)
    }

    async fn run_loop(
        mut self,
        launch_code: Option<String>,
        mut commands: UnboundedReceiver<Command>,
        mut events: UnboundedReceiver<Tagged>,
    ) {
        self.logger.info(&format!(
            "[RUNTIME] Started with code {}",
            self.controller.state().my_code
        ));
        let actions = self.controller.start();
        self.apply(actions).await;
        if let Some(code) = launch_code {
            self.connect(&code).await;
        }
        self.publish();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.on_command(command).await,
                },
                Some(tagged) = events.recv() => self.on_event(tagged).await,
            }
            self.publish();
        }

        self.logger.info("[RUNTIME] Shutting down");
        self.shutdown().await;
    }

    /// Closes both channels and waits for the goodbyes, since the tokio
    /// runtime goes away right after.
    async fn shutdown(&mut self) {
        if let Some(mut peer) = self.peer.take() {
            peer.shutdown().await;
        }
        if let Some(mut relay) = self.relay.take() {
            relay.shutdown().await;
        }
    }

    async fn on_command(&mut self, command: Command) {
        match command {
            Command::Connect(code) => self.connect(&code).await,
            Command::Send(text) => {
                let actions = self.controller.send_message(&text);
                self.apply(actions).await;
            }
            Command::Disconnect => {
                self.logger.info("[RUNTIME] Disconnect requested");
                let actions = self.controller.disconnect();
                self.apply(actions).await;
            }
            Command::Shutdown => {}
        }
    }

    async fn connect(&mut self, code: &str) {
        match self.controller.start_connection(code) {
            Ok(actions) => {
                self.logger
                    .info(&format!("[RUNTIME] Connecting to {}", code.trim()));
                self.apply(actions).await;
            }
            Err(e) => {
                self.logger
                    .warn(&format!("[RUNTIME] Connect to '{}' refused: {}", code, e));
                self.push(Update::Rejected(e.to_string()));
            }
        }
    }

    async fn on_event(&mut self, tagged: Tagged) {
        let live = match tagged.source {
            Source::Relay(generation) => self.relay.is_some() && generation == self.relay_gen,
            Source::Peer(generation) => self.peer.is_some() && generation == self.peer_gen,
        };
        if !live {
            self.logger
                .debug(&format!("[RUNTIME] Stale event from {:?}", tagged.source));
            return;
        }
        let actions = self.controller.handle(tagged.event);
        self.apply(actions).await;
    }

    async fn apply(&mut self, actions: Vec<Action>) {
        let mut queue = VecDeque::from(actions);
        while let Some(action) = queue.pop_front() {
            match action {
                Action::OpenRelay => {
                    self.close_relay();
                    self.relay_gen += 1;
                    let sink = EventSink::new(self.events_tx.clone(), Source::Relay(self.relay_gen));
                    self.relay = Some(RelayClient::open(
                        &self.config.relay_url,
                        &self.config.relay,
                        sink,
                        self.logger.clone(),
                    ));
                }
                Action::SendRelay(envelope) => match &self.relay {
                    Some(relay) => relay.send(&envelope),
                    None => self.logger.debug("[RUNTIME] No relay, envelope dropped"),
                },
                Action::CloseRelay => self.close_relay(),
                Action::CreatePeer { initiator } => {
                    self.close_peer();
                    self.peer_gen += 1;
                    let sink = EventSink::new(self.events_tx.clone(), Source::Peer(self.peer_gen));
                    match PeerSession::create(initiator, &self.config.peer, sink, self.logger.clone())
                        .await
                    {
                        Ok(peer) => self.peer = Some(peer),
                        Err(e) => {
                            self.logger
                                .error(&format!("[RUNTIME] Peer setup failed: {}", e));
                            let followup = self.controller.handle(SessionEvent::PeerError(e.to_string()));
                            queue.extend(followup);
                        }
                    }
                }
                Action::SignalPeer(signal) => {
                    if let Some(peer) = &self.peer {
                        peer.signal(signal);
                    }
                }
                Action::SendPeer(frame) => {
                    if let Some(peer) = &self.peer {
                        peer.send(frame);
                    }
                }
                Action::ClosePeer => self.close_peer(),
                Action::ShowError(text) => self.push(Update::Error(text)),
            }
        }
    }

    fn close_relay(&mut self) {
        if let Some(mut relay) = self.relay.take() {
            relay.close();
        }
    }

    fn close_peer(&mut self) {
        if let Some(mut peer) = self.peer.take() {
            peer.close();
        }
    }

    fn publish(&mut self) {
        let view = self.controller.view();
        if self.last_view.as_ref() == Some(&view) {
            return;
        }
        self.last_view = Some(view.clone());
        self.push(Update::State(view));
    }

    fn push(&self, update: Update) {
        if self.updates.send(update).is_ok() {
            (self.notify)();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::SessionCode;
    use crate::controller::ConnectionState;
    use crate::protocol::{Envelope, SignalPayload};
    use std::sync::mpsc::{Receiver, channel};

    // Nothing listens here; relay connects fail in the background and their
    // events are never pumped by these tests.
    const DEAD_RELAY: &str = "ws://127.0.0.1:1";

    fn runtime(peer: PeerOptions) -> (Runtime, UnboundedReceiver<Tagged>, Receiver<Update>) {
        let config = RuntimeConfig {
            relay_url: DEAD_RELAY.to_string(),
            relay: RelayOptions::default(),
            peer,
        };
        let (updates, received) = channel();
        let (session, events) = Runtime::new(config, updates, Arc::new(|| {}), Logger::discard());
        (session, events, received)
    }

    fn code(s: &str) -> SessionCode {
        SessionCode::parse(s).unwrap()
    }

    fn relay_event(generation: u64, event: SessionEvent) -> Tagged {
        Tagged {
            source: Source::Relay(generation),
            event,
        }
    }

    fn offer_to(my_code: &str) -> SessionEvent {
        let envelope = Envelope::signal(code("PEER1"), code(my_code), SignalPayload::offer("v=0"));
        SessionEvent::RelayMessage(envelope.encode())
    }

    fn errors(updates: &Receiver<Update>) -> Vec<String> {
        updates
            .try_iter()
            .filter_map(|update| match update {
                Update::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    async fn started(session: &mut Runtime) {
        let actions = session.controller.start();
        session.apply(actions).await;
        session.on_event(relay_event(1, SessionEvent::RelayOpened)).await;
    }

    #[tokio::test]
    async fn test_disconnect_publishes_a_new_code_and_reopens_relay() {
        let (mut session, _events, updates) = runtime(PeerOptions::default());
        started(&mut session).await;
        session.publish();
        let before = session.controller.view().my_code;

        session.on_command(Command::Disconnect).await;
        session.publish();

        let after = session.controller.view().my_code;
        assert_ne!(before, after);
        assert_eq!(session.relay_gen, 2);
        let published: Vec<String> = updates
            .try_iter()
            .filter_map(|update| match update {
                Update::State(view) => Some(view.my_code),
                _ => None,
            })
            .collect();
        assert_eq!(published, vec![before, after]);
    }

    #[tokio::test]
    async fn test_events_from_replaced_relay_are_ignored() {
        let (mut session, _events, updates) = runtime(PeerOptions::default());
        started(&mut session).await;
        session.on_command(Command::Disconnect).await;
        session.on_event(relay_event(2, SessionEvent::RelayOpened)).await;
        let my_code = session.controller.view().my_code;

        session.on_event(relay_event(1, offer_to(&my_code))).await;
        session
            .on_event(relay_event(1, SessionEvent::RelayError("late".into())))
            .await;

        assert_eq!(session.controller.view().connection, ConnectionState::Idle);
        assert!(session.peer.is_none());
        assert!(errors(&updates).is_empty());
    }

    #[tokio::test]
    async fn test_events_from_closed_peer_are_ignored() {
        let (mut session, _events, _updates) = runtime(PeerOptions { ice_servers: vec![] });
        started(&mut session).await;
        let my_code = session.controller.view().my_code;

        session.on_event(relay_event(1, offer_to(&my_code))).await;
        assert_eq!(session.peer_gen, 1);
        assert!(session.peer.is_some());

        session.close_peer();
        session
            .on_event(Tagged {
                source: Source::Peer(1),
                event: SessionEvent::PeerConnected,
            })
            .await;

        let view = session.controller.view();
        assert_eq!(view.connection, ConnectionState::Connecting);
        assert_eq!(view.my_code, my_code);
    }

    #[tokio::test]
    async fn test_peer_setup_failure_resets_the_session() {
        // TURN without credentials is refused when the connection is built.
        let (mut session, _events, _updates) = runtime(PeerOptions {
            ice_servers: vec!["turn:relay.invalid:3478".to_string()],
        });
        started(&mut session).await;
        let before = session.controller.view().my_code;

        session.on_command(Command::Connect("PEER1".into())).await;

        let view = session.controller.view();
        assert_eq!(view.connection, ConnectionState::Idle);
        assert_ne!(view.my_code, before);
        assert!(session.peer.is_none());
        assert_eq!(session.relay_gen, 2);
    }

    #[tokio::test]
    async fn test_rejected_connect_changes_nothing() {
        let (mut session, _events, updates) = runtime(PeerOptions::default());
        started(&mut session).await;

        session.on_command(Command::Connect("abc".into())).await;

        assert_eq!(session.controller.view().connection, ConnectionState::Idle);
        assert!(matches!(updates.try_recv(), Ok(Update::Rejected(_))));
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let (mut session, _events, _updates) = runtime(PeerOptions::default());
        started(&mut session).await;

        session.shutdown().await;
        session.shutdown().await;

        assert!(session.relay.is_none());
        assert!(session.peer.is_none());
    }
}
