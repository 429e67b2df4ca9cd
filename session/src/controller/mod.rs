//! Session Controller.
//!
//! A pure state machine: user requests and [`SessionEvent`]s go in, the
//! state is updated and a list of [`Action`]s comes out. It never touches a
//! socket, which keeps every transition testable without a network.

mod event;
mod state;

pub use event::{Action, SessionEvent};
pub use state::{ConnectionState, DEFAULT_PEER_NAME, Message, SessionState, SessionView};

use crate::code::{CodeGenerator, RandomCodes, SessionCode};
use crate::error::SessionError;
use crate::protocol::{DataMessage, Envelope, MAX_MESSAGE_CHARS, SignalKind, clamp_text};
use state::RelayLink;

/// Text shown when the relay connection fails.
pub const RELAY_ERROR_TEXT: &str = "Signaling error. Try again.";

/// Longest peer name kept from a `hello`.
const MAX_NAME_CHARS: usize = 32;

pub struct Controller<G = RandomCodes> {
    state: SessionState,
    codes: G,
}

impl<G: CodeGenerator> Controller<G> {
    pub fn new(mut codes: G) -> Self {
        let state = SessionState::fresh(codes.generate());
        Self { state, codes }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> SessionView {
        self.state.view()
    }

    /// Opens the relay so this party can be reached under its own code.
    /// Does nothing while the relay is already opening or open.
    pub fn start(&mut self) -> Vec<Action> {
        match self.state.relay {
            RelayLink::Closed | RelayLink::Failed => {
                self.state.relay = RelayLink::Opening;
                vec![Action::OpenRelay]
            }
            RelayLink::Opening | RelayLink::Open => Vec::new(),
        }
    }

    /// Connects to `target` as the initiator.
    ///
    /// On error nothing changes and no action is produced.
    pub fn start_connection(&mut self, target: &str) -> Result<Vec<Action>, SessionError> {
        if self.state.connection != ConnectionState::Idle {
            return Err(SessionError::Busy(self.state.connection));
        }
        let target = SessionCode::parse(target)?;
        if target == self.state.my_code {
            return Err(SessionError::OwnCode);
        }

        self.state.peer_code = Some(target);
        self.state.initiator = true;
        self.state.connection = ConnectionState::Connecting;
        self.state.messages.clear();

        Ok(match self.state.relay {
            RelayLink::Open => self.begin_as_initiator(),
            RelayLink::Opening => Vec::new(),
            RelayLink::Closed | RelayLink::Failed => self.start(),
        })
    }

    /// Sends a chat line. Blank text and calls outside `Connected` are ignored.
    pub fn send_message(&mut self, text: &str) -> Vec<Action> {
        if self.state.connection != ConnectionState::Connected {
            return Vec::new();
        }
        let text = clamp_text(text);
        if text.is_empty() {
            return Vec::new();
        }

        let frame = DataMessage::Msg { text: text.clone() }.encode();
        self.state.messages.push(Message::outgoing(text));
        vec![Action::SendPeer(frame)]
    }

    /// Tears everything down, draws a new code and starts listening again.
    /// Safe to call from any state, any number of times.
    pub fn disconnect(&mut self) -> Vec<Action> {
        let mut actions = vec![Action::ClosePeer, Action::CloseRelay];
        self.state = SessionState::fresh(self.codes.generate());
        actions.extend(self.start());
        actions
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<Action> {
        match event {
            SessionEvent::RelayOpened => self.on_relay_opened(),
            SessionEvent::RelayMessage(text) => self.on_relay_message(&text),
            SessionEvent::RelayError(_) => self.on_relay_error(),
            SessionEvent::RelayClosed => {
                if matches!(self.state.relay, RelayLink::Opening | RelayLink::Open) {
                    self.state.relay = RelayLink::Closed;
                }
                Vec::new()
            }
            SessionEvent::PeerSignal(signal) => {
                match (self.state.peer_active, self.state.peer_code.clone()) {
                    (true, Some(peer)) => vec![Action::SendRelay(Envelope::signal(
                        self.state.my_code.clone(),
                        peer,
                        signal,
                    ))],
                    _ => Vec::new(),
                }
            }
            SessionEvent::PeerConnected => self.on_peer_connected(),
            SessionEvent::PeerData(bytes) => self.on_peer_data(&bytes),
            SessionEvent::PeerClosed | SessionEvent::PeerError(_) => {
                if self.state.peer_active {
                    self.disconnect()
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn begin_as_initiator(&mut self) -> Vec<Action> {
        let Some(peer) = self.state.peer_code.clone() else {
            return Vec::new();
        };
        self.state.peer_active = true;
        vec![
            Action::SendRelay(Envelope::join(peer)),
            Action::CreatePeer { initiator: true },
        ]
    }

    fn on_relay_opened(&mut self) -> Vec<Action> {
        if self.state.relay != RelayLink::Opening {
            return Vec::new();
        }
        self.state.relay = RelayLink::Open;

        match self.state.connection {
            ConnectionState::Idle => {
                vec![Action::SendRelay(Envelope::join(self.state.my_code.clone()))]
            }
            ConnectionState::Connecting if self.state.initiator && !self.state.peer_active => {
                self.begin_as_initiator()
            }
            _ => Vec::new(),
        }
    }

    fn on_relay_error(&mut self) -> Vec<Action> {
        if !matches!(self.state.relay, RelayLink::Opening | RelayLink::Open) {
            return Vec::new();
        }
        self.state.relay = RelayLink::Failed;
        vec![Action::ShowError(RELAY_ERROR_TEXT.to_string())]
    }

    fn on_relay_message(&mut self, text: &str) -> Vec<Action> {
        if self.state.relay != RelayLink::Open {
            return Vec::new();
        }
        let Some(Envelope::Signal { from, to, signal }) = Envelope::decode(text) else {
            return Vec::new();
        };
        if to != self.state.my_code || from == self.state.my_code {
            return Vec::new();
        }

        match self.state.connection {
            ConnectionState::Idle if signal.kind == SignalKind::Offer => {
                self.state.peer_code = Some(from);
                self.state.initiator = false;
                self.state.connection = ConnectionState::Connecting;
                self.state.messages.clear();
                self.state.peer_active = true;
                vec![
                    Action::CreatePeer { initiator: false },
                    Action::SignalPeer(signal),
                ]
            }
            ConnectionState::Connecting
                if self.state.initiator
                    && self.state.peer_active
                    && signal.kind == SignalKind::Answer
                    && self.state.peer_code.as_ref() == Some(&from) =>
            {
                vec![Action::SignalPeer(signal)]
            }
            _ => Vec::new(),
        }
    }

    fn on_peer_connected(&mut self) -> Vec<Action> {
        if !self.state.peer_active || self.state.connection != ConnectionState::Connecting {
            return Vec::new();
        }
        self.state.connection = ConnectionState::Connected;
        self.state.peer_name = self
            .state
            .peer_code
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| DEFAULT_PEER_NAME.to_string());
        self.state.messages.clear();

        let hello = DataMessage::Hello {
            name: self.state.my_code.to_string(),
        };
        vec![Action::SendPeer(hello.encode())]
    }

    fn on_peer_data(&mut self, bytes: &[u8]) -> Vec<Action> {
        if self.state.connection != ConnectionState::Connected {
            return Vec::new();
        }
        match DataMessage::decode(bytes) {
            Some(DataMessage::Hello { name }) => {
                let name = name.trim();
                self.state.peer_name = if name.is_empty() {
                    DEFAULT_PEER_NAME.to_string()
                } else {
                    name.chars().take(MAX_NAME_CHARS).collect()
                };
            }
            Some(DataMessage::Msg { text }) => {
                let text = text.chars().take(MAX_MESSAGE_CHARS).collect();
                self.state.messages.push(Message::incoming(text));
            }
            None => {}
        }
        Vec::new()
    }
}
