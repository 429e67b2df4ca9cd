//! Two controllers wired together through a simulated broadcast relay and
//! a simulated peer link, exercising the full connect and chat flow.

use session::code::{CodeGenerator, SessionCode};
use session::protocol::{DataMessage, Envelope, SignalKind, SignalPayload};
use session::{Action, ConnectionState, Controller, SessionError, SessionEvent};
use std::collections::VecDeque;

struct Scripted(VecDeque<&'static str>);

impl CodeGenerator for Scripted {
    fn generate(&mut self) -> SessionCode {
        SessionCode::parse(self.0.pop_front().unwrap_or("ZZZZZ")).unwrap()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

impl Side {
    fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Drives both controllers until no work is left.
struct Harness {
    a: Controller<Scripted>,
    b: Controller<Scripted>,
    pending: VecDeque<(Side, SessionEvent)>,
    /// Every envelope that crossed the relay, in order.
    relay_log: Vec<(Side, Envelope)>,
    relay_open: [bool; 2],
    peer_open: [bool; 2],
    errors: Vec<(Side, String)>,
}

impl Harness {
    fn new(a_codes: &[&'static str], b_codes: &[&'static str]) -> Self {
        let scripted = |codes: &[&'static str]| Scripted(codes.iter().copied().collect());
        let mut harness = Harness {
            a: Controller::new(scripted(a_codes)),
            b: Controller::new(scripted(b_codes)),
            pending: VecDeque::new(),
            relay_log: Vec::new(),
            relay_open: [false; 2],
            peer_open: [false; 2],
            errors: Vec::new(),
        };
        let a = harness.a.start();
        harness.apply(Side::A, a);
        let b = harness.b.start();
        harness.apply(Side::B, b);
        harness.settle();
        harness
    }

    fn controller(&mut self, side: Side) -> &mut Controller<Scripted> {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    fn index(side: Side) -> usize {
        match side {
            Side::A => 0,
            Side::B => 1,
        }
    }

    fn apply(&mut self, side: Side, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::OpenRelay => {
                    self.relay_open[Self::index(side)] = true;
                    self.pending.push_back((side, SessionEvent::RelayOpened));
                }
                Action::CloseRelay => self.relay_open[Self::index(side)] = false,
                Action::SendRelay(envelope) => {
                    if !self.relay_open[Self::index(side)] {
                        continue;
                    }
                    self.relay_log.push((side, envelope.clone()));
                    // Broadcast: both sides hear every frame.
                    for listener in [Side::A, Side::B] {
                        if self.relay_open[Self::index(listener)] {
                            self.pending
                                .push_back((listener, SessionEvent::RelayMessage(envelope.encode())));
                        }
                    }
                }
                Action::CreatePeer { initiator } => {
                    self.peer_open[Self::index(side)] = true;
                    if initiator {
                        self.pending.push_back((
                            side,
                            SessionEvent::PeerSignal(SignalPayload::offer("offer-sdp")),
                        ));
                    }
                }
                Action::SignalPeer(signal) => match signal.kind {
                    SignalKind::Offer => self.pending.push_back((
                        side,
                        SessionEvent::PeerSignal(SignalPayload::answer("answer-sdp")),
                    )),
                    SignalKind::Answer => {
                        self.pending.push_back((side, SessionEvent::PeerConnected));
                        self.pending.push_back((side.other(), SessionEvent::PeerConnected));
                    }
                },
                Action::SendPeer(frame) => {
                    if self.peer_open[Self::index(side.other())] {
                        self.pending
                            .push_back((side.other(), SessionEvent::PeerData(frame)));
                    }
                }
                Action::ClosePeer => {
                    let was_open = std::mem::replace(&mut self.peer_open[Self::index(side)], false);
                    if was_open && self.peer_open[Self::index(side.other())] {
                        self.pending.push_back((side.other(), SessionEvent::PeerClosed));
                    }
                }
                Action::ShowError(text) => self.errors.push((side, text)),
            }
        }
    }

    fn settle(&mut self) {
        while let Some((side, event)) = self.pending.pop_front() {
            let actions = self.controller(side).handle(event);
            self.apply(side, actions);
        }
    }

    fn connect(&mut self, side: Side, code: &str) -> Result<(), SessionError> {
        let actions = self.controller(side).start_connection(code)?;
        self.apply(side, actions);
        self.settle();
        Ok(())
    }

    fn send(&mut self, side: Side, text: &str) {
        let actions = self.controller(side).send_message(text);
        self.apply(side, actions);
        self.settle();
    }

    fn disconnect(&mut self, side: Side) {
        let actions = self.controller(side).disconnect();
        self.apply(side, actions);
        self.settle();
    }
}

fn code(s: &str) -> SessionCode {
    SessionCode::parse(s).unwrap()
}

#[test]
fn test_relay_carries_join_offer_then_answer() {
    let mut h = Harness::new(&["MYCOD", "ANEW1"], &["THEIR", "BNEW1"]);
    h.relay_log.clear();

    h.connect(Side::A, "THEIR").unwrap();

    let signals: Vec<_> = h.relay_log.iter().map(|(side, env)| (*side, env.clone())).collect();
    assert_eq!(
        signals[..3],
        [
            (Side::A, Envelope::join(code("THEIR"))),
            (
                Side::A,
                Envelope::signal(code("MYCOD"), code("THEIR"), SignalPayload::offer("offer-sdp"))
            ),
            (
                Side::B,
                Envelope::signal(code("THEIR"), code("MYCOD"), SignalPayload::answer("answer-sdp"))
            ),
        ]
    );
    assert_eq!(h.a.state().connection, ConnectionState::Connected);
    assert_eq!(h.b.state().connection, ConnectionState::Connected);
    assert!(h.a.state().initiator);
    assert!(!h.b.state().initiator);
}

#[test]
fn test_names_come_from_hello() {
    let mut h = Harness::new(&["MYCOD"], &["THEIR"]);
    h.connect(Side::A, "their").unwrap();

    assert_eq!(h.a.view().peer_name, "THEIR");
    assert_eq!(h.b.view().peer_name, "MYCOD");
    assert_eq!(h.b.view().peer_code.as_deref(), Some("MYCOD"));
    assert!(h.a.view().messages.is_empty());
}

#[test]
fn test_messages_arrive_in_order_both_ways() {
    let mut h = Harness::new(&["MYCOD"], &["THEIR"]);
    h.connect(Side::A, "THEIR").unwrap();

    h.send(Side::A, "hi");
    h.send(Side::B, "hello");
    h.send(Side::A, "  how are you  ");

    let a: Vec<_> = h.a.view().messages.iter().map(|m| (m.text.clone(), m.is_self)).collect();
    let b: Vec<_> = h.b.view().messages.iter().map(|m| (m.text.clone(), m.is_self)).collect();
    assert_eq!(
        a,
        [
            ("hi".to_string(), true),
            ("hello".to_string(), false),
            ("how are you".to_string(), true),
        ]
    );
    assert_eq!(
        b,
        [
            ("hi".to_string(), false),
            ("hello".to_string(), true),
            ("how are you".to_string(), false),
        ]
    );
}

#[test]
fn test_invalid_code_leaves_everything_untouched() {
    let mut h = Harness::new(&["AB12X"], &["THEIR"]);
    let before = h.a.view();
    h.relay_log.clear();

    let err = h.connect(Side::A, "abc").unwrap_err();
    assert!(matches!(err, SessionError::InvalidCode(_)));
    assert_eq!(err.to_string(), "Please enter a valid 5-character code (code must be 5 characters, got 3)");
    assert_eq!(h.a.view(), before);
    assert!(h.relay_log.is_empty());
}

#[test]
fn test_disconnect_resets_both_sides() {
    let mut h = Harness::new(&["MYCOD", "ANEW1"], &["THEIR", "BNEW1"]);
    h.connect(Side::A, "THEIR").unwrap();
    h.send(Side::A, "bye soon");

    h.disconnect(Side::A);

    let a = h.a.view();
    assert_eq!(a.connection, ConnectionState::Idle);
    assert_eq!(a.my_code, "ANEW1");
    assert!(a.messages.is_empty());
    assert_eq!(a.peer_code, None);

    let b = h.b.view();
    assert_eq!(b.connection, ConnectionState::Idle);
    assert_eq!(b.my_code, "BNEW1");
}

#[test]
fn test_reconnect_after_disconnect() {
    let mut h = Harness::new(&["MYCOD", "ANEW1"], &["THEIR", "BNEW1"]);
    h.connect(Side::A, "THEIR").unwrap();
    h.disconnect(Side::A);

    // Roles swap: B now dials A's fresh code.
    h.connect(Side::B, "ANEW1").unwrap();
    assert_eq!(h.a.state().connection, ConnectionState::Connected);
    assert!(h.b.state().initiator);

    h.send(Side::B, "again");
    assert_eq!(h.a.view().messages.last().map(|m| m.text.as_str()), Some("again"));
}

#[test]
fn test_third_party_offer_is_ignored_while_connected() {
    let mut h = Harness::new(&["MYCOD"], &["THEIR"]);
    h.connect(Side::A, "THEIR").unwrap();

    let stray = Envelope::signal(code("OTHER"), code("THEIR"), SignalPayload::offer("x"));
    let actions = h.b.handle(SessionEvent::RelayMessage(stray.encode()));
    assert!(actions.is_empty());
    assert_eq!(h.b.view().peer_code.as_deref(), Some("MYCOD"));
}

#[test]
fn test_hello_frame_is_not_shown_as_message() {
    let mut h = Harness::new(&["MYCOD"], &["THEIR"]);
    h.connect(Side::A, "THEIR").unwrap();

    let actions = h.a.handle(SessionEvent::PeerData(
        DataMessage::Hello { name: "Bob".into() }.encode(),
    ));
    assert!(actions.is_empty());
    assert_eq!(h.a.view().peer_name, "Bob");
    assert!(h.a.view().messages.is_empty());
}
