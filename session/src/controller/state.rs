//! Session state owned by the controller, and the snapshot handed to the UI.

use crate::code::SessionCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name shown for the remote party until it introduces itself.
pub const DEFAULT_PEER_NAME: &str = "Friend";

/// Which screen the UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "idle"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// One chat line. `is_self` marks lines typed locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(rename = "self")]
    pub is_self: bool,
}

impl Message {
    pub fn outgoing(text: String) -> Self {
        Self {
            text,
            is_self: true,
        }
    }

    pub fn incoming(text: String) -> Self {
        Self {
            text,
            is_self: false,
        }
    }
}

/// Lifecycle of the relay connection as the controller last heard it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RelayLink {
    Closed,
    Opening,
    Open,
    Failed,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub my_code: SessionCode,
    pub peer_code: Option<SessionCode>,
    pub initiator: bool,
    pub connection: ConnectionState,
    pub messages: Vec<Message>,
    pub peer_name: String,
    pub(crate) relay: RelayLink,
    pub(crate) peer_active: bool,
}

impl SessionState {
    pub(crate) fn fresh(my_code: SessionCode) -> Self {
        Self {
            my_code,
            peer_code: None,
            initiator: false,
            connection: ConnectionState::Idle,
            messages: Vec::new(),
            peer_name: String::new(),
            relay: RelayLink::Closed,
            peer_active: false,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            connection: self.connection,
            my_code: self.my_code.to_string(),
            peer_code: self.peer_code.as_ref().map(ToString::to_string),
            peer_name: self.peer_name.clone(),
            initiator: self.initiator,
            messages: self.messages.clone(),
        }
    }
}

/// Read-only copy of the state, safe to send to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub connection: ConnectionState,
    pub my_code: String,
    pub peer_code: Option<String>,
    pub peer_name: String,
    pub initiator: bool,
    pub messages: Vec<Message>,
}

impl SessionView {
    /// Placeholder shown before the runtime publishes its first state.
    pub fn placeholder() -> Self {
        Self {
            connection: ConnectionState::Idle,
            my_code: "-----".to_string(),
            peer_code: None,
            peer_name: String::new(),
            initiator: false,
            messages: Vec::new(),
        }
    }
}
