//! Peer session lifecycle.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    /// Peer connection built, no description exchanged yet
    Created,
    /// Offer or answer in flight
    Signaling,
    /// Data channel open
    Connected,
    /// Torn down; terminal
    Closed,
}

impl PeerState {
    pub fn can_advance(self, to: PeerState) -> bool {
        use PeerState::*;
        matches!(
            (self, to),
            (Created, Signaling) | (Signaling, Connected) | (Created | Signaling | Connected, Closed)
        )
    }
}

/// State shared between the session handle and the webrtc callbacks.
#[derive(Debug, Clone)]
pub(crate) struct StateCell(Arc<Mutex<PeerState>>);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Mutex::new(PeerState::Created)))
    }

    pub(crate) fn get(&self) -> PeerState {
        *self.0.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Moves to `to` if allowed. Returns whether the state changed.
    pub(crate) fn advance(&self, to: PeerState) -> bool {
        let mut state = self.0.lock().unwrap_or_else(|p| p.into_inner());
        if state.can_advance(to) {
            *state = to;
            true
        } else {
            false
        }
    }
}
