use crate::protocol::{Envelope, SignalPayload};

/// Everything the outside world can tell the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    RelayOpened,
    /// Raw text frame from the relay; decoding happens in the controller.
    RelayMessage(String),
    RelayError(String),
    RelayClosed,
    /// The local peer produced its offer or answer.
    PeerSignal(SignalPayload),
    PeerConnected,
    /// Raw frame from the data channel.
    PeerData(Vec<u8>),
    PeerClosed,
    PeerError(String),
}

/// Side effects requested by the controller. The runtime performs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenRelay,
    SendRelay(Envelope),
    CloseRelay,
    CreatePeer { initiator: bool },
    SignalPeer(SignalPayload),
    SendPeer(Vec<u8>),
    ClosePeer,
    ShowError(String),
}
