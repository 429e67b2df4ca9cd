use crate::code::SessionCode;
use serde::{Deserialize, Serialize};

/// Relay frame. Every client on the relay may see every frame; recipients
/// filter on `to` themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Envelope {
    /// `{"op":"join","code":"XXXXX"}`
    Join { code: SessionCode },
    /// `{"op":"signal","from":"XXXXX","to":"YYYYY","signal":{...}}`
    Signal {
        from: SessionCode,
        to: SessionCode,
        signal: SignalPayload,
    },
}

impl Envelope {
    pub fn join(code: SessionCode) -> Self {
        Envelope::Join { code }
    }

    pub fn signal(from: SessionCode, to: SessionCode, signal: SignalPayload) -> Self {
        Envelope::Signal { from, to, signal }
    }

    pub fn encode(&self) -> String {
        // Only strings and validated codes inside; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn decode(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Offer,
    Answer,
}

/// One complete session description. Shaped like a browser
/// `RTCSessionDescription` so browser peers can read it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPayload {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub sdp: String,
}

impl SignalPayload {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::Answer,
            sdp: sdp.into(),
        }
    }
}
