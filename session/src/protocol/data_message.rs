use serde::{Deserialize, Serialize};

/// Longest chat text carried over the data channel, in characters.
pub const MAX_MESSAGE_CHARS: usize = 300;

/// Application frames on the peer data channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataMessage {
    /// Sent once by each side on connect; `name` labels the conversation.
    Hello {
        #[serde(default)]
        name: String,
    },
    Msg { text: String },
}

impl DataMessage {
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}

/// Trims `text` and cuts it to [`MAX_MESSAGE_CHARS`] characters.
pub fn clamp_text(text: &str) -> String {
    text.trim().chars().take(MAX_MESSAGE_CHARS).collect()
}
