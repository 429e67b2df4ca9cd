//! Wire formats.
//!
//! - [`Envelope`]: JSON text frames exchanged through the relay.
//! - [`DataMessage`]: JSON frames exchanged over the peer data channel.
//!
//! Decoding never fails loudly. Anything that does not parse is returned as
//! `None` and the caller drops it.

mod data_message;
mod envelope;

pub use data_message::{DataMessage, MAX_MESSAGE_CHARS, clamp_text};
pub use envelope::{Envelope, SignalKind, SignalPayload};
