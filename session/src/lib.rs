//! Session layer of the peer chat: identifier codes, wire formats, the
//! session state machine and the relay and peer transports it drives.

pub mod code;
pub mod controller;
pub mod error;
pub mod peer;
pub mod protocol;
pub mod relay;
pub mod runtime;
pub mod sink;

pub use code::{CodeGenerator, RandomCodes, SessionCode, is_valid_code};
pub use controller::{Action, ConnectionState, Controller, Message, SessionEvent, SessionView};
pub use error::SessionError;
pub use peer::{PeerOptions, PeerSession, PeerState};
pub use relay::{DEFAULT_RELAY_URL, RelayClient, RelayOptions};
pub use runtime::{Command, Notify, RuntimeConfig, Update, run};
