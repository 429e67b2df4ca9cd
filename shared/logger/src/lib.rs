//! Thread-safe logging shared by the chat client and the relay server.
//!
//! Every [`Logger`] hands its records to a dedicated writer thread, so
//! logging from UI callbacks or async tasks never blocks on file I/O.

pub mod error;
mod log_level;
mod logger;
mod record;

pub use error::{LoggingError, Result};
pub use log_level::LogLevel;
pub use logger::Logger;
