//! Application Module - MVU Controller
//!
//! Coordinates the pages with the session runtime, which runs on its own
//! thread.
//!
//! ```text
//! View (pages) --> UiCommand --> ui_handler --> Command --> session runtime
//!
//! session runtime --> Update --> logic_handler --> SessionView / inline error
//! ```

mod logic_handler;
mod state;
mod ui_handler;

pub use state::App;
