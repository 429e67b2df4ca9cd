//! UI Command Handler
//!
//! Turns page commands into runtime commands.

use super::state::App;
use crate::events::UiCommand;
use session::{Command, SessionCode, SessionError};

impl App {
    pub(super) fn handle_ui_command(&mut self, command: UiCommand) {
        self.logger
            .debug(&format!("[UI] Handling command: {:?}", command));
        match command {
            UiCommand::Connect(code) => self.handle_connect(code),
            UiCommand::SendMessage(text) => self.send_to_runtime(Command::Send(text)),
            UiCommand::Disconnect => {
                self.inline_error = None;
                self.send_to_runtime(Command::Disconnect);
            }
        }
    }

    /// Malformed codes are caught here so the error shows without a round trip.
    fn handle_connect(&mut self, code: String) {
        match SessionCode::parse(&code) {
            Ok(target) => {
                self.inline_error = None;
                self.send_to_runtime(Command::Connect(target.to_string()));
            }
            Err(e) => self.show_error(SessionError::from(e).to_string()),
        }
    }

    fn send_to_runtime(&mut self, command: Command) {
        if self.commands.send(command).is_err() {
            self.logger.error("[UI] Session runtime is gone");
            self.show_error("Session stopped. Please restart the app.".to_string());
        }
    }
}
