//! Handles updates published by the session runtime.

use super::state::App;
use session::Update;

impl App {
    pub(super) fn handle_logic_event(&mut self, update: Update) {
        match update {
            Update::State(view) => {
                if view.connection != self.view.connection {
                    self.logger.info(&format!(
                        "[APP] {} -> {}",
                        self.view.connection, view.connection
                    ));
                }
                if view.my_code != self.view.my_code {
                    self.logger
                        .info(&format!("[APP] Own code is now {}", view.my_code));
                }
                self.view = view;
            }
            Update::Rejected(message) | Update::Error(message) => self.show_error(message),
        }
    }
}
