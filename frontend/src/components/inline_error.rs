//! Inline error line that disappears on its own.

use std::time::{Duration, Instant};

pub const ERROR_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct InlineError {
    message: String,
    shown_at: Instant,
    lifetime: Duration,
}

impl InlineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::shown_at(message, Instant::now())
    }

    fn shown_at(message: impl Into<String>, shown_at: Instant) -> Self {
        Self {
            message: message.into(),
            shown_at,
            lifetime: ERROR_LIFETIME,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.lifetime
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Time left before the error clears; the UI repaints then.
    pub fn remaining(&self) -> Duration {
        self.lifetime.saturating_sub(self.shown_at.elapsed())
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new(&self.message)
                .size(14.0)
                .color(egui::Color32::from_rgb(248, 113, 113)),
        );
    }
}
