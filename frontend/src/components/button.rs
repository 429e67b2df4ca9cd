//! Button Component
//!
//! Filled buttons shared by every page. Pick the look with the
//! constructor: [`Button::primary`], [`Button::secondary`] or
//! [`Button::danger`].

use egui::{Color32, FontId, RichText, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Tone {
    Primary,
    Secondary,
    Danger,
}

impl Tone {
    fn fill(self) -> Color32 {
        match self {
            Tone::Primary => Color32::from_rgb(59, 130, 246),
            Tone::Secondary => Color32::from_rgb(71, 85, 105),
            Tone::Danger => Color32::from_rgb(220, 38, 38),
        }
    }
}

pub struct Button {
    label: String,
    tone: Tone,
    font_size: f32,
    size: Option<Vec2>,
    enabled: bool,
}

impl Button {
    fn with_tone(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
            font_size: 16.0,
            size: None,
            enabled: true,
        }
    }

    pub fn primary(label: impl Into<String>) -> Self {
        Self::with_tone(label, Tone::Primary)
    }

    pub fn secondary(label: impl Into<String>) -> Self {
        Self::with_tone(label, Tone::Secondary)
    }

    /// For leaving a conversation.
    pub fn danger(label: impl Into<String>) -> Self {
        Self::with_tone(label, Tone::Danger)
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(egui::vec2(width, height));
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Greys the button out and ignores clicks while `false`.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let fill = if self.enabled {
            self.tone.fill()
        } else {
            self.tone.fill().gamma_multiply(0.4)
        };
        let text = RichText::new(self.label)
            .font(FontId::proportional(self.font_size))
            .color(Color32::WHITE);
        let button = egui::Button::new(text)
            .fill(fill)
            .corner_radius(8.0)
            .min_size(self.size.unwrap_or(Vec2::ZERO));

        ui.add_enabled(self.enabled, button)
    }
}
