//! Card Component
//!
//! Rounded container used for the page panels and for chat bubbles.

use egui::Color32;

const PANEL_FILL: Color32 = Color32::from_rgb(30, 41, 59);
const PANEL_STROKE: Color32 = Color32::from_rgb(51, 65, 85);

pub struct Card {
    max_width: Option<f32>,
    inner_margin: f32,
    fill: Color32,
    shadow: bool,
}

impl Card {
    /// A page panel with a drop shadow.
    pub fn new() -> Self {
        Self {
            max_width: None,
            inner_margin: 10.0,
            fill: PANEL_FILL,
            shadow: true,
        }
    }

    /// A flat bubble for one chat line.
    pub fn bubble(fill: Color32) -> Self {
        Self {
            max_width: None,
            inner_margin: 8.0,
            fill,
            shadow: false,
        }
    }

    pub fn max_width(mut self, width: f32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn inner_margin(mut self, margin: f32) -> Self {
        self.inner_margin = margin;
        self
    }

    pub fn show<R>(
        self,
        ui: &mut egui::Ui,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> egui::InnerResponse<R> {
        let mut frame = egui::Frame::new()
            .fill(self.fill)
            .corner_radius(12.0)
            .inner_margin(self.inner_margin);
        if self.shadow {
            frame = frame
                .stroke(egui::Stroke::new(1.0, PANEL_STROKE))
                .shadow(egui::epaint::Shadow {
                    offset: [0, 4],
                    blur: 24,
                    spread: 0,
                    color: Color32::from_black_alpha(40),
                });
        }

        frame.show(ui, |ui| {
            if let Some(width) = self.max_width {
                ui.set_max_width(width);
            }
            add_contents(ui)
        })
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}
