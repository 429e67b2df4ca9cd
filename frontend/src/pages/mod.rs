//! Pages, one per connection state. Each renders from a `SessionView`
//! and returns at most one `UiCommand`.

pub mod chat;
pub mod connecting;
pub mod start;

pub use chat::Chat;
pub use connecting::Connecting;
pub use start::Start;

/// Clears page inputs. Called whenever the connection state changes, so
/// nothing typed in one session carries over to the next.
pub fn reset_inputs(ctx: &egui::Context) {
    start::reset(ctx);
    chat::reset(ctx);
}

const TITLE_COLOR: egui::Color32 = egui::Color32::from_rgb(96, 165, 250);
const MUTED_COLOR: egui::Color32 = egui::Color32::from_rgb(148, 163, 184);
const TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(226, 232, 240);

/// "Your code" line shown on every page.
fn own_code(ui: &mut egui::Ui, code: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Your code:").size(16.0).color(MUTED_COLOR));
        ui.label(
            egui::RichText::new(code)
                .size(22.0)
                .monospace()
                .strong()
                .color(TITLE_COLOR),
        );
    });
}
