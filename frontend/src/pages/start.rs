use super::{MUTED_COLOR, TEXT_COLOR, TITLE_COLOR, own_code};
use crate::components::{Button, Card, InlineError};
use crate::events::UiCommand;
use session::SessionView;
use session::code::CODE_LEN;

#[derive(Clone, Default)]
struct StartState {
    code_input: String,
}

fn state_id() -> egui::Id {
    egui::Id::new("start_state")
}

/// Forgets what was typed on this page.
pub fn reset(ctx: &egui::Context) {
    ctx.data_mut(|data| data.remove::<StartState>(state_id()));
}

pub struct Start;

impl Start {
    pub fn show(ui: &mut egui::Ui, view: &SessionView, error: Option<&InlineError>) -> Option<UiCommand> {
        let id = state_id();
        let mut state = ui.data_mut(|data| data.get_temp::<StartState>(id).unwrap_or_default());
        let mut command = None;

        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading(
                egui::RichText::new("Peerchat")
                    .size(64.0)
                    .color(TITLE_COLOR)
                    .strong(),
            );
            ui.label(
                egui::RichText::new("Share your code, or enter a friend's")
                    .size(20.0)
                    .color(MUTED_COLOR),
            );
            ui.add_space(40.0);

            Card::new()
                .max_width(420.0)
                .inner_margin(25.0)
                .show(ui, |ui| {
                    own_code(ui, &view.my_code);
                    ui.add_space(20.0);
                    command = Self::render_connect_form(ui, &mut state);
                    ui.add_space(10.0);
                    if let Some(error) = error {
                        error.show(ui);
                    }
                });
        });

        ui.data_mut(|data| data.insert_temp(id, state));
        command
    }

    fn render_connect_form(ui: &mut egui::Ui, state: &mut StartState) -> Option<UiCommand> {
        ui.label(
            egui::RichText::new("Friend's code")
                .size(16.0)
                .strong()
                .color(TEXT_COLOR),
        );
        ui.add_space(8.0);

        let input = ui.add_sized(
            egui::vec2(340.0, 40.0),
            egui::TextEdit::singleline(&mut state.code_input)
                .hint_text("e.g. AB12X")
                .char_limit(CODE_LEN)
                .font(egui::FontId::monospace(18.0))
                .margin(egui::Margin::same(12)),
        );
        if input.changed() {
            state.code_input = state.code_input.to_ascii_uppercase();
        }
        ui.add_space(15.0);

        let clicked = Button::primary("Connect")
            .font_size(18.0)
            .size(340.0, 48.0)
            .show(ui)
            .clicked();
        let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if clicked || entered {
            return Some(UiCommand::Connect(state.code_input.trim().to_string()));
        }
        None
    }
}
