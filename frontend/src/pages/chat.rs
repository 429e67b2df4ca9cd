use super::{MUTED_COLOR, TEXT_COLOR, TITLE_COLOR, own_code};
use crate::components::{Button, Card, InlineError};
use crate::events::UiCommand;
use egui::Color32;
use session::protocol::MAX_MESSAGE_CHARS;
use session::{Message, SessionView};

const SELF_BUBBLE: Color32 = Color32::from_rgb(37, 99, 235);
const PEER_BUBBLE: Color32 = Color32::from_rgb(51, 65, 85);

#[derive(Clone, Default)]
struct ChatState {
    draft: String,
}

fn state_id() -> egui::Id {
    egui::Id::new("chat_state")
}

/// Forgets what was typed on this page.
pub fn reset(ctx: &egui::Context) {
    ctx.data_mut(|data| data.remove::<ChatState>(state_id()));
}

pub struct Chat;

impl Chat {
    pub fn show(ui: &mut egui::Ui, view: &SessionView, error: Option<&InlineError>) -> Option<UiCommand> {
        let id = state_id();
        let mut state = ui.data_mut(|data| data.get_temp::<ChatState>(id).unwrap_or_default());

        let mut command = Self::render_header(ui, view);
        if let Some(error) = error {
            error.show(ui);
        }
        ui.separator();

        // Leave room for the composer at the bottom.
        let log_height = (ui.available_height() - 60.0).max(100.0);
        egui::ScrollArea::vertical()
            .max_height(log_height)
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for message in &view.messages {
                    Self::render_message(ui, message);
                }
            });

        ui.separator();
        if let Some(send) = Self::render_composer(ui, &mut state) {
            command = Some(send);
        }

        ui.data_mut(|data| data.insert_temp(id, state));
        command
    }

    fn render_header(ui: &mut egui::Ui, view: &SessionView) -> Option<UiCommand> {
        let mut command = None;
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    egui::RichText::new(format!("Chat with {}", view.peer_name))
                        .size(24.0)
                        .strong()
                        .color(TITLE_COLOR),
                );
                own_code(ui, &view.my_code);
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if Button::danger("Disconnect")
                    .show(ui)
                    .clicked()
                {
                    command = Some(UiCommand::Disconnect);
                }
            });
        });
        command
    }

    fn render_message(ui: &mut egui::Ui, message: &Message) {
        let (layout, fill) = if message.is_self {
            (egui::Layout::right_to_left(egui::Align::TOP), SELF_BUBBLE)
        } else {
            (egui::Layout::left_to_right(egui::Align::TOP), PEER_BUBBLE)
        };
        let max_width = ui.available_width() * 0.7;

        ui.with_layout(layout, |ui| {
            Card::bubble(fill).max_width(max_width).show(ui, |ui| {
                ui.add(
                    egui::Label::new(egui::RichText::new(&message.text).size(15.0).color(Color32::WHITE))
                        .wrap(),
                );
            });
        });
        ui.add_space(4.0);
    }

    fn render_composer(ui: &mut egui::Ui, state: &mut ChatState) -> Option<UiCommand> {
        let mut command = None;
        ui.horizontal(|ui| {
            let input = ui.add_sized(
                egui::vec2((ui.available_width() - 110.0).max(100.0), 36.0),
                egui::TextEdit::singleline(&mut state.draft)
                    .hint_text("Type a message")
                    .char_limit(MAX_MESSAGE_CHARS)
                    .text_color(TEXT_COLOR)
                    .margin(egui::Margin::same(8)),
            );
            let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = Button::primary("Send")
                .size(96.0, 36.0)
                .enabled(!state.draft.trim().is_empty())
                .show(ui)
                .clicked();

            if (entered || clicked) && !state.draft.trim().is_empty() {
                command = Some(UiCommand::SendMessage(std::mem::take(&mut state.draft)));
                input.request_focus();
            }
        });
        ui.label(
            egui::RichText::new(format!("{}/{}", state.draft.chars().count(), MAX_MESSAGE_CHARS))
                .size(11.0)
                .color(MUTED_COLOR),
        );
        command
    }
}
