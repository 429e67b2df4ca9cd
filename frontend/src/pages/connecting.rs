use super::{MUTED_COLOR, TEXT_COLOR, own_code};
use crate::components::{Button, Card, InlineError};
use crate::events::UiCommand;
use session::SessionView;

pub struct Connecting;

impl Connecting {
    pub fn show(ui: &mut egui::Ui, view: &SessionView, error: Option<&InlineError>) -> Option<UiCommand> {
        let mut command = None;
        let peer = view.peer_code.as_deref().unwrap_or("?????");
        let status = if view.initiator {
            format!("Connecting to {}...", peer)
        } else {
            format!("{} is connecting to you...", peer)
        };

        ui.vertical_centered(|ui| {
            ui.add_space(140.0);
            Card::new()
                .max_width(420.0)
                .inner_margin(25.0)
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        own_code(ui, &view.my_code);
                        ui.add_space(24.0);
                        ui.add(egui::Spinner::new().size(40.0));
                        ui.add_space(16.0);
                        ui.label(egui::RichText::new(status).size(18.0).color(TEXT_COLOR));
                        ui.label(
                            egui::RichText::new("Waiting for the peer connection")
                                .size(14.0)
                                .color(MUTED_COLOR),
                        );
                        ui.add_space(20.0);
                        if let Some(error) = error {
                            error.show(ui);
                            ui.add_space(10.0);
                        }
                        if Button::secondary("Cancel")
                            .size(160.0, 40.0)
                            .show(ui)
                            .clicked()
                        {
                            command = Some(UiCommand::Disconnect);
                        }
                    });
                });
        });

        command
    }
}
