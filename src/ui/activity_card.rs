use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::model::session::InteractionSnapshot;

pub fn draw_activity_card(
    ui: &mut egui::Ui,
    snapshot: &InteractionSnapshot,
    busy: bool,
) -> Option<EngineCommand> {
    let mut command = None;

    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(16))
        .corner_radius(egui::CornerRadius::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            match &snapshot.current {
                Some(activity) => {
                    ui.label(egui::RichText::new(activity.title.as_str()).size(24.0).strong());
                    ui.add_space(6.0);
                    ui.label(activity.description.as_str());
                }
                None => {
                    ui.label(egui::RichText::new("Ready for an adventure?").size(24.0).strong());
                    ui.add_space(6.0);
                    ui.label("Click the button below to generate a spontaneous activity.");
                }
            }

            ui.add_space(12.0);
            ui.separator();

            ui.horizontal(|ui| {
                let label = if busy {
                    "Generating..."
                } else if snapshot.current.is_some() {
                    "New Activity"
                } else {
                    "Generate Activity"
                };

                if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
                    command = Some(EngineCommand::GenerateActivity);
                }
                if busy {
                    ui.spinner();
                }

                if snapshot.current.is_some() {
                    let copy_label = if snapshot.copied { "Copied!" } else { "Copy" };
                    if ui
                        .add_enabled(!busy, egui::Button::new(copy_label))
                        .on_hover_text("Copy to share with friends")
                        .clicked()
                    {
                        command = Some(EngineCommand::CopyToClipboard);
                    }
                }
            });
        });

    command
}
