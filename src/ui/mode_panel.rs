use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::model::session::{GameMode, InteractionSnapshot};

/// Solo/multiplayer toggle plus the player stepper.
pub fn draw_mode_panel(ui: &mut egui::Ui, snapshot: &InteractionSnapshot) -> Option<EngineCommand> {
    let mut command = None;

    ui.horizontal(|ui| {
        let mut mode = snapshot.mode;
        ui.selectable_value(&mut mode, GameMode::Solo, "Solo");
        ui.selectable_value(&mut mode, GameMode::Multiplayer, "Multiplayer");
        if mode != snapshot.mode {
            command = Some(EngineCommand::SetMode(mode));
        }

        // stepper only matters for groups
        if snapshot.mode == GameMode::Multiplayer {
            ui.separator();

            let players = snapshot.players;
            if ui
                .add_enabled(!players.at_min(), egui::Button::new(" - "))
                .on_hover_text("Decrease")
                .clicked()
            {
                command = Some(EngineCommand::DecrementPlayers);
            }

            ui.label(egui::RichText::new(players.get().to_string()).strong());

            if ui
                .add_enabled(!players.at_max(), egui::Button::new(" + "))
                .on_hover_text("Increase")
                .clicked()
            {
                command = Some(EngineCommand::IncrementPlayers);
            }

            ui.label("players");
        }
    });

    command
}
