use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::AppConfig;
use crate::engine::activity_source::default_source;
use crate::engine::clipboard::SystemClipboard;
use crate::engine::controller::InteractionController;
use crate::engine::engine::Engine;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::notice::{Notice, NoticeVariant};
use crate::model::session::{GameMode, InteractionSnapshot};
use crate::model::static_pool::RandomPicker;
use crate::ui::activity_card::draw_activity_card;
use crate::ui::mode_panel::draw_mode_panel;
use crate::ui::settings::{UiSettings, UI_SCALE_RANGE};
use crate::ui::settings_io::{load_settings, save_settings};

const TOAST_LIFETIME: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct Toast {
    notice: Notice,
    shown_at: Instant,
}

pub struct SpontaneousApp {
    settings: UiSettings,
    snapshot: InteractionSnapshot,
    /// Generate commands sent but not yet answered.
    pending: u32,
    toasts: Vec<Toast>,
    offline: bool,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl SpontaneousApp {
    pub fn new(config: &AppConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let source = default_source(config);
        let spawned = thread::Builder::new()
            .name("activity-engine".into())
            .spawn(move || {
                let controller = InteractionController::new(source, RandomPicker::new());
                let mut engine = Engine::new(cmd_rx, resp_tx, controller, SystemClipboard::new());
                engine.run();
            });
        if let Err(err) = spawned {
            tracing::error!("failed to start activity engine: {err}");
        }

        Self {
            settings: load_settings(),
            snapshot: InteractionSnapshot::default(),
            pending: 0,
            toasts: Vec::new(),
            offline: !config.has_credential(),
            cmd_tx,
            resp_rx,
        }
    }

    fn send(&mut self, cmd: EngineCommand) {
        match &cmd {
            EngineCommand::GenerateActivity => self.pending += 1,
            EngineCommand::SetMode(mode) => self.snapshot.mode = *mode,
            _ => {}
        }

        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("activity engine is not running");
            self.pending = 0;
            self.push_toast(Notice::something_went_wrong());
        }
    }

    fn push_toast(&mut self, notice: Notice) {
        self.toasts.push(Toast {
            notice,
            shown_at: Instant::now(),
        });
    }

    fn drain_responses(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::Snapshot(snapshot) => self.snapshot = snapshot,
                EngineResponse::Generated(snapshot) => {
                    self.snapshot = snapshot;
                    self.pending = self.pending.saturating_sub(1);
                }
                EngineResponse::Notice(notice) => self.push_toast(notice),
            }
        }
    }

    fn busy(&self) -> bool {
        self.pending > 0 || self.snapshot.busy
    }

    fn draw_toasts(&self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -48.0))
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    toast_bubble(ui, &toast.notice);
                    ui.add_space(6.0);
                }
            });
    }
}

impl eframe::App for SpontaneousApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.drain_responses();
        self.toasts
            .retain(|toast| toast.shown_at.elapsed() < TOAST_LIFETIME);

        /* FOOTER */
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("UI Scale");
                let response = ui.add(egui::Slider::new(&mut self.settings.ui_scale, UI_SCALE_RANGE));
                if response.drag_stopped() || (response.changed() && !response.dragged()) {
                    save_settings(&self.settings);
                }

                if self.offline {
                    ui.separator();
                    ui.label(egui::RichText::new("Offline: activities come from our collection").weak());
                }
            });
        });

        /* CENTER */
        let mut commands = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.label(egui::RichText::new("Spontaneous Adventures").size(36.0).strong());
                ui.label(
                    egui::RichText::new("Improvisational challenges to break your routine.").size(18.0).weak(),
                );
                ui.add_space(16.0);
            });

            commands.extend(draw_mode_panel(ui, &self.snapshot));
            ui.add_space(12.0);
            commands.extend(draw_activity_card(ui, &self.snapshot, self.busy()));

            if self.snapshot.mode == GameMode::Multiplayer {
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(format!(
                        "Activities are phrased for {} people.",
                        self.snapshot.players.get()
                    ))
                    .weak(),
                );
            }
        });

        for cmd in commands {
            self.send(cmd);
        }

        self.draw_toasts(ctx);

        // engine replies and timed resets arrive without user input
        if self.busy() || self.snapshot.copied || !self.toasts.is_empty() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}

fn toast_bubble(ui: &mut egui::Ui, notice: &Notice) {
    let fill = match notice.variant {
        NoticeVariant::Info => egui::Color32::from_rgb(40, 40, 48),
        NoticeVariant::Destructive => egui::Color32::from_rgb(150, 40, 40),
    };

    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.set_max_width(320.0);
            ui.label(
                egui::RichText::new(notice.title.as_str())
                    .strong()
                    .color(egui::Color32::WHITE),
            );
            ui.label(egui::RichText::new(notice.description.as_str()).color(egui::Color32::WHITE));
        });
}
