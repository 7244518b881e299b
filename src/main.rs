mod config;
mod engine;
mod model;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Cli};
use crate::engine::activity_source::default_source;
use crate::engine::controller::InteractionController;
use crate::model::session::GameMode;
use crate::model::static_pool::RandomPicker;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli);
    tracing::info!(
        model = %config.model,
        credential = config.has_credential(),
        "configuration loaded"
    );

    if cli.once {
        run_once(&config, cli.players);
        return Ok(());
    }

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Spontaneous Adventures",
        options,
        Box::new(move |_cc| Ok(Box::new(ui::app::SpontaneousApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run window: {e}"))
}

/// Headless: one activity on stdout, notices on stderr.
fn run_once(config: &AppConfig, players: Option<u8>) {
    let mut controller = InteractionController::new(default_source(config), RandomPicker::new());
    if let Some(players) = players {
        controller.set_mode(GameMode::Multiplayer);
        controller.set_player_count(players);
    }

    for notice in controller.request_new_activity() {
        eprintln!("{}: {}", notice.title, notice.description);
    }

    if let Some(activity) = controller.current() {
        println!("{}", activity.share_text());
    }
}
