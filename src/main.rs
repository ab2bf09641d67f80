mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::PensionDashboardApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::parse();
    log::debug!("Starting with {config:?}");

    let mut state = AppState::new(&config.table, config.limits());
    state.load(config.source.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pension Data Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(PensionDashboardApp::new(state)))),
    )
}
