mod backend_bridge;
mod config;
mod controller;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{app::APP_TITLE, DiagnosisApp};

fn main() -> eframe::Result<()> {
    let (settings, settings_err) = match config::load_settings() {
        Ok(settings) => (settings, None),
        Err(err) => (config::Settings::default(), Some(err)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();
    if let Some(err) = settings_err {
        tracing::warn!("ignoring {}: {err:#}", config::SETTINGS_FILE);
    }
    tracing::info!(database_url = %settings.database_url, "starting diagnosis form");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    let _backend_worker = backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.database_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([500.0, 400.0])
            .with_min_inner_size([360.0, 280.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(DiagnosisApp::new(cmd_tx, ui_rx)))),
    )
}
