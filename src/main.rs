mod app;
mod color;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use eframe::egui;

use app::VcScoutApp;
use vc_scout::api::SearchClient;
use vc_scout::config::load_settings;
use vc_scout::favorites::JsonFileRepository;
use vc_scout::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = load_settings()?;
    log::info!("Backend at {}", settings.base_url);

    let client = SearchClient::new(&settings.base_url, settings.request_timeout())
        .context("building HTTP client")?;
    let favorites = JsonFileRepository::new(settings.favorites_file());
    log::info!("Favorites file: {}", favorites.path().display());
    let state = AppState::new(Box::new(favorites), settings.filter_debounce());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "VC Scout – Descobrir Investimentos de VCs",
        options,
        Box::new(move |cc| {
            let app = VcScoutApp::new(&cc.egui_ctx, state, Arc::new(client), settings.suggestions);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running the window: {e}"))
}
