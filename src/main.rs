mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod export;
mod state;
mod stats;
mod ui;

use app::GalaxyExplorerApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = DashboardConfig::resolve(&args).unwrap_or_else(|e| {
        log::error!("{e:#}; falling back to defaults");
        DashboardConfig::default()
    });
    log::info!(
        "Starting {} dashboard on {}",
        config.variant.title(),
        config.data_path.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Galaxy Explorer – Physical Parameters Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(GalaxyExplorerApp::new(&config)))),
    )
}
