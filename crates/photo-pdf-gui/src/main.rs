#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

mod app;
mod handlers;
mod logger;
mod views;
mod worker;

use logger::AppLogger;

const MAX_LOG_ENTRIES: usize = 500;

fn main() -> eframe::Result<()> {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let logger = AppLogger::new(MAX_LOG_ENTRIES).with_level(level);
    if let Err(e) = logger.init() {
        eprintln!("Failed to install logger: {e}");
    }

    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("Photo PDF"),
        ..Default::default()
    };

    eframe::run_native(
        "Photo PDF",
        options,
        Box::new(move |cc| Ok(Box::new(app::PhotoPdfApp::new(cc, handle, logger)))),
    )
}
