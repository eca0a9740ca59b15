//! Application entry point for the repellent forces viewer.
//!
//! This binary sets up eframe/egui and delegates all interactive
//! logic and rendering to [`Viewer`] from the `viewer` module.

mod field_image;
mod viewer;

use field_core::config::Config;
use viewer::Viewer;

/// Reads the optional config file named by the first command-line argument.
///
/// Falls back to [`Config::default`] when no path is given or the file
/// cannot be loaded.
fn load_config() -> Config {
    let Some(path) = std::env::args().nth(1) else {
        return Config::default();
    };
    match Config::load(&path) {
        Ok(cfg) => {
            log::info!("loaded config from {}", path);
            cfg
        }
        Err(err) => {
            log::error!("{}: {}, using defaults", path, err);
            Config::default()
        }
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    let cfg = load_config();
    match cfg.to_json() {
        Ok(json) => log::info!("starting with config {}", json),
        Err(err) => log::warn!("cannot display config: {}", err),
    }
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([820.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Repellent Forces",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg)))),
    )
}
