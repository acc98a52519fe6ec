//! Application entry point for the growing-plant viewer.
//!
//! This binary installs logging, sets up eframe/egui, and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "sprout_core=info,sprout_view=info";

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop, or
///   the initial plant cannot be built.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Sprout",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()?))),
    )
}
