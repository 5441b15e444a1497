//! Caduceus DNA Analysis
//!
//! Desktop client for hereditary cancer predisposition prediction from
//! DNA sequences, with SHAP feature-importance reports.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;

use app::CaduceusApp;
use caduceus_dna::logging::init_logging;
use caduceus_dna::AppConfig;

type DynError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> eframe::Result<()> {
    init_logging();

    let config = AppConfig::from_env();
    tracing::info!(backend = %config.backend_url, "starting");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Caduceus DNA Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Caduceus DNA Analysis",
        native_options,
        Box::new(
            move |cc: &eframe::CreationContext<'_>| -> Result<Box<dyn eframe::App>, DynError> {
                let app = CaduceusApp::new(cc, config)?;
                Ok(Box::new(app))
            },
        ),
    )
}
