//! TSA Dashboard - FEMA TSA Eligibility Dashboard
//!
//! Desktop window over a FEMA disaster-assistance CSV.

use anyhow::Result;
use eframe::egui;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tsa_dashboard::config::DashboardConfig;
use tsa_dashboard::gui::TsaDashboardApp;

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = DashboardConfig::load()?;
    info!(data_path = %config.data_path.display(), "starting dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("FEMA TSA Eligibility Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "FEMA TSA Eligibility Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(TsaDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
