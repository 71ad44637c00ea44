//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::TsaDashboardApp;
pub use chart_viewer::{format_thousands, ChartViewer};
pub use control_panel::{ControlPanel, ControlPanelAction};
