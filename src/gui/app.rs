//! TSA Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{CleanedTable, CleaningOptions, DataLoader, DataProcessor};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::StatsCalculator;
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { path: PathBuf, table: CleanedTable },
    Error(String),
}

/// Main application window.
pub struct TsaDashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl TsaDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self::with_config(config);
        let data_path = app.config.data_path.clone();
        app.start_load(&data_path);
        app
    }

    fn with_config(config: DashboardConfig) -> Self {
        let options = CleaningOptions {
            lenient_amounts: config.lenient_amounts,
        };
        Self {
            loader: DataLoader::new(options),
            control_panel: ControlPanel::new(config.log_scale),
            chart_viewer: ChartViewer::new(config.preview_rows, config.authors.clone()),
            load_rx: None,
            is_loading: false,
            config,
        }
    }

    /// Load `path` on a background thread unless it is already cached.
    fn start_load(&mut self, path: &Path) {
        if self.is_loading {
            return;
        }

        self.control_panel.csv_path = Some(path.to_path_buf());

        if let Some(table) = self.loader.cached_for(path) {
            self.apply_table(table);
            return;
        }

        self.chart_viewer.clear();
        self.control_panel.export_enabled = false;
        self.control_panel.set_progress(0.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let path = path.to_path_buf();
        let options = self.loader.options();

        // Load CSV in background thread
        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            match DataLoader::read_clean(&path, options) {
                Ok(table) => {
                    let _ = tx.send(LoadResult::Complete { path, table });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(0.0, &status);
                    }
                    LoadResult::Complete { path, table } => {
                        let table = Arc::new(table);
                        self.loader.store(&path, Arc::clone(&table));
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.apply_table(table);
                    }
                    LoadResult::Error(message) => {
                        should_keep_receiver = false;
                        self.handle_load_failure(&message);
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Fall back to the previously loaded table, if any, after a failed load.
    fn handle_load_failure(&mut self, message: &str) {
        error!(%message, "failed to load data");
        self.is_loading = false;
        self.control_panel.csv_path = self.loader.file_path().map(Path::to_path_buf);

        match self.loader.current().cloned() {
            Some(table) => self.apply_table(table),
            None => {
                self.chart_viewer.clear();
                self.control_panel.update_states(Vec::new());
                self.control_panel.export_enabled = false;
            }
        }

        self.control_panel
            .set_progress(0.0, &format!("Error: {}", message));
    }

    fn apply_table(&mut self, table: Arc<CleanedTable>) {
        self.control_panel
            .update_states(DataProcessor::state_options(&table));
        self.control_panel.set_progress(
            100.0,
            &format!(
                "Loaded {} rows, {} columns",
                table.height(),
                table.column_names().len()
            ),
        );
        self.chart_viewer.set_table(table);
        self.recompute();
    }

    /// Filter and aggregate the displayed table for the current selection.
    fn recompute(&mut self) {
        let Some(table) = self.chart_viewer.table.clone() else {
            self.control_panel.export_enabled = false;
            return;
        };

        match StatsCalculator::compute_dashboard(
            &table,
            &self.control_panel.selected,
            self.config.histogram_bins,
        ) {
            Ok(chart_data) => {
                self.chart_viewer.set_chart_data(chart_data);
                self.control_panel.export_enabled = true;
            }
            Err(e) => {
                error!(error = %e, "failed to compute dashboard");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
                self.control_panel.export_enabled = false;
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            info!(path = %path.display(), "data source changed");
            self.start_load(&path);
        }
    }

    /// Render the current charts to PNG files in a chosen folder.
    fn handle_export_png(&mut self) {
        let Some(chart_data) = &self.chart_viewer.chart_data else {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        self.control_panel.set_progress(50.0, "Rendering charts...");

        match StaticChartRenderer::export_all(chart_data, &dir, self.control_panel.log_scale) {
            Ok(files) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!("PNG exported: {} charts", files.len()),
                );
                if let Err(e) = open::that(&dir) {
                    warn!(error = %e, dir = %dir.display(), "could not open export folder");
                }
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Render error: {}", e));
            }
        }
    }
}

impl eframe::App for TsaDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::FilterChanged => self.recompute(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::LogScaleToggled | ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.control_panel.log_scale);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn loaded_app() -> (TsaDashboardApp, PathBuf) {
        let mut app = TsaDashboardApp::with_config(DashboardConfig::default());
        let path = PathBuf::from("fema_sample.csv");
        let table = Arc::new(CleanedTable::from_records(&[
            Record::new("TX", 1, 100.0),
            Record::new("FL", 0, 50.0),
        ]));
        app.loader.store(&path, Arc::clone(&table));
        app.control_panel.csv_path = Some(path.clone());
        app.apply_table(table);
        (app, path)
    }

    /// Mirror `start_load` for a path that is not cached.
    fn begin_load(app: &mut TsaDashboardApp, path: &str) {
        app.control_panel.csv_path = Some(PathBuf::from(path));
        app.chart_viewer.clear();
        app.control_panel.export_enabled = false;
        app.is_loading = true;
    }

    #[test]
    fn failed_load_restores_previous_table() {
        let (mut app, path) = loaded_app();
        begin_load(&mut app, "broken.csv");

        app.handle_load_failure("Missing required column: tsaEligible");

        assert!(!app.is_loading);
        assert_eq!(app.control_panel.csv_path, Some(path));
        assert_eq!(
            app.control_panel.states,
            vec!["FL".to_string(), "TX".to_string()]
        );
        assert!(app.chart_viewer.table.is_some());
        assert!(app.control_panel.export_enabled);
        assert!(app.control_panel.status.starts_with("Error:"));

        // Filtering after the failure works on the restored table
        app.control_panel.toggle_state("TX");
        app.recompute();
        let data = app.chart_viewer.chart_data.as_ref().unwrap();
        assert_eq!(data.summary.records, 1);
    }

    #[test]
    fn failed_first_load_leaves_nothing_to_filter() {
        let mut app = TsaDashboardApp::with_config(DashboardConfig::default());
        begin_load(&mut app, "missing.csv");

        app.handle_load_failure("Cannot read missing.csv");

        assert_eq!(app.control_panel.csv_path, None);
        assert!(app.control_panel.states.is_empty());
        assert!(!app.control_panel.export_enabled);

        app.recompute();
        assert!(app.chart_viewer.chart_data.is_none());
        assert!(!app.control_panel.export_enabled);
    }

    #[test]
    fn recompute_ignores_cache_while_body_is_cleared() {
        let (mut app, _) = loaded_app();
        begin_load(&mut app, "other.csv");

        app.recompute();
        assert!(app.chart_viewer.chart_data.is_none());
        assert!(!app.control_panel.export_enabled);
    }
}
