//! Control Panel Widget
//! Left side panel with the data source, state filter and export controls.

use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    /// Every state code in the loaded table, sorted.
    pub states: Vec<String>,
    pub selected: BTreeSet<String>,
    pub log_scale: bool,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            states: Vec::new(),
            selected: BTreeSet::new(),
            log_scale: false,
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new(log_scale: bool) -> Self {
        Self {
            log_scale,
            ..Self::default()
        }
    }

    /// Replace the filter options after a load; stale selections are dropped.
    pub fn update_states(&mut self, states: Vec<String>) {
        self.selected.retain(|s| states.contains(s));
        self.states = states;
    }

    /// Toggle one state; returns whether it is now selected.
    pub fn toggle_state(&mut self, state: &str) -> bool {
        if self.selected.remove(state) {
            false
        } else {
            self.selected.insert(state.to_string());
            true
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🏠 TSA Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("FEMA disaster assistance").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔎 Filters").size(14.0).strong());
        ui.add_space(5.0);
        ui.label("Filter by damaged state");

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                    let mut toggled: Option<String> = None;
                    for state in &self.states {
                        let mut checked = self.selected.contains(state);
                        if ui.checkbox(&mut checked, state).changed() {
                            toggled = Some(state.clone());
                        }
                    }
                    if let Some(state) = toggled {
                        self.toggle_state(&state);
                        action = ControlPanelAction::FilterChanged;
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            let summary = if self.selected.is_empty() {
                "All states".to_string()
            } else {
                format!("{} selected", self.selected.len())
            };
            ui.label(RichText::new(summary).size(11.0).color(Color32::GRAY));
            if ui.small_button("Clear").clicked() && !self.selected.is_empty() {
                self.selected.clear();
                action = ControlPanelAction::FilterChanged;
            }
        });

        ui.add_space(10.0);
        if ui
            .checkbox(&mut self.log_scale, "Log scale histogram")
            .changed()
        {
            action = ControlPanelAction::LogScaleToggled;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    FilterChanged,
    LogScaleToggled,
    ExportPng,
}
