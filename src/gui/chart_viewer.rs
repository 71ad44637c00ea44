//! Chart Viewer Widget
//! Central scrollable panel: data preview, filtered record count, the three
//! charts and the text summary.

use crate::charts::ChartPlotter;
use crate::data::CleanedTable;
use crate::stats::ChartData;
use egui::{RichText, ScrollArea};
use std::sync::Arc;

const SECTION_SPACING: f32 = 15.0;

const SUMMARY_TEXT: &str = "The histogram shows the distribution of repair amounts.\n\
The boxplot compares repair amounts for people who were TSA eligible.\n\
The bar chart shows how TSA eligibility rates changed across states.";

/// Format a count with `,` thousands separators.
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Scrollable dashboard body.
pub struct ChartViewer {
    /// Unfiltered table shown in the preview
    pub table: Option<Arc<CleanedTable>>,
    /// Charts for the current filter selection
    pub chart_data: Option<ChartData>,
    pub preview_rows: usize,
    pub authors: Option<String>,
}

impl ChartViewer {
    pub fn new(preview_rows: usize, authors: Option<String>) -> Self {
        Self {
            table: None,
            chart_data: None,
            preview_rows,
            authors,
        }
    }

    /// Text shown at the bottom of the body.
    pub fn footer_text(&self) -> String {
        match &self.authors {
            Some(authors) => format!("{}\n\nAuthors: {}", SUMMARY_TEXT, authors),
            None => SUMMARY_TEXT.to_string(),
        }
    }

    /// Clear all charts
    pub fn clear(&mut self) {
        self.table = None;
        self.chart_data = None;
    }

    pub fn set_table(&mut self, table: Arc<CleanedTable>) {
        self.table = Some(table);
    }

    pub fn set_chart_data(&mut self, chart_data: ChartData) {
        self.chart_data = Some(chart_data);
    }

    pub fn show(&self, ui: &mut egui::Ui, log_scale: bool) {
        let (Some(table), Some(chart_data)) = (&self.table, &self.chart_data) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("FEMA TSA Eligibility Dashboard").size(26.0).strong());
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("Data Preview").size(18.0).strong());
                ChartPlotter::draw_preview(ui, table, self.preview_rows);
                ui.add_space(SECTION_SPACING);

                ui.label(
                    RichText::new(format!(
                        "Records after filters: {}",
                        format_thousands(chart_data.summary.records)
                    ))
                    .size(18.0)
                    .strong(),
                );
                if let (Some(rate), Some(mean)) = (
                    chart_data.summary.eligibility_rate,
                    chart_data.summary.mean_repair,
                ) {
                    ui.label(format!(
                        "TSA eligible: {} ({:.1}%), mean repair amount: {:.2}",
                        format_thousands(chart_data.summary.eligible),
                        rate * 100.0,
                        mean
                    ));
                }
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("Repair Amount Distribution").size(18.0).strong());
                ui.label(RichText::new("Distribution of Repair Amount").size(13.0));
                ChartPlotter::draw_histogram(ui, &chart_data.histogram, log_scale);
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("Repair Amount by TSA Eligibility").size(18.0).strong());
                ChartPlotter::draw_boxplot(ui, chart_data);
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("TSA Eligibility Rate by State").size(18.0).strong());
                ui.label(RichText::new("TSA Eligibility Rate by State or Territory").size(13.0));
                ChartPlotter::draw_rate_chart(ui, &chart_data.rates);
                ui.add_space(SECTION_SPACING);

                ui.label(self.footer_text());
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn footer_ends_with_authors() {
        let viewer = ChartViewer::new(5, Some("Aidan Gantt".to_string()));
        let footer = viewer.footer_text();
        assert!(footer.starts_with(SUMMARY_TEXT));
        assert!(footer.ends_with("Authors: Aidan Gantt"));

        assert_eq!(ChartViewer::new(5, None).footer_text(), SUMMARY_TEXT);
    }
}
