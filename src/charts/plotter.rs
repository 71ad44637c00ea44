//! Chart Plotter Module
//! Interactive histogram, boxplot and rate bar chart using egui_plot.

use crate::data::CleanedTable;
use crate::stats::{AggregateRow, ChartData, HistogramBin};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot};

pub const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
pub const RATE_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

/// Box colors for ineligible (0) and eligible (1)
pub const TSA_COLORS: [Color32; 2] = [
    Color32::from_rgb(239, 85, 59),  // Red
    Color32::from_rgb(0, 204, 150),  // Green
];

const CHART_HEIGHT: f32 = 320.0;

/// Bar height for a histogram count, optionally on a log10(count + 1) axis.
pub fn histogram_height(count: usize, log_scale: bool) -> f64 {
    if log_scale {
        (count as f64 + 1.0).log10()
    } else {
        count as f64
    }
}

/// Strip the quotes Polars puts around string values.
pub fn cell_text(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Draws the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn tsa_color(tsa_eligible: i64) -> Color32 {
        TSA_COLORS[usize::from(tsa_eligible == 1)]
    }

    /// Histogram of repair amounts.
    pub fn draw_histogram(ui: &mut egui::Ui, bins: &[HistogramBin], log_scale: bool) {
        let bars: Vec<Bar> = bins
            .iter()
            .map(|bin| {
                let width = bin.end - bin.start;
                Bar::new(bin.start + width / 2.0, histogram_height(bin.count, log_scale))
                    .width(width)
                    .name(format!("{:.0} - {:.0}: {}", bin.start, bin.end, bin.count))
            })
            .collect();

        let y_label = if log_scale { "log10(count + 1)" } else { "count" };

        Plot::new("repair_histogram")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("repairAmount")
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(HISTOGRAM_COLOR)
                        .name("Repair Amount"),
                );
            });
    }

    /// Repair amount boxplot per eligibility class.
    pub fn draw_boxplot(ui: &mut egui::Ui, chart_data: &ChartData) {
        let labels: Vec<String> = chart_data
            .boxes
            .iter()
            .map(|b| b.tsa_eligible.to_string())
            .collect();

        Plot::new("repair_boxplot")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("TSA Eligible (1 yes, 0 no)")
            .y_axis_label("Repair Amount")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, summary) in chart_data.boxes.iter().enumerate() {
                    let color = Self::tsa_color(summary.tsa_eligible);
                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            summary.lower_whisker,
                            summary.q1,
                            summary.median,
                            summary.q3,
                            summary.upper_whisker,
                        ),
                    )
                    .name(format!("tsaEligible={}", summary.tsa_eligible))
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(format!(
                        "{} (n={})",
                        summary.tsa_eligible, summary.count
                    )));
                }
            });
    }

    /// TSA eligibility rate per state.
    pub fn draw_rate_chart(ui: &mut egui::Ui, rates: &[AggregateRow]) {
        let labels: Vec<String> = rates.iter().map(|r| r.state.clone()).collect();
        let bars: Vec<Bar> = rates
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, row.tsa_rate)
                    .width(0.8)
                    .name(format!("{}: {:.3} (n={})", row.state, row.tsa_rate, row.count))
            })
            .collect();

        Plot::new("tsa_rate_by_state")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .include_y(1.0)
            .x_axis_label("damagedStateAbbreviation")
            .y_axis_label("tsa_rate")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(RATE_COLOR).name("tsa_rate"));
            });
    }

    /// Grid of the first rows with every column.
    pub fn draw_preview(ui: &mut egui::Ui, table: &CleanedTable, rows: usize) {
        let preview = table.preview(rows);
        let columns = preview.get_columns();

        egui::ScrollArea::horizontal()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(5.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        egui::Grid::new("data_preview")
                            .striped(true)
                            .min_col_width(60.0)
                            .spacing([10.0, 4.0])
                            .show(ui, |ui| {
                                ui.label(RichText::new("").size(11.0));
                                for col in columns {
                                    ui.label(
                                        RichText::new(col.name().as_str()).strong().size(11.0),
                                    );
                                }
                                ui.end_row();

                                for i in 0..preview.height() {
                                    ui.label(
                                        RichText::new(i.to_string())
                                            .size(11.0)
                                            .color(Color32::GRAY),
                                    );
                                    for col in columns {
                                        let text = col
                                            .get(i)
                                            .map(|v| {
                                                if v.is_null() {
                                                    "None".to_string()
                                                } else {
                                                    cell_text(&v.to_string())
                                                }
                                            })
                                            .unwrap_or_default();
                                        ui.label(RichText::new(text).size(11.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_scale_height() {
        assert_eq!(histogram_height(9, false), 9.0);
        assert_eq!(histogram_height(9, true), 1.0);
        assert_eq!(histogram_height(0, true), 0.0);
    }

    #[test]
    fn cell_text_strips_quotes() {
        assert_eq!(cell_text("\"TX\""), "TX");
        assert_eq!(cell_text("12.5"), "12.5");
    }

    #[test]
    fn tsa_colors_by_class() {
        assert_eq!(ChartPlotter::tsa_color(0), TSA_COLORS[0]);
        assert_eq!(ChartPlotter::tsa_color(1), TSA_COLORS[1]);
    }
}
