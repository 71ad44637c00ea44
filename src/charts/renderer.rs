//! Static Chart Renderer
//! Writes the three dashboard charts as PNG files using plotters.
//!
//! Output files:
//! 1. `repair_histogram.png`: Distribution of Repair Amount
//! 2. `repair_boxplot.png`: Repair Amount by TSA Eligibility
//! 3. `tsa_rate_by_state.png`: TSA Eligibility Rate by State or Territory

use crate::charts::plotter::histogram_height;
use crate::stats::ChartData;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const HISTOGRAM_FILE: &str = "repair_histogram.png";
pub const BOXPLOT_FILE: &str = "repair_boxplot.png";
pub const RATE_FILE: &str = "tsa_rate_by_state.png";

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 700;

const BAR_COLOR: RGBColor = RGBColor(99, 110, 250);
const TSA_COLORS: [RGBColor; 2] = [RGBColor(239, 85, 59), RGBColor(0, 204, 150)];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Drawing failed: {0}")]
    Draw(String),
}

fn draw_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Label for an integer category axis; blank between categories.
fn category_label(value: f64, labels: &[String]) -> String {
    let idx = value.round();
    if (value - idx).abs() < 1e-6 && idx >= 0.0 {
        labels.get(idx as usize).cloned().unwrap_or_default()
    } else {
        String::new()
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render all charts into `dir`, returning the written files.
    pub fn export_all(
        data: &ChartData,
        dir: &Path,
        log_scale: bool,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let histogram = dir.join(HISTOGRAM_FILE);
        let boxplot = dir.join(BOXPLOT_FILE);
        let rates = dir.join(RATE_FILE);

        Self::render_histogram(data, &histogram, log_scale)?;
        Self::render_boxplot(data, &boxplot)?;
        Self::render_rates(data, &rates)?;

        info!(dir = %dir.display(), "exported chart images");
        Ok(vec![histogram, boxplot, rates])
    }

    pub fn render_histogram(
        data: &ChartData,
        path: &Path,
        log_scale: bool,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (x_min, x_max) = match (data.histogram.first(), data.histogram.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (0.0, 1.0),
        };
        let y_max = data
            .histogram
            .iter()
            .map(|bin| histogram_height(bin.count, log_scale))
            .fold(0.0, f64::max)
            .max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption("Distribution of Repair Amount", ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max * 1.05)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("repairAmount")
            .y_desc(if log_scale { "log10(count + 1)" } else { "count" })
            .x_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(data.histogram.iter().map(|bin| {
                Rectangle::new(
                    [(bin.start, 0.0), (bin.end, histogram_height(bin.count, log_scale))],
                    BAR_COLOR.filled(),
                )
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    pub fn render_boxplot(data: &ChartData, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let labels: Vec<String> = data
            .boxes
            .iter()
            .map(|b| b.tsa_eligible.to_string())
            .collect();
        let y_max = data
            .boxes
            .iter()
            .map(|b| b.max)
            .fold(0.0, f64::max)
            .max(1.0);
        let x_max = data.boxes.len().max(1) as f64 - 0.5;

        let mut chart = ChartBuilder::on(&root)
            .caption("Repair Amount by TSA Eligibility", ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5..x_max, 0.0..y_max * 1.05)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().max(1) * 2 + 1)
            .x_label_formatter(&|v| category_label(*v, &labels))
            .x_desc("TSA Eligible (1 yes, 0 no)")
            .y_desc("Repair Amount")
            .draw()
            .map_err(draw_err)?;

        for (i, summary) in data.boxes.iter().enumerate() {
            let x = i as f64;
            let color = TSA_COLORS[usize::from(summary.tsa_eligible == 1)];

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.25, summary.q1), (x + 0.25, summary.q3)],
                    color.mix(0.3).filled(),
                )))
                .map_err(draw_err)?;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.25, summary.q1), (x + 0.25, summary.q3)],
                    color.stroke_width(2),
                )))
                .map_err(draw_err)?;

            let segments = [
                vec![(x - 0.25, summary.median), (x + 0.25, summary.median)],
                vec![(x, summary.q3), (x, summary.upper_whisker)],
                vec![(x, summary.q1), (x, summary.lower_whisker)],
                vec![(x - 0.1, summary.upper_whisker), (x + 0.1, summary.upper_whisker)],
                vec![(x - 0.1, summary.lower_whisker), (x + 0.1, summary.lower_whisker)],
            ];
            chart
                .draw_series(
                    segments
                        .into_iter()
                        .map(|points| PathElement::new(points, color.stroke_width(2))),
                )
                .map_err(draw_err)?;

            // Outliers beyond the whiskers
            let outliers: Vec<f64> = data
                .filtered
                .tsa_flags()
                .into_iter()
                .zip(data.filtered.repair_amounts())
                .filter(|(flag, amount)| {
                    *flag == summary.tsa_eligible
                        && (*amount < summary.lower_whisker || *amount > summary.upper_whisker)
                })
                .map(|(_, amount)| amount)
                .collect();
            chart
                .draw_series(
                    outliers
                        .into_iter()
                        .map(|amount| Circle::new((x, amount), 3, color.filled())),
                )
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    pub fn render_rates(data: &ChartData, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let labels: Vec<String> = data.rates.iter().map(|r| r.state.clone()).collect();
        let x_max = data.rates.len().max(1) as f64 - 0.5;

        let mut chart = ChartBuilder::on(&root)
            .caption("TSA Eligibility Rate by State or Territory", ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5..x_max, 0.0..1.05)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().max(1) * 2 + 1)
            .x_label_formatter(&|v| category_label(*v, &labels))
            .x_desc("damagedStateAbbreviation")
            .y_desc("tsa_rate")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(data.rates.iter().enumerate().map(|(i, row)| {
                let x = i as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, row.tsa_rate)], BAR_COLOR.filled())
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}
