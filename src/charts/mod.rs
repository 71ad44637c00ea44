//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{cell_text, histogram_height, ChartPlotter};
pub use renderer::{RenderError, StaticChartRenderer, BOXPLOT_FILE, HISTOGRAM_FILE, RATE_FILE};
