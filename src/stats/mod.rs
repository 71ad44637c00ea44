//! Stats module - aggregation and descriptive statistics

mod calculator;

pub use calculator::{
    AggregateRow, BoxSummary, ChartData, DatasetSummary, HistogramBin, StatsCalculator,
};
