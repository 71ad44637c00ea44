//! Data Processor Module
//! Row filtering by state code and filter option lookup.

use super::cleaner::{CleanedTable, STATE};
use polars::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Handles filtering of cleaned tables.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep rows whose state code is in `selected`, preserving order.
    ///
    /// An empty selection means "no filter" and returns the whole table.
    pub fn filter_by_states(
        table: &CleanedTable,
        selected: &BTreeSet<String>,
    ) -> Result<CleanedTable, ProcessorError> {
        if selected.is_empty() {
            return Ok(table.clone());
        }

        let states = table.frame().column(STATE)?.str()?;
        let keep: Vec<bool> = states
            .into_iter()
            .map(|state| state.is_some_and(|s| selected.contains(s)))
            .collect();
        let mask = BooleanChunked::from_slice("mask".into(), &keep);

        let filtered = table.frame().filter(&mask)?;
        debug!(
            selected = selected.len(),
            rows_in = table.height(),
            rows_out = filtered.height(),
            "filtered by state"
        );
        Ok(CleanedTable::from_frame(filtered))
    }

    /// Sorted distinct state codes, for the filter options.
    pub fn state_options(table: &CleanedTable) -> Vec<String> {
        table
            .states()
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
