//! CSV Data Loader Module
//! Reads the FEMA CSV with Polars, cleans it and memoizes the result per source path.

use super::cleaner::{clean_frame, CleanedTable, CleaningOptions, NULL_MARKERS};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    Parse(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Loads and cleans CSV files, caching the last table by source path.
pub struct DataLoader {
    options: CleaningOptions,
    cached: Option<(PathBuf, Arc<CleanedTable>)>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(CleaningOptions::default())
    }
}

impl DataLoader {
    pub fn new(options: CleaningOptions) -> Self {
        Self {
            options,
            cached: None,
        }
    }

    pub fn options(&self) -> CleaningOptions {
        self.options
    }

    /// Load a cleaned table, reusing the cached one when the path matches.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Arc<CleanedTable>, DataLoadError> {
        let path = path.as_ref();
        if let Some(table) = self.cached_for(path) {
            debug!(path = %path.display(), "table cache hit");
            return Ok(table);
        }

        let table = Arc::new(Self::read_clean(path, self.options)?);
        self.store(path, Arc::clone(&table));
        Ok(table)
    }

    /// Read and clean without touching the cache (used from background threads).
    pub fn read_clean(path: &Path, options: CleaningOptions) -> Result<CleanedTable, DataLoadError> {
        std::fs::metadata(path).map_err(|source| DataLoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let null_values = NULL_MARKERS
            .iter()
            .map(|marker| PlSmallStr::from(*marker))
            .collect();

        // Every column as text; coercion happens in the cleaner
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_null_values(Some(NullValues::AllColumns(null_values)))
            .finish()?
            .collect()?;

        let table = clean_frame(df, options)?;
        info!(
            path = %path.display(),
            rows = table.height(),
            columns = table.column_names().len(),
            "loaded table"
        );
        Ok(table)
    }

    /// Put a table in the cache, replacing any entry for another path.
    pub fn store(&mut self, path: &Path, table: Arc<CleanedTable>) {
        if let Some((old, _)) = &self.cached {
            if old != path {
                debug!(old = %old.display(), new = %path.display(), "replacing cached table");
            }
        }
        self.cached = Some((path.to_path_buf(), table));
    }

    pub fn cached_for(&self, path: &Path) -> Option<Arc<CleanedTable>> {
        self.cached
            .as_ref()
            .filter(|(cached_path, _)| cached_path == path)
            .map(|(_, table)| Arc::clone(table))
    }

    /// The currently cached table.
    pub fn current(&self) -> Option<&Arc<CleanedTable>> {
        self.cached.as_ref().map(|(_, table)| table)
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.cached.as_ref().map(|(path, _)| path.as_path())
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
