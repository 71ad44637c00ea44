//! Dashboard Configuration Module
//! Data source path and presentation settings, loaded from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Default data file shipped next to the binary.
pub const DEFAULT_DATA_PATH: &str = "fema_sample_stratified.csv";

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "tsa_dashboard.json";

/// Environment variable overriding the data path.
pub const DATA_PATH_ENV: &str = "TSA_DASHBOARD_DATA";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for the dashboard.
///
/// Every field is optional in the JSON file:
/// ```json
/// {
///   "data_path": "fema_sample.csv",
///   "histogram_bins": 40,
///   "log_scale": false,
///   "preview_rows": 5,
///   "lenient_amounts": false,
///   "authors": "Jane Doe"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub histogram_bins: usize,
    /// Log10 scale for histogram counts.
    pub log_scale: bool,
    pub preview_rows: usize,
    /// Strip `,` and `$` from repair amounts before parsing.
    pub lenient_amounts: bool,
    /// Credit line shown under the summary text.
    pub authors: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            histogram_bins: 40,
            log_scale: false,
            preview_rows: 5,
            lenient_amounts: false,
            authors: None,
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig = serde_json::from_str(&content)?;
        Ok(config.sanitized())
    }

    /// Load `tsa_dashboard.json` if it exists, then apply the environment override.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            info!(path = %path.display(), "loading dashboard config");
            Self::from_file(path)?
        } else {
            debug!("no config file, using defaults");
            Self::default()
        };

        if let Ok(data_path) = std::env::var(DATA_PATH_ENV) {
            if !data_path.trim().is_empty() {
                config.data_path = PathBuf::from(data_path.trim());
            }
        }

        Ok(config)
    }

    fn sanitized(mut self) -> Self {
        self.histogram_bins = self.histogram_bins.max(1);
        self.authors = self
            .authors
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        self
    }
}
