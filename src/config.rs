/// Analyzer configuration
///
/// Loaded from an optional JSON file; command line flags are applied on top in `main`.

use std::path::Path;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::core::distribution::DEFAULT_BINS;
use crate::core::extractor::ExtractOptions;
use crate::core::frequency::SizeRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Ignore sizes followed by `/s`
    pub exclude_rates: bool,
    /// Segments analyzed after the overall run
    pub ranges: Vec<SizeRange>,
    /// Bins in the log-scale size histogram
    pub size_bins: usize,
    /// Open the HTML chart once written
    pub open_browser: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            exclude_rates: true,
            ranges: SizeRange::default_segments(),
            size_bins: DEFAULT_BINS,
            open_browser: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            exclude_rates: self.exclude_rates,
        }
    }

    /// Load configuration from file if provided
    ///
    /// A missing file or invalid JSON is logged and the defaults are used.
    pub fn load(config_path: Option<&Path>) -> Self {
        let path = match config_path {
            Some(path) => path,
            None => return Self::default(),
        };

        if !path.exists() {
            error!("Configuration file not found: {}", path.display());
            return Self::default();
        }

        let config_str = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                error!("Cannot read configuration file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&config_str) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                error!("Invalid JSON in configuration file: {}", e);
                Self::default()
            }
        }
    }
}
