/// Benford Analyzer - checks whether sizes found in a log follow Benford's Law
///
/// This library extracts sizes from log lines, counts their leading digits, and
/// compares the result with the Benford distribution using a chi-square test.

pub mod config;
pub mod core;
pub mod utils;

// Re-export main analyzer types for convenience
pub use crate::config::AnalyzerConfig;
pub use crate::core::analyzer::{AnalysisReport, BenfordAnalyzer, SegmentReport};
pub use crate::core::chi_square::{chi_square, ChiSquareResult, Verdict};
pub use crate::core::digits::{leading_digit, Digit, ExpectedDistribution, BENFORD};
pub use crate::core::extractor::{ExtractOptions, Extractor, Magnitude};
pub use crate::core::frequency::{analyze, DigitHistogram, FrequencyOutcome, FrequencyReport, SizeRange};
pub use crate::utils::file_utils::SourceError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze a single log file with the default configuration
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `file_path` - Path to the log file to analyze
///
/// # Returns
///
/// The analysis report, or an error if the file cannot be read
pub fn analyze_file<P: AsRef<std::path::Path>>(file_path: P) -> Result<AnalysisReport, SourceError> {
    BenfordAnalyzer::new(AnalyzerConfig::default()).analyze_file(file_path.as_ref())
}

/// Command-line application functionality
pub mod app {
    use crate::config::AnalyzerConfig;
    use crate::core::analyzer::{AnalysisReport, BenfordAnalyzer};
    use crate::utils::output_formatter;
    use anyhow::Context;
    use std::path::{Path, PathBuf};

    /// Where to write each export
    #[derive(Debug, Clone, Default)]
    pub struct ExportPaths {
        pub html: Option<PathBuf>,
        pub json: Option<PathBuf>,
        pub csv: Option<PathBuf>,
    }

    /// Run the analyzer on one file
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the log file
    /// * `config` - Configuration options
    pub fn run_analyzer(file_path: &Path, config: &AnalyzerConfig) -> anyhow::Result<AnalysisReport> {
        let analyzer = BenfordAnalyzer::new(config.clone());
        let report = analyzer.analyze_file(file_path)?;
        Ok(report)
    }

    /// Write every requested export
    pub fn export_all_results(report: &AnalysisReport, paths: &ExportPaths) -> anyhow::Result<()> {
        for path in [&paths.html, &paths.json, &paths.csv].into_iter().flatten() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
            }
        }

        if let Some(path) = &paths.json {
            output_formatter::export_results_json(report, path)?;
            log::info!("Wrote JSON report to {}", path.display());
        }

        if let Some(path) = &paths.csv {
            output_formatter::create_csv_report(report, path)?;
            log::info!("Wrote CSV report to {}", path.display());
        }

        if let Some(path) = &paths.html {
            output_formatter::create_html_report(report, path)?;
            log::info!("Wrote HTML chart to {}", path.display());
        }

        Ok(())
    }
}
