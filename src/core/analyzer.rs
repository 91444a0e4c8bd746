/// Core Benford analyzer implementation
///
/// This file contains the BenfordAnalyzer which coordinates one run: extracting
/// magnitudes, analyzing the whole set and every configured range, and testing
/// each non-empty histogram for conformance.

use std::path::Path;
use std::time::Instant;

use log::{info, warn};
use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::core::chi_square::{chi_square, ChiSquareResult};
use crate::core::digits::{ExpectedDistribution, BENFORD};
use crate::core::distribution::LogHistogram;
use crate::core::extractor::{ExtractionSummary, Extractor, Magnitude};
use crate::core::frequency::{self, FrequencyOutcome, SizeRange};
use crate::utils::file_utils::{self, SourceError, SourceInfo};

/// Analysis of one range of magnitudes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    pub range: SizeRange,
    pub outcome: FrequencyOutcome,
    pub chi_square: Option<ChiSquareResult>,
}

impl SegmentReport {
    pub fn total(&self) -> u64 {
        self.outcome.total()
    }

    pub fn has_data(&self) -> bool {
        self.outcome.report().is_some()
    }
}

/// Everything produced by one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub source: Option<SourceInfo>,
    pub extraction: ExtractionSummary,
    pub overall: SegmentReport,
    pub segments: Vec<SegmentReport>,
    pub size_distribution: LogHistogram,
}

/// Core Benford analyzer structure
pub struct BenfordAnalyzer {
    /// Configuration options
    config: AnalyzerConfig,

    /// Line to magnitude conversion
    extractor: Extractor,

    /// Distribution the digits are compared against
    expected: ExpectedDistribution,
}

impl BenfordAnalyzer {
    /// Create a new BenfordAnalyzer comparing against Benford's Law
    pub fn new(config: AnalyzerConfig) -> Self {
        let extractor = Extractor::new(config.extract_options());

        Self {
            config,
            extractor,
            expected: BENFORD,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a log file
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the log file
    ///
    /// # Returns
    ///
    /// The full report, or a `SourceError` if the file cannot be read
    pub fn analyze_file(&self, file_path: &Path) -> Result<AnalysisReport, SourceError> {
        info!("Analyzing file: {}", file_path.display());
        let start_time = Instant::now();

        let source = file_utils::get_source_info(file_path)?;
        let (magnitudes, extraction) = file_utils::read_magnitudes(file_path, &self.extractor)?;

        let mut report = self.analyze_magnitudes(&magnitudes, extraction);
        report.source = Some(source);

        info!("Analysis completed in {:?}", start_time.elapsed());
        Ok(report)
    }

    /// Analyze lines already in memory
    pub fn analyze_lines<I>(&self, lines: I) -> AnalysisReport
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut iter = self.extractor.extract(lines);
        let magnitudes: Vec<Magnitude> = iter.by_ref().collect();
        self.analyze_magnitudes(&magnitudes, iter.summary())
    }

    /// Analyze extracted magnitudes as a whole and per configured range
    pub fn analyze_magnitudes(
        &self,
        magnitudes: &[Magnitude],
        extraction: ExtractionSummary,
    ) -> AnalysisReport {
        info!(
            "Extracted {} sizes from {} lines ({} skipped)",
            extraction.magnitudes,
            extraction.lines_read,
            extraction.skipped()
        );

        let overall = self.analyze_range(magnitudes, SizeRange::unbounded());
        if !overall.has_data() {
            warn!("No sizes with a leading digit were found");
        }

        let segments = self
            .config
            .ranges
            .iter()
            .map(|range| self.analyze_range(magnitudes, *range))
            .collect();

        AnalysisReport {
            source: None,
            extraction,
            overall,
            segments,
            size_distribution: LogHistogram::build(magnitudes, self.config.size_bins),
        }
    }

    /// Analyze the magnitudes that fall into one range
    pub fn analyze_range(&self, magnitudes: &[Magnitude], range: SizeRange) -> SegmentReport {
        let outcome = frequency::analyze(magnitudes, range, &self.expected);

        let chi_square = match outcome.report() {
            Some(report) => chi_square(&report.histogram, &self.expected),
            None => {
                info!("No sizes found in range {}", range);
                None
            }
        };

        SegmentReport {
            range,
            outcome,
            chi_square,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chi_square::Verdict;
    use crate::core::digits::Digit;

    fn analyzer() -> BenfordAnalyzer {
        BenfordAnalyzer::new(AnalyzerConfig::default())
    }

    #[test]
    fn test_rate_lines_excluded() {
        let report = analyzer().analyze_lines(["download 512 KiB/s", "saved 512 KiB", "saved 2 MiB"]);
        let frequencies = report.overall.outcome.report().unwrap();

        assert_eq!(frequencies.total(), 2);
        assert_eq!(frequencies.histogram.count(Digit::new(5).unwrap()), 1);
        assert_eq!(frequencies.histogram.count(Digit::new(2).unwrap()), 1);
        assert_eq!(report.extraction.rates_skipped, 1);
    }

    #[test]
    fn test_empty_input_is_no_data() {
        let report = analyzer().analyze_lines(Vec::<String>::new());
        assert_eq!(report.overall.outcome, FrequencyOutcome::NoData);
        assert!(report.overall.chi_square.is_none());
        assert!(report.segments.iter().all(|s| !s.has_data()));
        assert!(report.size_distribution.is_empty());
    }

    #[test]
    fn test_segments_sum_to_overall() {
        let lines = ["a 12 KiB", "b 340 KiB", "c 5.5 MiB", "d 1.2 GiB", "e 0 KiB", "f 99 KiB"];
        let report = analyzer().analyze_lines(lines);
        let segmented: u64 = report.segments.iter().map(SegmentReport::total).sum();
        assert_eq!(report.overall.total(), 5);
        assert_eq!(segmented, report.overall.total());
    }

    #[test]
    fn test_all_nines_poor_fit() {
        let lines: Vec<String> = (0..100).map(|i| format!("pkg{} {} KiB", i, 9 * 10_i64.pow(i % 4))).collect();
        let report = analyzer().analyze_lines(&lines);
        let result = report.overall.chi_square.unwrap();
        assert_eq!(result.verdict, Verdict::PoorFit);
    }
}
