/// Leading digit frequencies over a set of magnitudes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::digits::{leading_digit, Digit, ExpectedDistribution};
use crate::core::extractor::Magnitude;

/// Half-open interval `[min, max)` in KiB; `max: None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

impl SizeRange {
    pub fn new(min: f64, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// `[0, +inf)`
    pub fn unbounded() -> Self {
        Self { min: 0.0, max: None }
    }

    pub fn contains(&self, magnitude: Magnitude) -> bool {
        let value = magnitude.value();
        value >= self.min && self.max.map_or(true, |max| value < max)
    }

    /// Segments used when none are configured
    pub fn default_segments() -> Vec<SizeRange> {
        vec![
            SizeRange::new(0.0, Some(100.0)),
            SizeRange::new(100.0, Some(1000.0)),
            SizeRange::new(1000.0, Some(10000.0)),
            SizeRange::new(10000.0, None),
        ]
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{:.0} KiB to {:.0} KiB", self.min, max),
            None => write!(f, "{:.0} KiB and above", self.min),
        }
    }
}

/// Counts per leading digit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DigitHistogram {
    counts: [u64; 9],
    total: u64,
}

impl DigitHistogram {
    /// Build from an explicit count per digit (index 0 is digit 1)
    pub fn from_counts(counts: [u64; 9]) -> Self {
        Self {
            counts,
            total: counts.iter().sum(),
        }
    }

    fn record(&mut self, digit: Digit) {
        self.counts[digit.index()] += 1;
        self.total += 1;
    }

    pub fn count(&self, digit: Digit) -> u64 {
        self.counts[digit.index()]
    }

    pub fn counts(&self) -> &[u64; 9] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// One table row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DigitFrequency {
    pub digit: Digit,
    pub actual_pct: f64,
    pub expected_pct: f64,
    pub count: u64,
}

/// Category labels and both bar series of the comparison chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub actual: Vec<f64>,
    pub expected: Vec<f64>,
}

/// Actual vs. expected percentages for a non-empty histogram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyReport {
    pub histogram: DigitHistogram,
    pub rows: Vec<DigitFrequency>,
}

impl FrequencyReport {
    /// Returns `None` for an empty histogram
    pub fn new(histogram: DigitHistogram, expected: &ExpectedDistribution) -> Option<Self> {
        if histogram.is_empty() {
            return None;
        }

        let total = histogram.total() as f64;
        let rows = Digit::all()
            .map(|digit| {
                let count = histogram.count(digit);
                DigitFrequency {
                    digit,
                    actual_pct: 100.0 * count as f64 / total,
                    expected_pct: expected.percentage(digit),
                    count,
                }
            })
            .collect();

        Some(Self { histogram, rows })
    }

    pub fn total(&self) -> u64 {
        self.histogram.total()
    }

    pub fn chart_series(&self) -> ChartSeries {
        ChartSeries {
            labels: self.rows.iter().map(|row| row.digit.to_string()).collect(),
            actual: self.rows.iter().map(|row| row.actual_pct).collect(),
            expected: self.rows.iter().map(|row| row.expected_pct).collect(),
        }
    }
}

/// Result of analyzing one range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FrequencyOutcome {
    /// Nothing classifiable fell in the range
    NoData,
    Analyzed(FrequencyReport),
}

impl FrequencyOutcome {
    pub fn report(&self) -> Option<&FrequencyReport> {
        match self {
            FrequencyOutcome::NoData => None,
            FrequencyOutcome::Analyzed(report) => Some(report),
        }
    }

    pub fn total(&self) -> u64 {
        self.report().map_or(0, FrequencyReport::total)
    }
}

/// Count leading digits of the magnitudes inside `range`
///
/// Magnitudes without a leading digit are left out of the histogram and its total.
pub fn digit_histogram(magnitudes: &[Magnitude], range: SizeRange) -> DigitHistogram {
    let mut histogram = DigitHistogram::default();

    for magnitude in magnitudes.iter().copied().filter(|m| range.contains(*m)) {
        if let Some(digit) = leading_digit(magnitude) {
            histogram.record(digit);
        }
    }

    histogram
}

/// Histogram and percentage report for the magnitudes inside `range`
pub fn analyze(
    magnitudes: &[Magnitude],
    range: SizeRange,
    expected: &ExpectedDistribution,
) -> FrequencyOutcome {
    match FrequencyReport::new(digit_histogram(magnitudes, range), expected) {
        Some(report) => FrequencyOutcome::Analyzed(report),
        None => FrequencyOutcome::NoData,
    }
}
