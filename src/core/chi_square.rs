/// Chi-square goodness-of-fit against an expected first-digit distribution

use std::fmt;

use serde::Serialize;

use crate::core::digits::{Digit, ExpectedDistribution};
use crate::core::frequency::DigitHistogram;

/// Degrees of freedom for nine digit categories
pub const DEGREES_OF_FREEDOM: u32 = 8;

/// Critical value at α = 0.05
pub const CRITICAL_VALUE_05: f64 = 15.51;

/// Critical value at α = 0.01
pub const CRITICAL_VALUE_01: f64 = 20.09;

/// How well the observed digits follow the expected distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    GoodFit,
    MarginalFit,
    PoorFit,
}

impl Verdict {
    pub fn from_statistic(statistic: f64) -> Self {
        if statistic < CRITICAL_VALUE_05 {
            Verdict::GoodFit
        } else if statistic < CRITICAL_VALUE_01 {
            Verdict::MarginalFit
        } else {
            Verdict::PoorFit
        }
    }

    /// Human readable interpretation
    pub fn description(&self) -> &'static str {
        match self {
            Verdict::GoodFit => "Good fit! The data follows Benford's Law (p > 0.05)",
            Verdict::MarginalFit => "Marginal fit to Benford's Law (0.01 < p < 0.05)",
            Verdict::PoorFit => "Poor fit. Data does not follow Benford's Law (p < 0.01)",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::GoodFit => "good-fit",
            Verdict::MarginalFit => "marginal-fit",
            Verdict::PoorFit => "poor-fit",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub verdict: Verdict,
}

/// Chi-square statistic of `histogram` against `expected`
///
/// Returns `None` for an empty histogram.
pub fn chi_square(
    histogram: &DigitHistogram,
    expected: &ExpectedDistribution,
) -> Option<ChiSquareResult> {
    if histogram.is_empty() {
        return None;
    }

    let total = histogram.total() as f64;
    let statistic: f64 = Digit::all()
        .map(|digit| {
            let expected_count = expected.percentage(digit) / 100.0 * total;
            let observed = histogram.count(digit) as f64;
            (observed - expected_count).powi(2) / expected_count
        })
        .sum();

    Some(ChiSquareResult {
        statistic,
        verdict: Verdict::from_statistic(statistic),
    })
}
