/// Size extraction from log lines
///
/// Finds the first size token on each line, drops transfer-rate figures when asked to,
/// and converts the value to KiB. Lines that cannot be converted are skipped and counted.

use std::fmt;

use log::{debug, trace};
use serde::Serialize;

use crate::core::patterns::{self, SIZE_REGEX};

/// A non-negative, finite size in KiB
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Magnitude(f64);

impl Magnitude {
    /// Wrap a value, rejecting negatives, NaN and infinities
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, patterns::CANONICAL_UNIT)
    }
}

/// Why a matched line produced no magnitude
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineError {
    #[error("malformed number: {0:?}")]
    MalformedNumber(String),

    #[error("unknown unit {unit:?} (expected one of {known:?})")]
    UnknownUnit {
        unit: String,
        known: Vec<&'static str>,
    },
}

/// Extraction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Ignore matches immediately followed by `/s`
    pub exclude_rates: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { exclude_rates: true }
    }
}

/// Counters collected while extracting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub lines_read: usize,
    pub magnitudes: usize,
    pub rates_skipped: usize,
    pub malformed_numbers: usize,
    pub unknown_units: usize,
}

impl ExtractionSummary {
    /// Lines that matched the size pattern but were dropped
    pub fn skipped(&self) -> usize {
        self.rates_skipped + self.malformed_numbers + self.unknown_units
    }
}

/// Turns log lines into magnitudes
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Parse one line
    ///
    /// `Ok(None)` means the line holds no size token, or only a rate that is excluded.
    pub fn parse_line(&self, line: &str) -> Result<Option<Magnitude>, LineError> {
        let caps = match SIZE_REGEX.captures(line) {
            Some(caps) => caps,
            None => return Ok(None),
        };

        if self.options.exclude_rates && caps.get(3).is_some() {
            return Ok(None);
        }

        let number = &caps[1];
        let unit = &caps[2];

        let factor = patterns::unit_factor(unit).ok_or_else(|| LineError::UnknownUnit {
            unit: unit.to_string(),
            known: patterns::known_units(),
        })?;

        let value: f64 = number
            .parse()
            .map_err(|_| LineError::MalformedNumber(number.to_string()))?;

        Magnitude::new(value * factor)
            .map(Some)
            .ok_or_else(|| LineError::MalformedNumber(number.to_string()))
    }

    /// Lazily extract magnitudes from a sequence of lines
    pub fn extract<I>(&self, lines: I) -> Magnitudes<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Magnitudes {
            extractor: *self,
            lines: lines.into_iter(),
            summary: ExtractionSummary::default(),
        }
    }

    /// Record the outcome of one line, returning the magnitude if any
    pub(crate) fn consume_line(
        &self,
        line: &str,
        summary: &mut ExtractionSummary,
    ) -> Option<Magnitude> {
        summary.lines_read += 1;

        match self.parse_line(line) {
            Ok(Some(magnitude)) => {
                summary.magnitudes += 1;
                Some(magnitude)
            }
            Ok(None) => {
                if self.options.exclude_rates && is_rate_line(line) {
                    trace!("Skipping rate figure: {}", line);
                    summary.rates_skipped += 1;
                }
                None
            }
            Err(e) => {
                debug!("Skipping line {}: {}", summary.lines_read, e);
                match e {
                    LineError::MalformedNumber(_) => summary.malformed_numbers += 1,
                    LineError::UnknownUnit { .. } => summary.unknown_units += 1,
                }
                None
            }
        }
    }
}

fn is_rate_line(line: &str) -> bool {
    SIZE_REGEX
        .captures(line)
        .map_or(false, |caps| caps.get(3).is_some())
}

/// Iterator returned by [`Extractor::extract`]
pub struct Magnitudes<I> {
    extractor: Extractor,
    lines: I,
    summary: ExtractionSummary,
}

impl<I> Magnitudes<I> {
    /// Counters for the lines consumed so far
    pub fn summary(&self) -> ExtractionSummary {
        self.summary
    }
}

impl<I> Iterator for Magnitudes<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Magnitude;

    fn next(&mut self) -> Option<Magnitude> {
        for line in self.lines.by_ref() {
            if let Some(magnitude) = self.extractor.consume_line(line.as_ref(), &mut self.summary) {
                return Some(magnitude);
            }
        }
        None
    }
}
