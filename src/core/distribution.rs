/// Size distribution on a logarithmic scale

use serde::Serialize;

use crate::core::extractor::Magnitude;

/// Default number of log-spaced bins
pub const DEFAULT_BINS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogBin {
    /// Inclusive lower edge in KiB
    pub lower: f64,
    /// Upper edge in KiB, inclusive for the last bin only
    pub upper: f64,
    pub count: u64,
}

/// Histogram with equal-width bins in log10 space
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogHistogram {
    pub bins: Vec<LogBin>,
    /// Magnitudes equal to zero, which have no logarithm
    pub zero_count: u64,
}

impl LogHistogram {
    pub fn build(magnitudes: &[Magnitude], bin_count: usize) -> Self {
        let zero_count = magnitudes.iter().filter(|m| m.value() == 0.0).count() as u64;
        let positive: Vec<f64> = magnitudes
            .iter()
            .map(|m| m.value())
            .filter(|v| *v > 0.0)
            .collect();

        let (min, max) = match min_max(&positive) {
            Some(bounds) => bounds,
            None => {
                return Self {
                    bins: Vec::new(),
                    zero_count,
                }
            }
        };

        if min == max || bin_count <= 1 {
            return Self {
                bins: vec![LogBin {
                    lower: min,
                    upper: max,
                    count: positive.len() as u64,
                }],
                zero_count,
            };
        }

        let log_min = min.log10();
        let width = (max.log10() - log_min) / bin_count as f64;

        let mut bins: Vec<LogBin> = (0..bin_count)
            .map(|i| LogBin {
                lower: 10f64.powf(log_min + width * i as f64),
                upper: 10f64.powf(log_min + width * (i + 1) as f64),
                count: 0,
            })
            .collect();

        for value in positive {
            let index = (((value.log10() - log_min) / width) as usize).min(bin_count - 1);
            bins[index].count += 1;
        }

        Self { bins, zero_count }
    }

    pub fn total(&self) -> u64 {
        self.zero_count + self.bins.iter().map(|b| b.count).sum::<u64>()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Largest single bin count
    pub fn peak(&self) -> u64 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magnitudes(values: &[f64]) -> Vec<Magnitude> {
        values.iter().map(|v| Magnitude::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_counts_cover_all_values() {
        let values = magnitudes(&[0.0, 1.0, 10.0, 100.0, 1000.0, 1000.0, 55.5]);
        let histogram = LogHistogram::build(&values, 3);
        assert_eq!(histogram.bins.len(), 3);
        assert_eq!(histogram.zero_count, 1);
        assert_eq!(histogram.total(), 7);
        assert_eq!(histogram.bins[0].count, 1);
        assert_eq!(histogram.bins[1].count, 2);
        assert_eq!(histogram.bins[2].count, 3);
        assert!((histogram.bins[0].lower - 1.0).abs() < 1e-9);
        assert!((histogram.bins[2].upper - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_and_zero_only() {
        assert!(LogHistogram::build(&[], DEFAULT_BINS).is_empty());

        let histogram = LogHistogram::build(&magnitudes(&[0.0, 0.0]), DEFAULT_BINS);
        assert!(histogram.is_empty());
        assert_eq!(histogram.total(), 2);
    }

    #[test]
    fn test_single_distinct_value() {
        let histogram = LogHistogram::build(&magnitudes(&[42.0, 42.0, 42.0]), DEFAULT_BINS);
        assert_eq!(histogram.bins.len(), 1);
        assert_eq!(histogram.peak(), 3);
    }
}
