/// Leading digit classification and the Benford distribution
///
/// The first significant digit is taken from the shortest round-trip rendering of the
/// value in scientific notation, so very large and very small magnitudes keep their
/// leading digit.

use std::fmt;

use serde::Serialize;

use crate::core::extractor::Magnitude;

/// A significant decimal digit, 1 through 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Digit(u8);

impl Digit {
    /// Returns `None` outside 1..=9
    pub fn new(value: u8) -> Option<Self> {
        if (1..=9).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in per-digit arrays
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All digits in ascending order
    pub fn all() -> impl Iterator<Item = Digit> {
        (1..=9).map(Digit)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// First significant digit of a magnitude, or `None` when it has none (zero)
pub fn leading_digit(magnitude: Magnitude) -> Option<Digit> {
    first_significant_digit(&format!("{:e}", magnitude.value()))
}

/// Scan a rendered number for the first character that is not `0` or `.`
fn first_significant_digit(rendered: &str) -> Option<Digit> {
    rendered
        .chars()
        .find(|c| *c != '0' && *c != '.')
        .and_then(|c| c.to_digit(10))
        .and_then(|d| Digit::new(d as u8))
}

/// Expected percentage for each leading digit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedDistribution {
    percentages: [f64; 9],
}

/// Benford's Law, first digit
pub const BENFORD: ExpectedDistribution = ExpectedDistribution {
    percentages: [30.1, 17.6, 12.5, 9.7, 7.9, 6.7, 5.8, 5.1, 4.6],
};

impl ExpectedDistribution {
    pub fn percentage(&self, digit: Digit) -> f64 {
        self.percentages[digit.index()]
    }

    pub fn percentages(&self) -> &[f64; 9] {
        &self.percentages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit_of(value: f64) -> Option<u8> {
        leading_digit(Magnitude::new(value).unwrap()).map(Digit::get)
    }

    #[test]
    fn test_zero_has_no_digit() {
        assert_eq!(digit_of(0.0), None);
    }

    #[test]
    fn test_leading_zeros_skipped() {
        assert_eq!(digit_of(0.05), Some(5));
        assert_eq!(digit_of(0.0500), Some(5));
        assert_eq!(digit_of(0.000_07), Some(7));
    }

    #[test]
    fn test_trailing_zero_padding() {
        assert_eq!(digit_of(5.0), Some(5));
        assert_eq!(digit_of(5.00), Some(5));
        assert_eq!(digit_of(500.0), Some(5));
    }

    #[test]
    fn test_extreme_magnitudes() {
        assert_eq!(digit_of(3.2e250), Some(3));
        assert_eq!(digit_of(8.1e-200), Some(8));
        assert_eq!(digit_of(f64::MIN_POSITIVE), Some(2));
    }

    #[test]
    fn test_fixed_point_scan() {
        assert_eq!(first_significant_digit("0.0500").map(Digit::get), Some(5));
        assert_eq!(first_significant_digit("000.000"), None);
        assert_eq!(first_significant_digit("0e0"), None);
    }

    #[test]
    fn test_benford_sums_to_hundred() {
        let sum: f64 = BENFORD.percentages().iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(BENFORD.percentage(Digit::new(1).unwrap()), 30.1);
        assert_eq!(BENFORD.percentage(Digit::new(9).unwrap()), 4.6);
    }

    #[test]
    fn test_digit_bounds() {
        assert!(Digit::new(0).is_none());
        assert!(Digit::new(10).is_none());
        assert_eq!(Digit::all().count(), 9);
        assert_eq!(Digit::new(4).unwrap().index(), 3);
    }
}
