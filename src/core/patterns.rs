/// Pattern definitions for size extraction
///
/// This module holds the regular expression used to find size tokens in log lines
/// and the table used to convert recognized units to KiB.

use lazy_static::lazy_static;
use regex::Regex;

/// Decimal number, optional whitespace, a binary size unit and an optional rate marker.
///
/// Capture groups: 1 = number, 2 = unit, 3 = `/s` when present.
pub const SIZE_PATTERN: &str = r"(\d+(?:\.\d+)?)\s*([A-Za-z]iB)(/s)?";

/// The unit all magnitudes are normalized to.
pub const CANONICAL_UNIT: &str = "KiB";

/// Multipliers converting a unit to KiB.
///
/// Adding a unit only requires a new row here.
pub const UNIT_FACTORS: &[(&str, f64)] = &[
    ("KiB", 1.0),
    ("MiB", 1024.0),
    ("GiB", 1024.0 * 1024.0),
    ("TiB", 1024.0 * 1024.0 * 1024.0),
];

lazy_static! {
    /// Precompiled size pattern available globally
    pub static ref SIZE_REGEX: Regex =
        Regex::new(SIZE_PATTERN).expect("size pattern is a valid regex");
}

/// Look up the KiB multiplier for a unit token
pub fn unit_factor(unit: &str) -> Option<f64> {
    UNIT_FACTORS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, factor)| *factor)
}

/// Names of all recognized units, smallest first
pub fn known_units() -> Vec<&'static str> {
    UNIT_FACTORS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_factor() {
        assert_eq!(unit_factor("KiB"), Some(1.0));
        assert_eq!(unit_factor("MiB"), Some(1024.0));
        assert_eq!(unit_factor("GiB"), Some(1_048_576.0));
        assert_eq!(unit_factor("PiB"), None);
        assert_eq!(unit_factor("kib"), None);
    }

    #[test]
    fn test_size_regex_captures() {
        let caps = SIZE_REGEX.captures("downloading 12.5 MiB/s").unwrap();
        assert_eq!(&caps[1], "12.5");
        assert_eq!(&caps[2], "MiB");
        assert!(caps.get(3).is_some());

        let caps = SIZE_REGEX.captures("installed size 300KiB").unwrap();
        assert_eq!(&caps[1], "300");
        assert_eq!(&caps[2], "KiB");
        assert!(caps.get(3).is_none());
    }

    #[test]
    fn test_known_units_smallest_first() {
        assert_eq!(known_units().first(), Some(&CANONICAL_UNIT));
    }
}
