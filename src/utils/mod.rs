/// Utility modules for the Benford analyzer
///
/// This module contains utility functions for file handling, output formatting,
/// and opening the rendered chart.

pub mod browser;
pub mod file_utils;
pub mod output_formatter;
