/// Core module for Benford analysis
///
/// This module contains the analysis pipeline: size extraction, leading digit
/// classification, frequency counting and the chi-square conformance test.

pub mod analyzer;
pub mod chi_square;
pub mod digits;
pub mod distribution;
pub mod extractor;
pub mod frequency;
pub mod patterns;
