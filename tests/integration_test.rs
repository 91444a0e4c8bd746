/// Integration tests for the Benford analyzer
///
/// These tests run the whole pipeline on files: extraction, digit counting,
/// range segmentation, the chi-square verdict and the exports.

use std::path::Path;

use benford_analyzer::app::{self, ExportPaths};
use benford_analyzer::{
    analyze_file, AnalyzerConfig, BenfordAnalyzer, Digit, FrequencyOutcome, Verdict,
};

fn digit(d: u8) -> Digit {
    Digit::new(d).unwrap()
}

#[test]
fn test_analyze_test_file() {
    let report = analyze_file(Path::new("tests/test_data.log")).expect("Failed to analyze test file");

    assert_eq!(report.extraction.lines_read, 19);
    assert_eq!(report.extraction.magnitudes, 14);
    assert_eq!(report.extraction.rates_skipped, 1);
    assert_eq!(report.extraction.unknown_units, 1);
    assert_eq!(report.extraction.malformed_numbers, 0);

    let overall = report.overall.outcome.report().expect("overall analysis has data");
    assert_eq!(overall.total(), 13);
    assert_eq!(overall.histogram.count(digit(1)), 7);
    assert_eq!(overall.histogram.count(digit(8)), 1);
    assert_eq!(overall.histogram.count(digit(9)), 0);
    assert_eq!(
        overall.histogram.counts().iter().sum::<u64>(),
        overall.histogram.total()
    );

    let totals: Vec<u64> = report.segments.iter().map(|s| s.total()).collect();
    assert_eq!(totals, vec![1, 2, 3, 7]);

    let source = report.source.expect("source metadata");
    assert_eq!(source.file_name, "test_data.log");
}

#[test]
fn test_include_rates_option() {
    let config = AnalyzerConfig {
        exclude_rates: false,
        ..AnalyzerConfig::default()
    };
    let report = app::run_analyzer(Path::new("tests/test_data.log"), &config).unwrap();

    assert_eq!(report.extraction.rates_skipped, 0);
    assert_eq!(report.overall.total(), 14);
    assert_eq!(
        report.overall.outcome.report().unwrap().histogram.count(digit(3)),
        2
    );
}

#[test]
fn test_empty_file() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let empty_file_path = temp_dir.path().join("empty.log");
    std::fs::write(&empty_file_path, "").expect("Failed to write empty file");

    let report = analyze_file(&empty_file_path).expect("Failed to analyze empty file");

    assert_eq!(report.extraction.lines_read, 0);
    assert_eq!(report.overall.outcome, FrequencyOutcome::NoData);
    assert!(report.overall.chi_square.is_none());
    assert!(report.segments.iter().all(|s| s.chi_square.is_none()));
}

#[test]
fn test_missing_file_is_fatal() {
    let err = analyze_file("tests/does_not_exist.log").unwrap_err();
    assert!(err.to_string().contains("does_not_exist.log"));
}

#[test]
fn test_unit_normalization_end_to_end() {
    let analyzer = BenfordAnalyzer::new(AnalyzerConfig::default());
    let mib = analyzer.analyze_lines(["pkg 1 MiB"]);
    let kib = analyzer.analyze_lines(["pkg 1024 KiB"]);
    assert_eq!(mib.overall, kib.overall);
}

#[test]
fn test_benford_conforming_sample_is_good_fit() {
    // 1000 sizes whose leading digits match Benford's percentages exactly
    let counts = [301, 176, 125, 97, 79, 67, 58, 51, 46];
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("benford.log");

    let mut content = String::new();
    for (i, count) in counts.iter().enumerate() {
        for n in 0..*count {
            let scale = 10_f64.powi((n % 5) as i32);
            content.push_str(&format!("installed pkg size {} KiB\n", ((i + 1) as f64 + 0.25) * scale));
        }
    }
    std::fs::write(&path, content).unwrap();

    let report = analyze_file(&path).unwrap();
    assert_eq!(report.overall.total(), 1000);

    let result = report.overall.chi_square.unwrap();
    assert!(result.statistic < 1e-9, "statistic was {}", result.statistic);
    assert_eq!(result.verdict, Verdict::GoodFit);
}

#[test]
fn test_all_nines_is_poor_fit() {
    let lines: Vec<String> = (1..=50).map(|n| format!("pkg {}.{} MiB", 9, n)).collect();
    let report = BenfordAnalyzer::new(AnalyzerConfig::default()).analyze_lines(&lines);

    let overall = report.overall.outcome.report().unwrap();
    assert_eq!(overall.histogram.count(digit(9)), 50);
    assert_eq!(report.overall.chi_square.unwrap().verdict, Verdict::PoorFit);
}

#[test]
fn test_exports_written() {
    let temp_dir = tempfile::tempdir().unwrap();
    let paths = ExportPaths {
        html: Some(temp_dir.path().join("out/benford.html")),
        json: Some(temp_dir.path().join("out/benford.json")),
        csv: Some(temp_dir.path().join("out/benford.csv")),
    };

    let report = analyze_file("tests/test_data.log").unwrap();
    app::export_all_results(&report, &paths).unwrap();

    let html = std::fs::read_to_string(paths.html.as_ref().unwrap()).unwrap();
    assert!(html.contains("First Digit Distribution vs Benford"));
    assert!(html.contains("Frequency (%)"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(paths.json.as_ref().unwrap()).unwrap()).unwrap();
    assert_eq!(json["overall"]["outcome"]["status"], "analyzed");
    assert_eq!(json["overall"]["outcome"]["histogram"]["total"], 13);
    assert_eq!(json["segments"].as_array().unwrap().len(), 4);

    let csv = std::fs::read_to_string(paths.csv.as_ref().unwrap()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Scope,Digit,Actual %,Expected %,Count"));
    // 9 rows for the overall scope plus 9 per non-empty segment
    assert_eq!(lines.count(), 9 * 5);
}
