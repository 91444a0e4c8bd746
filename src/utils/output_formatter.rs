/// Output formatter for analysis results
///
/// This module handles formatting and exporting analysis results in various formats,
/// including console output, JSON, an HTML chart report, and CSV.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use handlebars::Handlebars;
use serde_json::{json, Value};

use crate::core::analyzer::{AnalysisReport, SegmentReport};
use crate::core::chi_square::{
    ChiSquareResult, Verdict, CRITICAL_VALUE_01, CRITICAL_VALUE_05, DEGREES_OF_FREEDOM,
};
use crate::core::distribution::LogHistogram;
use crate::core::frequency::{ChartSeries, FrequencyReport};

/// Series names shown in chart legends
pub const ACTUAL_SERIES: &str = "Actual";
pub const EXPECTED_SERIES: &str = "Expected (Benford's Law)";

/// Chart title, axis names
pub const CHART_TITLE: &str = "First Digit Distribution vs Benford's Law";
pub const CATEGORY_AXIS: &str = "First Digit";
pub const VALUE_AXIS: &str = "Frequency (%)";

const TABLE_HEADER: &str = "Digit | Actual % | Expected % | Count";

/// Format the digit table of one frequency report
pub fn format_frequency_table(report: &FrequencyReport) -> String {
    let mut output = String::new();

    output.push_str(TABLE_HEADER);
    output.push('\n');
    output.push_str(&"-".repeat(45));
    output.push('\n');

    for row in &report.rows {
        output.push_str(&format!(
            "{:5} | {:8.1} | {:8.1} | {:5}\n",
            row.digit.get(),
            row.actual_pct,
            row.expected_pct,
            row.count
        ));
    }

    output
}

fn colored_verdict(result: &ChiSquareResult) -> ColoredString {
    let line = format!("Result: {}", result.verdict.description());
    match result.verdict {
        Verdict::GoodFit => line.green(),
        Verdict::MarginalFit => line.yellow(),
        Verdict::PoorFit => line.red(),
    }
}

fn format_critical_values() -> String {
    format!(
        "Critical values (degrees of freedom = {}):\n  α = 0.05: {:.2}\n  α = 0.01: {:.2}\n",
        DEGREES_OF_FREEDOM, CRITICAL_VALUE_05, CRITICAL_VALUE_01
    )
}

fn format_segment(segment: &SegmentReport) -> String {
    let mut output = String::new();

    let report = match segment.outcome.report() {
        Some(report) => report,
        None => {
            output.push_str(&format!("\nNo files found in range {}\n", segment.range));
            return output;
        }
    };

    output.push_str(&format!(
        "\n{} (Total files: {}):\n",
        format!("Analysis for files in range {}", segment.range).cyan(),
        report.total()
    ));
    output.push_str(&format_frequency_table(report));

    if let Some(result) = &segment.chi_square {
        output.push_str(&format!(
            "\nChi-square statistic: {:.2} (for this range)\n",
            result.statistic
        ));
        output.push_str(&format!("{}\n", colored_verdict(result)));
    }

    output
}

/// Format the full analysis for console output
///
/// # Arguments
///
/// * `report` - Result of one analysis run
/// * `use_markdown` - Whether to wrap the output in markdown triple backticks
///
/// # Returns
///
/// Formatted string for console output
pub fn format_report(report: &AnalysisReport, use_markdown: bool) -> String {
    let mut output = String::new();

    if use_markdown {
        output.push_str("```\n");
    }

    output.push_str(&format!("{}\n", "=== Overall Analysis ===".yellow().bold()));

    let extraction = &report.extraction;
    output.push_str(&format!(
        "Lines read: {} | sizes extracted: {} | skipped: {} rate, {} malformed, {} unknown unit\n",
        extraction.lines_read,
        extraction.magnitudes,
        extraction.rates_skipped,
        extraction.malformed_numbers,
        extraction.unknown_units
    ));
    output.push_str(&format!("Total number of files: {}\n", report.overall.total()));

    match (report.overall.outcome.report(), &report.overall.chi_square) {
        (Some(frequencies), Some(result)) => {
            output.push('\n');
            output.push_str(&format_frequency_table(frequencies));
            output.push_str(&format!(
                "\nOverall Chi-square statistic: {:.2}\n",
                result.statistic
            ));
            output.push_str(&format_critical_values());
            output.push_str(&format!("{}\n", colored_verdict(result)));
        }
        _ => {
            output.push_str(&format!(
                "\n{}\n",
                "No data: no sizes with a leading digit were found".red()
            ));
        }
    }

    if !report.segments.is_empty() {
        output.push_str(&format!("\n{}\n", "=== Analysis by Size Ranges ===".yellow().bold()));
        for segment in &report.segments {
            output.push_str(&format_segment(segment));
        }
    }

    if use_markdown {
        output.push_str("```\n");
    }

    output
}

/// Export results to a JSON file
///
/// # Arguments
///
/// * `report` - Result of one analysis run
/// * `output_path` - Path where the JSON file will be written
pub fn export_results_json(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    serde_json::to_writer_pretty(file, report).context("Failed to write JSON data")?;

    Ok(())
}

/// Chart drawing area, in SVG user units
const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 50.0;
const Y_TICKS: usize = 5;

fn plot_width() -> f64 {
    CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn baseline() -> f64 {
    CHART_HEIGHT - MARGIN_BOTTOM
}

/// Round up to the next multiple of 5, at least 5
fn axis_max(value: f64) -> f64 {
    ((value / 5.0).ceil() * 5.0).max(5.0)
}

fn y_ticks(max: f64) -> Vec<Value> {
    (0..=Y_TICKS)
        .map(|i| {
            let value = max * i as f64 / Y_TICKS as f64;
            json!({
                "y": format!("{:.1}", baseline() - plot_height() * value / max),
                "label": format!("{:.0}", value),
            })
        })
        .collect()
}

fn bar(x: f64, width: f64, value: f64, max: f64, tooltip: String) -> Value {
    let height = plot_height() * value / max;
    json!({
        "x": format!("{:.1}", x),
        "y": format!("{:.1}", baseline() - height),
        "width": format!("{:.1}", width),
        "height": format!("{:.1}", height),
        "tooltip": tooltip,
    })
}

/// Bar geometry for the grouped actual/expected chart
///
/// # Arguments
///
/// * `title` - Chart heading
/// * `series` - Labels and both percentage series
///
/// # Returns
///
/// Template data for one SVG chart
pub fn digit_chart_data(title: &str, series: &ChartSeries) -> Value {
    let peak = series
        .actual
        .iter()
        .chain(series.expected.iter())
        .copied()
        .fold(0.0, f64::max);
    let max = axis_max(peak);

    let group_width = plot_width() / series.labels.len().max(1) as f64;
    let bar_width = group_width * 0.35;

    let groups: Vec<Value> = series
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let group_x = MARGIN_LEFT + group_width * i as f64;
            let actual_x = group_x + group_width * 0.15;
            let expected_x = actual_x + bar_width;
            let actual = series.actual[i];
            let expected = series.expected[i];

            json!({
                "label": label,
                "label_x": format!("{:.1}", group_x + group_width / 2.0),
                "actual": bar(actual_x, bar_width, actual, max,
                    format!("{}: digit {} = {:.1}%", ACTUAL_SERIES, label, actual)),
                "expected": bar(expected_x, bar_width, expected, max,
                    format!("{}: digit {} = {:.1}%", EXPECTED_SERIES, label, expected)),
            })
        })
        .collect();

    json!({
        "title": title,
        "groups": groups,
        "ticks": y_ticks(max),
    })
}

/// Bar geometry for the log-scale size distribution chart
pub fn size_chart_data(histogram: &LogHistogram) -> Value {
    let peak = histogram.peak().max(1) as f64;
    let bin_width = plot_width() / histogram.bins.len().max(1) as f64;

    let bars: Vec<Value> = histogram
        .bins
        .iter()
        .enumerate()
        .map(|(i, bin)| {
            bar(
                MARGIN_LEFT + bin_width * i as f64,
                bin_width,
                bin.count as f64,
                peak,
                format!("{:.2} to {:.2} KiB: {}", bin.lower, bin.upper, bin.count),
            )
        })
        .collect();

    let first = histogram.bins.first().map(|b| b.lower).unwrap_or(0.0);
    let last = histogram.bins.last().map(|b| b.upper).unwrap_or(0.0);

    json!({
        "has_bars": !bars.is_empty(),
        "bars": bars,
        "peak": histogram.peak(),
        "min_label": format!("{:.2} KiB", first),
        "max_label": format!("{:.2} KiB", last),
        "zero_count": histogram.zero_count,
    })
}

fn segment_data(name: &str, segment: &SegmentReport) -> Value {
    let mut data = serde_json::Map::new();
    data.insert("name".to_string(), json!(name));
    data.insert("range".to_string(), json!(segment.range.to_string()));

    match segment.outcome.report() {
        Some(report) => {
            data.insert("has_data".to_string(), json!(true));
            data.insert("total".to_string(), json!(report.total()));
            let rows: Vec<Value> = report
                .rows
                .iter()
                .map(|row| {
                    json!({
                        "digit": row.digit.get(),
                        "actual": format!("{:.1}", row.actual_pct),
                        "expected": format!("{:.1}", row.expected_pct),
                        "count": row.count,
                    })
                })
                .collect();
            data.insert("rows".to_string(), json!(rows));
            data.insert(
                "chart".to_string(),
                digit_chart_data(&format!("{} ({})", CHART_TITLE, name), &report.chart_series()),
            );
        }
        None => {
            data.insert("has_data".to_string(), json!(false));
        }
    }

    if let Some(result) = &segment.chi_square {
        data.insert("statistic".to_string(), json!(format!("{:.2}", result.statistic)));
        data.insert("verdict".to_string(), json!(result.verdict.to_string()));
        data.insert("interpretation".to_string(), json!(result.verdict.description()));
    }

    Value::Object(data)
}

const HTML_TEMPLATE: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{chart_title}}</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
        }
        h1 {
            color: #2c3e50;
            border-bottom: 2px solid #3498db;
            padding-bottom: 10px;
        }
        h2 {
            color: #2980b9;
            margin-top: 30px;
        }
        .timestamp {
            color: #7f8c8d;
            font-size: 0.9em;
            margin-bottom: 30px;
        }
        .summary {
            background-color: #e8f4f8;
            padding: 15px;
            border-radius: 5px;
            margin-bottom: 30px;
        }
        .segment {
            background-color: #f8f9fa;
            border-radius: 5px;
            padding: 15px;
            margin-bottom: 20px;
            box-shadow: 0 2px 5px rgba(0,0,0,0.1);
        }
        table {
            border-collapse: collapse;
        }
        th, td {
            padding: 4px 12px;
            border-bottom: 1px solid #eee;
            text-align: right;
        }
        .good-fit { color: #27ae60; }
        .marginal-fit { color: #e67e22; }
        .poor-fit { color: #c0392b; }
        .actual { fill: #5dade2; }
        .expected { fill: #82e0aa; }
        .bin { fill: #5d6d7e; }
        .axis { stroke: #333; }
        .grid { stroke: #ddd; }
    </style>
</head>
<body>
    <h1>{{chart_title}}</h1>
    <div class="timestamp">Generated on: {{timestamp}}{{#if source}} from {{source.path}} ({{source.file_size}} bytes){{/if}}</div>

    <div class="summary">
        <h2>Extraction Summary</h2>
        <p>Lines read: {{extraction.lines_read}}</p>
        <p>Sizes extracted: {{extraction.magnitudes}}</p>
        <p>Skipped: {{extraction.rates_skipped}} rate figures, {{extraction.malformed_numbers}} malformed numbers, {{extraction.unknown_units}} unknown units</p>
        <p>Critical values (degrees of freedom = {{degrees_of_freedom}}): &alpha; = 0.05: {{critical_05}}, &alpha; = 0.01: {{critical_01}}</p>
    </div>

    {{#each segments}}
    <div class="segment">
        <h2>{{name}} <small>({{range}})</small></h2>
        {{#if has_data}}
        <p>Total files: {{total}}</p>
        <svg width="{{@root.width}}" height="{{@root.height}}" viewBox="0 0 {{@root.width}} {{@root.height}}" role="img">
            <title>{{chart.title}}</title>
            {{#each chart.ticks}}
            <line class="grid" x1="{{@root.margin_left}}" x2="{{@root.plot_right}}" y1="{{y}}" y2="{{y}}" />
            <text x="{{@root.tick_label_x}}" y="{{y}}" text-anchor="end" font-size="11">{{label}}</text>
            {{/each}}
            {{#each chart.groups}}
            <rect class="actual" x="{{actual.x}}" y="{{actual.y}}" width="{{actual.width}}" height="{{actual.height}}"><title>{{actual.tooltip}}</title></rect>
            <rect class="expected" x="{{expected.x}}" y="{{expected.y}}" width="{{expected.width}}" height="{{expected.height}}"><title>{{expected.tooltip}}</title></rect>
            <text x="{{label_x}}" y="{{@root.label_y}}" text-anchor="middle" font-size="12">{{label}}</text>
            {{/each}}
            <line class="axis" x1="{{@root.margin_left}}" x2="{{@root.plot_right}}" y1="{{@root.baseline}}" y2="{{@root.baseline}}" />
            <text x="{{@root.axis_title_x}}" y="{{@root.height}}" text-anchor="middle" font-size="12" dy="-6">{{@root.category_axis}}</text>
            <text x="14" y="{{@root.axis_title_y}}" text-anchor="middle" font-size="12" transform="rotate(-90 14 {{@root.axis_title_y}})">{{@root.value_axis}}</text>
            <rect class="actual" x="{{@root.legend_x}}" y="4" width="12" height="12" />
            <text x="{{@root.legend_text_x}}" y="14" font-size="12">{{@root.actual_series}}</text>
            <rect class="expected" x="{{@root.legend_x}}" y="22" width="12" height="12" />
            <text x="{{@root.legend_text_x}}" y="32" font-size="12">{{@root.expected_series}}</text>
        </svg>
        <table>
            <tr><th>Digit</th><th>Actual %</th><th>Expected %</th><th>Count</th></tr>
            {{#each rows}}
            <tr><td>{{digit}}</td><td>{{actual}}</td><td>{{expected}}</td><td>{{count}}</td></tr>
            {{/each}}
        </table>
        {{#if statistic}}
        <p>Chi-square statistic: {{statistic}} &mdash; <span class="{{verdict}}">{{interpretation}}</span></p>
        {{/if}}
        {{else}}
        <p>No files found in range {{range}}</p>
        {{/if}}
    </div>
    {{/each}}

    <div class="segment">
        <h2>Distribution of Sizes (Log Scale)</h2>
        {{#if size_chart.has_bars}}
        <svg width="{{width}}" height="{{height}}" viewBox="0 0 {{width}} {{height}}" role="img">
            {{#each size_chart.bars}}
            <rect class="bin" x="{{x}}" y="{{y}}" width="{{width}}" height="{{height}}"><title>{{tooltip}}</title></rect>
            {{/each}}
            <line class="axis" x1="{{margin_left}}" x2="{{plot_right}}" y1="{{baseline}}" y2="{{baseline}}" />
            <text x="{{margin_left}}" y="{{label_y}}" font-size="11">{{size_chart.min_label}}</text>
            <text x="{{plot_right}}" y="{{label_y}}" text-anchor="end" font-size="11">{{size_chart.max_label}}</text>
            <text x="{{axis_title_x}}" y="{{height}}" text-anchor="middle" font-size="12" dy="-6">Size (KiB, log scale)</text>
            <text x="14" y="{{axis_title_y}}" text-anchor="middle" font-size="12" transform="rotate(-90 14 {{axis_title_y}})">Frequency (peak {{size_chart.peak}})</text>
        </svg>
        {{else}}
        <p>No positive sizes to plot.</p>
        {{/if}}
        <p>Zero-sized entries: {{size_chart.zero_count}}</p>
    </div>
</body>
</html>
"#;

/// Create an HTML chart report from analysis results
///
/// # Arguments
///
/// * `report` - Result of one analysis run
/// * `output_path` - Path where the HTML file will be written
///
/// # Returns
///
/// Result indicating success or failure
pub fn create_html_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let html = render_html_report(report)?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create HTML output file: {}", output_path.display()))?;

    file.write_all(html.as_bytes())
        .context("Failed to write HTML data")?;

    Ok(())
}

/// Render the HTML chart report to a string
pub fn render_html_report(report: &AnalysisReport) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string("report", HTML_TEMPLATE)
        .context("Failed to register HTML template")?;

    let mut segments = vec![segment_data("Overall", &report.overall)];
    segments.extend(report.segments.iter().map(|s| segment_data("Size range", s)));

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let template_data = json!({
        "chart_title": CHART_TITLE,
        "timestamp": timestamp,
        "source": report.source,
        "extraction": report.extraction,
        "degrees_of_freedom": DEGREES_OF_FREEDOM,
        "critical_05": format!("{:.2}", CRITICAL_VALUE_05),
        "critical_01": format!("{:.2}", CRITICAL_VALUE_01),
        "segments": segments,
        "size_chart": size_chart_data(&report.size_distribution),
        "width": CHART_WIDTH,
        "height": CHART_HEIGHT,
        "margin_left": MARGIN_LEFT,
        "plot_right": CHART_WIDTH - MARGIN_RIGHT,
        "baseline": baseline(),
        "label_y": baseline() + 18.0,
        "tick_label_x": MARGIN_LEFT - 6.0,
        "axis_title_x": MARGIN_LEFT + plot_width() / 2.0,
        "axis_title_y": MARGIN_TOP + plot_height() / 2.0,
        "legend_x": CHART_WIDTH - MARGIN_RIGHT - 190.0,
        "legend_text_x": CHART_WIDTH - MARGIN_RIGHT - 172.0,
        "category_axis": CATEGORY_AXIS,
        "value_axis": VALUE_AXIS,
        "actual_series": ACTUAL_SERIES,
        "expected_series": EXPECTED_SERIES,
    });

    handlebars
        .render("report", &template_data)
        .context("Failed to render HTML template")
}

/// Create a CSV report from analysis results
///
/// # Arguments
///
/// * `report` - Result of one analysis run
/// * `output_path` - Path where the CSV file will be written
///
/// # Returns
///
/// Result indicating success or failure
pub fn create_csv_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create CSV output file: {}", output_path.display()))?;

    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["Scope", "Digit", "Actual %", "Expected %", "Count"])
        .context("Failed to write CSV header")?;

    let scopes = std::iter::once(("Overall".to_string(), &report.overall)).chain(
        report
            .segments
            .iter()
            .map(|segment| (segment.range.to_string(), segment)),
    );

    for (scope, segment) in scopes {
        let frequencies = match segment.outcome.report() {
            Some(frequencies) => frequencies,
            None => continue,
        };

        for row in &frequencies.rows {
            writer
                .write_record([
                    scope.clone(),
                    row.digit.to_string(),
                    format!("{:.1}", row.actual_pct),
                    format!("{:.1}", row.expected_pct),
                    row.count.to_string(),
                ])
                .context("Failed to write CSV record")?;
        }
    }

    writer.flush().context("Failed to flush CSV writer")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::core::analyzer::BenfordAnalyzer;

    fn sample_report() -> AnalysisReport {
        BenfordAnalyzer::new(AnalyzerConfig::default())
            .analyze_lines(["a 12 KiB", "b 150 KiB", "c 2.5 MiB", "d 3 KiB/s"])
    }

    #[test]
    fn test_frequency_table_layout() {
        let report = sample_report();
        let table = format_frequency_table(report.overall.outcome.report().unwrap());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], TABLE_HEADER);
        assert_eq!(lines[1].len(), 45);
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[2], "    1 |     66.7 |     30.1 |     2");
    }

    #[test]
    fn test_console_report_sections() {
        colored::control::set_override(false);
        let output = format_report(&sample_report(), true);
        assert!(output.starts_with("```\n"));
        assert!(output.contains("=== Overall Analysis ==="));
        assert!(output.contains("Total number of files: 3"));
        assert!(output.contains("Overall Chi-square statistic:"));
        assert!(output.contains("=== Analysis by Size Ranges ==="));
        assert!(output.contains("No files found in range 10000 KiB and above"));
    }

    #[test]
    fn test_console_report_no_data() {
        colored::control::set_override(false);
        let report = BenfordAnalyzer::new(AnalyzerConfig::default()).analyze_lines(["nothing here"]);
        let output = format_report(&report, false);
        assert!(output.contains("No data"));
        assert!(!output.contains("Chi-square"));
    }

    #[test]
    fn test_digit_chart_geometry() {
        let series = ChartSeries {
            labels: (1..=9).map(|d| d.to_string()).collect(),
            actual: vec![50.0, 50.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            expected: vec![30.1, 17.6, 12.5, 9.7, 7.9, 6.7, 5.8, 5.1, 4.6],
        };
        let chart = digit_chart_data(CHART_TITLE, &series);
        let groups = chart["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 9);
        assert_eq!(groups[0]["label"], "1");
        assert_eq!(groups[0]["actual"]["height"], format!("{:.1}", plot_height()));
        assert_eq!(groups[2]["actual"]["height"], "0.0");
        assert_eq!(chart["ticks"].as_array().unwrap().len(), Y_TICKS + 1);
    }

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max(0.0), 5.0);
        assert_eq!(axis_max(30.1), 35.0);
        assert_eq!(axis_max(100.0), 100.0);
    }

    #[test]
    fn test_html_report_contains_chart() {
        let html = render_html_report(&sample_report()).unwrap();
        // handlebars escapes the apostrophe in the title
        assert!(html.contains("First Digit Distribution vs Benford"));
        assert!(html.contains(VALUE_AXIS));
        assert!(html.contains(CATEGORY_AXIS));
        assert!(html.contains("<svg"));
        assert!(html.contains("Distribution of Sizes (Log Scale)"));
    }
}
