/// Benford Analyzer - first digit analysis of sizes found in log files
///
/// The main entry point for the analyzer application. It parses command-line
/// arguments and coordinates the analysis, the exports and the chart.

use anyhow::Result;
use clap::{ArgAction, Parser};
use colored::Colorize;
use log::{error, LevelFilter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use benford_analyzer::app::{self, ExportPaths};
use benford_analyzer::utils::{browser, output_formatter};
use benford_analyzer::AnalyzerConfig;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "benford_analyzer",
    version,
    about = "Checks the leading digits of sizes found in a log file against Benford's Law",
    long_about = "Extracts sizes such as `12.5 MiB` from every line of a log file, normalizes them to KiB,
and compares the distribution of their first digits with Benford's Law:
- digit table with actual and expected percentages
- chi-square goodness-of-fit test (8 degrees of freedom)
- the same analysis per size range
- an HTML bar chart opened in the browser"
)]
struct Args {
    /// Path to the log file to analyze
    #[arg(name = "log_file")]
    log_file: PathBuf,

    /// Path to configuration file (JSON)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Keep transfer rates such as `512 KiB/s`
    #[arg(long = "include-rates", action = ArgAction::SetTrue)]
    include_rates: bool,

    /// Skip the per size range analysis
    #[arg(long = "no-ranges", action = ArgAction::SetTrue)]
    no_ranges: bool,

    /// Number of bins in the log-scale size histogram
    #[arg(long = "bins")]
    bins: Option<usize>,

    /// Write the HTML chart report to this file
    #[arg(long = "html", default_value = "benford.html")]
    html: PathBuf,

    /// Export results to JSON file
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Export results to CSV file
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Directory to store all output files
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Do not open the chart in a browser
    #[arg(long = "no-open", action = ArgAction::SetTrue)]
    no_open: bool,

    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Set logging level (default: INFO)
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,

    /// Log file path (default: benford_analyzer.log)
    #[arg(long = "log-file", default_value = "benford_analyzer.log")]
    log_file_path: String,
}

/// Main entry point function
fn main() -> Result<()> {
    let start_time = Instant::now();

    let args = Args::parse();

    setup_logging(&args);

    let config = apply_overrides(AnalyzerConfig::load(args.config.as_deref()), &args);

    let report = match app::run_analyzer(&args.log_file, &config) {
        Ok(report) => report,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let paths = export_paths(&args);
    app::export_all_results(&report, &paths)?;

    if !args.quiet {
        println!("{}", output_formatter::format_report(&report, args.md));
        println!(
            "{} {:.2} seconds",
            "Time elapsed:".green(),
            start_time.elapsed().as_secs_f64()
        );
    }

    if let Some(html_path) = &paths.html {
        if config.open_browser {
            open_chart(html_path, args.quiet);
        } else if !args.quiet {
            println!("\nChart written to {}", html_path.display());
        }
    }

    Ok(())
}

/// Set up logging with file output
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use std::io::Write;
        use chrono::Local;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Ok(file) = File::create(&args.log_file_path) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
}

/// Command line flags win over the configuration file
fn apply_overrides(mut config: AnalyzerConfig, args: &Args) -> AnalyzerConfig {
    if args.include_rates {
        config.exclude_rates = false;
    }
    if args.no_ranges {
        config.ranges.clear();
    }
    if let Some(bins) = args.bins {
        config.size_bins = bins;
    }
    if args.no_open {
        config.open_browser = false;
    }
    config
}

/// Resolve export paths, placing relative ones under `--output-dir`
fn export_paths(args: &Args) -> ExportPaths {
    let place = |path: &Path| match &args.output_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    };

    ExportPaths {
        html: Some(place(&args.html)),
        json: args.json.as_deref().map(place),
        csv: args.csv.as_deref().map(place),
    }
}

/// Open the chart, falling back to printing its location
fn open_chart(html_path: &Path, quiet: bool) {
    match browser::open_in_browser(html_path) {
        Ok(url) => {
            if !quiet {
                println!("\nOpening chart in browser: {}", url);
            }
        }
        Err(e) => {
            error!("Error opening browser: {:#}", e);
            eprintln!("Error opening browser: {:#}", e);
            eprintln!(
                "Please open {} manually in your web browser",
                html_path.display()
            );
        }
    }
}
