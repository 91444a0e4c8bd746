/// Simple example demonstrating how to use the Benford Analyzer library

use anyhow::Result;
use benford_analyzer::analyze_file;

fn main() -> Result<()> {
    // Path to file for analysis
    let file_path = std::env::temp_dir().join("benford_sample.log");

    // Create sample file
    std::fs::write(
        &file_path,
        r#"[ALPM] downloading core.db 130.4 KiB 1201 KiB/s 00:00
[ALPM] installed linux (6.7.8) size 135.2 MiB
[ALPM] installed bash (5.2.026) size 1.8 MiB
[ALPM] installed tzdata (2024a) size 381.2 KiB
[ALPM] installed mesa (24.0.2) size 24.6 MiB
"#,
    )?;

    println!("Analyzing file: {}", file_path.display());

    let report = analyze_file(&file_path)?;

    match report.overall.outcome.report() {
        Some(frequencies) => {
            for row in &frequencies.rows {
                println!(
                    "digit {}: {:5.1}% (expected {:4.1}%)",
                    row.digit, row.actual_pct, row.expected_pct
                );
            }
        }
        None => println!("No sizes found"),
    }

    if let Some(result) = report.overall.chi_square {
        println!("chi-square {:.2}: {}", result.statistic, result.verdict);
    }

    Ok(())
}
