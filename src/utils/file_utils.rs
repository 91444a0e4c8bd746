/// File handling utilities
///
/// This module opens the input log, streams it line by line through an extractor,
/// and collects basic metadata about the source file.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::core::extractor::{ExtractionSummary, Extractor, Magnitude};

/// The input source could not be opened or read
#[derive(Debug, thiserror::Error)]
#[error("Cannot read {}: {source}", path.display())]
pub struct SourceError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl SourceError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Metadata about the analyzed file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub file_name: String,
    pub path: String,
    pub file_size: u64,
}

/// Read metadata for a file.
///
/// # Arguments
///
/// * `file_path` - Path to the file
pub fn get_source_info(file_path: &Path) -> Result<SourceInfo, SourceError> {
    let metadata = fs::metadata(file_path).map_err(|e| SourceError::new(file_path, e))?;

    Ok(SourceInfo {
        file_name: file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        path: file_path.to_string_lossy().to_string(),
        file_size: metadata.len(),
    })
}

/// Open a file and iterate over its lines.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the line.
pub fn read_lines(file_path: &Path) -> Result<impl Iterator<Item = io::Result<String>>, SourceError> {
    let file = File::open(file_path).map_err(|e| SourceError::new(file_path, e))?;
    let reader = BufReader::new(file);

    Ok(reader.split(b'\n').map(|line| {
        line.map(|bytes| {
            let text = String::from_utf8_lossy(&bytes);
            text.strip_suffix('\r').unwrap_or(&*text).to_string()
        })
    }))
}

/// Extract every magnitude from a file.
///
/// # Arguments
///
/// * `file_path` - Path to the log file
/// * `extractor` - Extractor applied to each line
///
/// # Returns
///
/// The magnitudes in line order and the extraction counters
pub fn read_magnitudes(
    file_path: &Path,
    extractor: &Extractor,
) -> Result<(Vec<Magnitude>, ExtractionSummary), SourceError> {
    info!("Reading sizes from {}", file_path.display());

    let mut summary = ExtractionSummary::default();
    let mut magnitudes = Vec::new();

    for line in read_lines(file_path)? {
        let line = line.map_err(|e| SourceError::new(file_path, e))?;
        if let Some(magnitude) = extractor.consume_line(&line, &mut summary) {
            magnitudes.push(magnitude);
        }
    }

    debug!(
        "{}: {} lines, {} magnitudes, {} skipped",
        file_path.display(),
        summary.lines_read,
        summary.magnitudes,
        summary.skipped()
    );

    Ok((magnitudes, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_source_error() {
        let err = read_magnitudes(Path::new("/nonexistent/pacman.log"), &Extractor::default())
            .unwrap_err();
        assert_eq!(err.path, PathBuf::from("/nonexistent/pacman.log"));
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_lines_handles_crlf_and_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"first 1 KiB\r\nsecond \xff 2 MiB\n").unwrap();

        let lines: Vec<String> = read_lines(file.path())
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "first 1 KiB");
        assert!(lines[1].ends_with("2 MiB"));

        let (magnitudes, summary) = read_magnitudes(file.path(), &Extractor::default()).unwrap();
        assert_eq!(magnitudes.len(), 2);
        assert_eq!(summary.lines_read, 2);
    }

    #[test]
    fn test_source_info() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"12345").unwrap();
        let info = get_source_info(file.path()).unwrap();
        assert_eq!(info.file_size, 5);
        assert!(!info.file_name.is_empty());
    }
}
