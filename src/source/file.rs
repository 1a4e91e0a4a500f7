//! File-based record source.
//!
//! Reads a decoded downlink log from disk, one record per line.

use std::fs;
use std::path::{Path, PathBuf};

use soakwatch_types::LogRecord;
use tracing::{debug, warn};

use super::decode::{decode_line, DecodedLine};
use super::RecordSource;
use crate::error::{MonitorError, Result};

/// A record source backed by one decoded log file.
///
/// The whole file is read on each call to [`RecordSource::read_records`];
/// incremental processing is handled by watermarks, not by file offsets.
#[derive(Debug)]
pub struct LogFileSource {
    path: PathBuf,
    description: String,
    malformed: usize,
}

impl LogFileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            malformed: 0,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode every line of a log held in memory.
    pub fn decode_text(&mut self, text: &str) -> Vec<LogRecord> {
        self.malformed = 0;
        let mut records = Vec::new();

        for (index, line) in text.lines().enumerate() {
            match decode_line(line) {
                DecodedLine::Record(record) => records.push(record),
                DecodedLine::Empty => {}
                DecodedLine::Malformed(reason) => {
                    self.malformed += 1;
                    debug!(
                        file = %self.path.display(),
                        line = index + 1,
                        reason,
                        "Skipping malformed log line"
                    );
                }
            }
        }

        records
    }
}

impl RecordSource for LogFileSource {
    fn read_records(&mut self) -> Result<Vec<LogRecord>> {
        let bytes = fs::read(&self.path).map_err(|e| MonitorError::io(&self.path, e))?;
        // Downlink captures can carry stray bytes; decode what is readable.
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.decode_text(&text))
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn malformed(&self) -> usize {
        self.malformed
    }
}

/// Resolve log paths into file sources.
///
/// A file path is always used. A directory contributes its files with the
/// given extension, sorted by name. Fails before anything is read if a path
/// does not exist.
pub fn discover_logs(paths: &[PathBuf], extension: &str) -> Result<Vec<LogFileSource>> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_file() {
            sources.push(LogFileSource::new(path));
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(path)
                .map_err(|e| MonitorError::io(path, e))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == extension))
                .collect();
            found.sort();

            if found.is_empty() {
                warn!(dir = %path.display(), extension, "No log files found in directory");
            }
            sources.extend(found.into_iter().map(LogFileSource::new));
        } else {
            return Err(MonitorError::MissingInput(path.clone()));
        }
    }

    Ok(sources)
}
