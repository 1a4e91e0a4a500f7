//! In-memory record source.
//!
//! Hands out records already decoded by an embedding application, such as
//! a ground-station pipeline that decodes the downlink itself.

use soakwatch_types::LogRecord;

use super::RecordSource;
use crate::error::Result;

/// A record source over records supplied by the caller.
///
/// # Example
///
/// ```
/// use soakwatch::{MemorySource, RecordSource};
/// use soakwatch_types::TelemetryRecord;
///
/// let mut source = MemorySource::new("pipeline", vec![
///     TelemetryRecord::new(1_700_000_000, "Svc.BufferManager.CurrBuffs", "3").into(),
/// ]);
/// assert_eq!(source.read_records().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    records: Vec<LogRecord>,
    description: String,
}

impl MemorySource {
    pub fn new(source_description: &str, records: Vec<LogRecord>) -> Self {
        Self {
            records,
            description: format!("memory: {}", source_description),
        }
    }

    /// Queue more records for the next read.
    pub fn push(&mut self, record: impl Into<LogRecord>) {
        self.records.push(record.into());
    }
}

impl RecordSource for MemorySource {
    fn read_records(&mut self) -> Result<Vec<LogRecord>> {
        Ok(self.records.clone())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn malformed(&self) -> usize {
        // Records arrive already decoded.
        0
    }
}
