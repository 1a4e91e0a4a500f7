//! Record source abstraction for reading decoded downlink logs.
//!
//! This module provides a trait-based abstraction over where records come
//! from (decoded log files on disk, or records handed over in memory).

pub mod decode;
mod file;
mod memory;

pub use decode::{decode_line, parse_raw_time, DecodedLine};
pub use file::{discover_logs, LogFileSource};
pub use memory::MemorySource;

use std::fmt::Debug;

use soakwatch_types::LogRecord;

use crate::error::Result;

/// Trait for reading decoded records from various sources.
///
/// # Example
///
/// ```no_run
/// use soakwatch::{LogFileSource, RecordSource};
///
/// let mut source = LogFileSource::new("soak.log");
/// let records = source.read_records()?;
/// println!("Got {} records from {}", records.len(), source.description());
/// # Ok::<(), soakwatch::MonitorError>(())
/// ```
pub trait RecordSource: Debug {
    /// Read every record the source currently holds, in arrival order.
    ///
    /// Lines that cannot be decoded are skipped, not reported as errors.
    fn read_records(&mut self) -> Result<Vec<LogRecord>>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Number of lines skipped as malformed during the last read.
    fn malformed(&self) -> usize;
}
