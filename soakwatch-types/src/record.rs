//! Decoded downlink records and the values derived from them.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::Severity;

/// A decoded event record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventRecord {
    /// Seconds since the Unix epoch, as stamped by the flight software.
    pub timestamp: u64,
    pub name: String,
    pub severity: Severity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl EventRecord {
    /// Create an event record with an empty description.
    pub fn new(timestamp: u64, name: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp,
            name: name.into(),
            severity,
            description: String::new(),
        }
    }

    /// Set the description text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A decoded telemetry channel reading.
///
/// The value is kept as the decoder rendered it (it may carry units or
/// formatting); turning it into a number is the classifier's job.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryRecord {
    pub timestamp: u64,
    pub channel: String,
    pub value: String,
}

impl TelemetryRecord {
    pub fn new(timestamp: u64, channel: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            timestamp,
            channel: channel.into(),
            value: value.into(),
        }
    }
}

/// The two record streams a downlink log carries.
///
/// Each stream has its own watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum StreamKey {
    Events,
    Telemetry,
}

impl StreamKey {
    /// All streams, in a fixed order.
    pub const ALL: [StreamKey; 2] = [StreamKey::Events, StreamKey::Telemetry];

    /// Key used for this stream in state files and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKey::Events => "events",
            StreamKey::Telemetry => "telemetry",
        }
    }
}

impl core::fmt::Display for StreamKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record from either stream.
#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    Event(EventRecord),
    Telemetry(TelemetryRecord),
}

impl LogRecord {
    /// The stream this record belongs to.
    pub fn stream(&self) -> StreamKey {
        match self {
            LogRecord::Event(_) => StreamKey::Events,
            LogRecord::Telemetry(_) => StreamKey::Telemetry,
        }
    }

    /// Timestamp in seconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        match self {
            LogRecord::Event(e) => e.timestamp,
            LogRecord::Telemetry(t) => t.timestamp,
        }
    }
}

impl From<EventRecord> for LogRecord {
    fn from(record: EventRecord) -> Self {
        LogRecord::Event(record)
    }
}

impl From<TelemetryRecord> for LogRecord {
    fn from(record: TelemetryRecord) -> Self {
        LogRecord::Telemetry(record)
    }
}

/// A health-relevant event: any warning, any fatal, or a health-check event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthIssue {
    pub timestamp: u64,
    pub event_name: String,
    pub severity: Severity,
    pub description: String,
}

impl From<&EventRecord> for HealthIssue {
    fn from(record: &EventRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            event_name: record.name.clone(),
            severity: record.severity.clone(),
            description: record.description.clone(),
        }
    }
}

/// Which kind of metric a telemetry channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    /// Buffer-manager counters (integral counts).
    Buffer,
    /// System resource gauges (memory in KB, CPU in percent).
    Resource,
    /// Anything the monitor does not track.
    Ignored,
}

/// One parsed reading of a tracked channel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricSample {
    pub timestamp: u64,
    pub value: f64,
}

/// Latest value per channel for one run.
///
/// Ordered so that serialized state is stable across runs.
pub type MetricSnapshot = BTreeMap<String, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_record_reports_stream_and_timestamp() {
        let event: LogRecord = EventRecord::new(10, "Ev", Severity::Command).into();
        let tlm: LogRecord = TelemetryRecord::new(20, "Ch", "1").into();

        assert_eq!(event.stream(), StreamKey::Events);
        assert_eq!(event.timestamp(), 10);
        assert_eq!(tlm.stream(), StreamKey::Telemetry);
        assert_eq!(tlm.timestamp(), 20);
    }

    #[test]
    fn test_health_issue_copies_event_fields() {
        let record =
            EventRecord::new(42, "HLTH_PingLate", Severity::WarningHi).with_description("late");
        let issue = HealthIssue::from(&record);

        assert_eq!(issue.timestamp, 42);
        assert_eq!(issue.event_name, "HLTH_PingLate");
        assert_eq!(issue.severity, Severity::WarningHi);
        assert_eq!(issue.description, "late");
    }

    #[test]
    fn test_stream_key_names() {
        assert_eq!(StreamKey::Events.as_str(), "events");
        assert_eq!(StreamKey::Telemetry.as_str(), "telemetry");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_stream_key_serializes_lowercase() {
        let mut map = BTreeMap::new();
        map.insert(StreamKey::Events, 5u64);
        map.insert(StreamKey::Telemetry, 6u64);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"events":5,"telemetry":6}"#);

        let parsed: BTreeMap<StreamKey, u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
    }
}
