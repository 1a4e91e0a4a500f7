//! Health and metric classification of decoded records.
//!
//! Both classifiers are pure: the same record always yields the same answer.

use soakwatch_types::{EventRecord, HealthIssue, MetricCategory, TelemetryRecord};

/// Event-name marker used by health-check components.
pub const HEALTH_CHECK_MARKER: &str = "HLTH_";

/// Channel-name fragments that identify buffer-manager telemetry.
const BUFFER_MARKERS: &[&str] = &["BufferManager", "bufferManager"];

/// Channel-name fragment that identifies system-resource telemetry.
const RESOURCE_MARKER: &str = "systemResources";

/// Classify an event as a health issue.
///
/// Warnings, fatals and health-check events are issues; everything else is
/// routine activity.
pub fn classify_event(record: &EventRecord) -> Option<HealthIssue> {
    let is_issue = record.severity.is_fatal()
        || record.severity.is_warning()
        || record.name.contains(HEALTH_CHECK_MARKER);

    is_issue.then(|| HealthIssue::from(record))
}

/// Classify a telemetry channel. Buffer markers win over resource markers.
pub fn classify_telemetry(record: &TelemetryRecord) -> MetricCategory {
    classify_channel(&record.channel)
}

/// Classify a channel by name alone.
pub fn classify_channel(channel: &str) -> MetricCategory {
    if BUFFER_MARKERS.iter().any(|m| channel.contains(m)) {
        MetricCategory::Buffer
    } else if channel.contains(RESOURCE_MARKER) {
        MetricCategory::Resource
    } else {
        MetricCategory::Ignored
    }
}

/// Alert line for an issue, if its severity warrants one.
pub fn issue_alert(issue: &HealthIssue) -> Option<String> {
    let level = if issue.severity.is_fatal() {
        "FATAL"
    } else if issue.severity.is_warning() {
        "WARNING"
    } else {
        return None;
    };
    Some(format!(
        "{}: {} - {}",
        level, issue.event_name, issue.description
    ))
}
