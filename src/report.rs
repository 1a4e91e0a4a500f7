//! Run reports: the operator console summary and the optional JSON report.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use soakwatch_types::{HealthIssue, MetricSnapshot};

use crate::data::{IngestStats, RunData, SampleSeries};
use crate::error::Result;
use crate::store::write_json_atomic;

/// Width of the console rule lines.
const RULE_WIDTH: usize = 50;

/// JSON document describing one run.
///
/// Includes every accepted sample, not just the latest values that go into
/// the persisted history.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub timestamp: &'a str,
    pub health_issues: &'a [HealthIssue],
    pub buffer_stats: &'a SampleSeries,
    pub system_resources: &'a SampleSeries,
    pub buffer_latest: &'a MetricSnapshot,
    pub resource_latest: &'a MetricSnapshot,
    pub alerts: &'a [String],
    pub stats: &'a IngestStats,
}

impl<'a> RunReport<'a> {
    pub fn new(data: &'a RunData) -> Self {
        Self {
            timestamp: &data.summary.timestamp_of_run,
            health_issues: &data.summary.health_issues,
            buffer_stats: &data.buffer_stats,
            system_resources: &data.system_resources,
            buffer_latest: &data.summary.buffer_latest,
            resource_latest: &data.summary.resource_latest,
            alerts: &data.summary.alerts,
            stats: &data.stats,
        }
    }

    /// Write the report as pretty JSON, replacing any previous report.
    pub fn write(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self, "run report")
    }
}

/// A horizontal rule for console output.
pub fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

/// Human-readable results block for operators.
pub fn console_summary(data: &RunData) -> String {
    let summary = &data.summary;
    let mut out = String::new();

    let _ = writeln!(out, "MONITORING RESULTS:");
    let _ = writeln!(out, "{}", rule('-'));
    let _ = writeln!(out, "Health Issues Found: {}", summary.health_issues.len());
    let _ = writeln!(out, "Buffer Metrics Tracked: {}", data.buffer_stats.len());
    let _ = writeln!(out, "System Resources Tracked: {}", data.system_resources.len());
    let _ = writeln!(out, "Alerts Generated: {}", summary.alerts.len());

    if data.stats.stale > 0 || data.stats.malformed > 0 {
        let _ = writeln!(
            out,
            "Records Skipped: {} already processed, {} malformed values",
            data.stats.stale, data.stats.malformed
        );
    }

    if !summary.alerts.is_empty() {
        let _ = writeln!(out, "\nALERTS:");
        for alert in &summary.alerts {
            let _ = writeln!(out, "  ⚠️  {}", alert);
        }
    }

    if !summary.health_issues.is_empty() {
        let _ = writeln!(out, "\nHEALTH ISSUES:");
        for issue in &summary.health_issues {
            let _ = writeln!(out, "  🔥 {}: {}", issue.severity, issue.event_name);
        }
    }

    out
}
