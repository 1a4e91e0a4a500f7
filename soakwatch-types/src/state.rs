//! Per-run summaries and the durable multi-run monitor state.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{Bounded, HealthIssue, MetricSnapshot, SchemaVersion, StreamKey};

/// Number of run summaries retained per metric category.
pub const METRIC_HISTORY_LEN: usize = 10;

/// Number of health issues retained across runs.
pub const HEALTH_HISTORY_LEN: usize = 100;

/// Latest-value maps of prior runs, oldest first.
pub type MetricHistory = Bounded<MetricSnapshot, METRIC_HISTORY_LEN>;

/// Health issues of prior runs, oldest first.
pub type HealthHistory = Bounded<HealthIssue, HEALTH_HISTORY_LEN>;

/// Everything one monitor run found.
///
/// Built once at the end of a run and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// ISO-8601 start time of the run.
    pub timestamp_of_run: String,
    pub health_issues: Vec<HealthIssue>,
    pub buffer_latest: MetricSnapshot,
    pub resource_latest: MetricSnapshot,
    pub alerts: Vec<String>,
}

impl RunSummary {
    /// True if any health issue this run was fatal.
    pub fn has_fatal(&self) -> bool {
        self.health_issues.iter().any(|issue| issue.severity.is_fatal())
    }

    /// True if the run should be reported as a failure.
    pub fn is_failure(&self) -> bool {
        !self.alerts.is_empty() || self.has_fatal()
    }
}

/// Monitor state persisted between runs.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorState {
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: SchemaVersion,

    /// ISO-8601 start time of the last completed run.
    pub last_run_timestamp: Option<String>,

    /// Per-stream timestamp at or below which records were already counted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub watermarks: BTreeMap<StreamKey, u64>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub buffer_history: MetricHistory,

    #[cfg_attr(feature = "serde", serde(default))]
    pub resource_history: MetricHistory,

    #[cfg_attr(feature = "serde", serde(default))]
    pub health_history: HealthHistory,
}

impl MonitorState {
    /// A first-run state: no watermarks, empty histories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Watermark for a stream; streams never processed read as 0.
    pub fn watermark(&self, stream: StreamKey) -> u64 {
        self.watermarks.get(&stream).copied().unwrap_or(0)
    }

    /// Fold a finished run into the state.
    ///
    /// Watermarks only move forward. Metric histories gain one entry per
    /// category the run actually observed, so a run without samples does
    /// not break trend continuity.
    pub fn merge_run(&mut self, summary: &RunSummary, watermarks: &BTreeMap<StreamKey, u64>) {
        for (&stream, &mark) in watermarks {
            let entry = self.watermarks.entry(stream).or_insert(0);
            *entry = (*entry).max(mark);
        }

        if !summary.buffer_latest.is_empty() {
            self.buffer_history.push(summary.buffer_latest.clone());
        }
        if !summary.resource_latest.is_empty() {
            self.resource_history.push(summary.resource_latest.clone());
        }
        self.health_history.extend(summary.health_issues.iter().cloned());

        self.last_run_timestamp = Some(summary.timestamp_of_run.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use alloc::string::ToString;

    fn issue(ts: u64, severity: Severity) -> HealthIssue {
        HealthIssue {
            timestamp: ts,
            event_name: "Ev".to_string(),
            severity,
            description: String::new(),
        }
    }

    fn summary_with(buffer: f64, resource: f64, issues: usize) -> RunSummary {
        let mut s = RunSummary {
            timestamp_of_run: "2026-01-01T00:00:00+00:00".to_string(),
            ..Default::default()
        };
        s.buffer_latest.insert("buf".to_string(), buffer);
        s.resource_latest.insert("mem".to_string(), resource);
        s.health_issues = (0..issues)
            .map(|i| issue(i as u64 + 1, Severity::WarningHi))
            .collect();
        s
    }

    fn marks(ts: u64) -> BTreeMap<StreamKey, u64> {
        StreamKey::ALL.iter().map(|&k| (k, ts)).collect()
    }

    #[test]
    fn test_new_state_has_no_watermarks() {
        let state = MonitorState::new();
        assert_eq!(state.watermark(StreamKey::Events), 0);
        assert_eq!(state.watermark(StreamKey::Telemetry), 0);
        assert!(state.last_run_timestamp.is_none());
        assert!(state.version.is_compatible());
    }

    #[test]
    fn test_merge_run_appends_and_sets_last_run() {
        let mut state = MonitorState::new();
        state.merge_run(&summary_with(1.0, 2.0, 2), &marks(100));

        assert_eq!(state.buffer_history.len(), 1);
        assert_eq!(state.resource_history.len(), 1);
        assert_eq!(state.health_history.len(), 2);
        assert_eq!(state.watermark(StreamKey::Events), 100);
        assert_eq!(
            state.last_run_timestamp.as_deref(),
            Some("2026-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_fifteen_runs_keep_ten_summaries() {
        let mut state = MonitorState::new();
        for run in 0..15 {
            state.merge_run(&summary_with(run as f64, run as f64, 9), &marks(run + 1));
        }

        assert_eq!(state.buffer_history.len(), 10);
        assert_eq!(state.resource_history.len(), 10);
        assert_eq!(state.health_history.len(), HEALTH_HISTORY_LEN);
        assert_eq!(state.buffer_history.get(0).unwrap()["buf"], 5.0);
    }

    #[test]
    fn test_watermarks_never_move_backwards() {
        let mut state = MonitorState::new();
        state.merge_run(&summary_with(1.0, 1.0, 0), &marks(500));
        state.merge_run(&summary_with(1.0, 1.0, 0), &marks(400));
        assert_eq!(state.watermark(StreamKey::Telemetry), 500);
    }

    #[test]
    fn test_empty_categories_are_not_recorded() {
        let mut state = MonitorState::new();
        let summary = RunSummary {
            timestamp_of_run: "t".to_string(),
            ..Default::default()
        };
        state.merge_run(&summary, &marks(1));
        assert!(state.buffer_history.is_empty());
        assert!(state.resource_history.is_empty());
    }

    #[test]
    fn test_summary_failure_rules() {
        let mut s = RunSummary::default();
        assert!(!s.is_failure());

        s.health_issues.push(issue(1, Severity::ActivityHi));
        assert!(!s.is_failure());

        s.health_issues.push(issue(2, Severity::Fatal));
        assert!(s.has_fatal());
        assert!(s.is_failure());

        let mut only_alerts = RunSummary::default();
        only_alerts.alerts.push("x".to_string());
        assert!(only_alerts.is_failure());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_state_serde_roundtrip() {
        let mut state = MonitorState::new();
        state.merge_run(&summary_with(3.0, 4.5, 1), &marks(77));

        let json = serde_json::to_string_pretty(&state).unwrap();
        let parsed: MonitorState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
        assert_eq!(serde_json::to_string_pretty(&parsed).unwrap(), json);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_minimal_state_document_loads() {
        let parsed: MonitorState = serde_json::from_str(r#"{"last_run_timestamp": null}"#).unwrap();
        assert_eq!(parsed, MonitorState::new());
    }
}
