//! Per-run accumulation of health issues and metric samples.
//!
//! A [`RunAggregator`] is created fresh for every monitor run and owned by
//! it. Records are fed in arrival order; the aggregator consults the run's
//! [`Watermarks`] to drop anything already counted by an earlier run.

use std::collections::BTreeMap;

use serde::Serialize;
use soakwatch_types::{
    HealthIssue, LogRecord, MetricCategory, MetricSample, MetricSnapshot, RunSummary,
    TelemetryRecord,
};
use tracing::debug;

use super::classify::{classify_event, classify_telemetry, issue_alert};
use super::value::parse_metric_value;
use super::watermark::Watermarks;

/// Ordered samples per channel.
pub type SampleSeries = BTreeMap<String, Vec<MetricSample>>;

/// What happened to one ingested record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// Event recorded as a health issue.
    Issue,
    /// Telemetry recorded as a metric sample.
    Sample,
    /// New record the monitor does not track.
    Ignored,
    /// Tracked channel whose value did not parse.
    Malformed,
    /// At or below the stream watermark.
    Stale,
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub issues: usize,
    pub samples: usize,
    pub ignored: usize,
    pub malformed: usize,
    pub stale: usize,
}

impl IngestStats {
    fn count(&mut self, outcome: Ingested) {
        match outcome {
            Ingested::Issue => self.issues += 1,
            Ingested::Sample => self.samples += 1,
            Ingested::Ignored => self.ignored += 1,
            Ingested::Malformed => self.malformed += 1,
            Ingested::Stale => self.stale += 1,
        }
    }

    /// Records that passed the watermark.
    pub fn accepted(&self) -> usize {
        self.issues + self.samples + self.ignored + self.malformed
    }
}

/// Everything a run accumulated, handed over when the run ends.
#[derive(Debug, Clone)]
pub struct RunData {
    pub summary: RunSummary,
    pub buffer_stats: SampleSeries,
    pub system_resources: SampleSeries,
    pub stats: IngestStats,
}

/// Accumulator for the current run.
#[derive(Debug)]
pub struct RunAggregator {
    timestamp_of_run: String,
    health_issues: Vec<HealthIssue>,
    alerts: Vec<String>,
    buffer_stats: SampleSeries,
    system_resources: SampleSeries,
    buffer_latest: MetricSnapshot,
    resource_latest: MetricSnapshot,
    stats: IngestStats,
}

impl RunAggregator {
    /// Start a run stamped with its ISO-8601 start time.
    pub fn new(timestamp_of_run: impl Into<String>) -> Self {
        Self {
            timestamp_of_run: timestamp_of_run.into(),
            health_issues: Vec::new(),
            alerts: Vec::new(),
            buffer_stats: BTreeMap::new(),
            system_resources: BTreeMap::new(),
            buffer_latest: BTreeMap::new(),
            resource_latest: BTreeMap::new(),
            stats: IngestStats::default(),
        }
    }

    /// Feed one record.
    pub fn ingest(&mut self, record: &LogRecord, watermarks: &mut Watermarks) -> Ingested {
        let stream = record.stream();
        let timestamp = record.timestamp();

        let outcome = if !watermarks.accept(stream, timestamp) {
            Ingested::Stale
        } else {
            watermarks.observe(stream, timestamp);
            match record {
                LogRecord::Event(event) => match classify_event(event) {
                    Some(issue) => {
                        self.push_issue(issue);
                        Ingested::Issue
                    }
                    None => Ingested::Ignored,
                },
                LogRecord::Telemetry(tlm) => self.push_telemetry(tlm),
            }
        };

        self.stats.count(outcome);
        outcome
    }

    /// Feed records in arrival order.
    pub fn ingest_all<'a, I>(&mut self, records: I, watermarks: &mut Watermarks)
    where
        I: IntoIterator<Item = &'a LogRecord>,
    {
        for record in records {
            self.ingest(record, watermarks);
        }
    }

    fn push_issue(&mut self, issue: HealthIssue) {
        if let Some(alert) = issue_alert(&issue) {
            self.alerts.push(alert);
        }
        self.health_issues.push(issue);
    }

    fn push_telemetry(&mut self, record: &TelemetryRecord) -> Ingested {
        let category = classify_telemetry(record);
        let (series, latest) = match category {
            MetricCategory::Buffer => (&mut self.buffer_stats, &mut self.buffer_latest),
            MetricCategory::Resource => (&mut self.system_resources, &mut self.resource_latest),
            MetricCategory::Ignored => return Ingested::Ignored,
        };

        let Some(value) = parse_metric_value(category, &record.value) else {
            debug!(
                channel = %record.channel,
                value = %record.value,
                "Ignoring malformed sample"
            );
            return Ingested::Malformed;
        };

        series
            .entry(record.channel.clone())
            .or_default()
            .push(MetricSample {
                timestamp: record.timestamp,
                value,
            });
        latest.insert(record.channel.clone(), value);
        Ingested::Sample
    }

    /// Append alerts raised outside the record pass (trend alerts).
    pub fn record_alerts<I: IntoIterator<Item = String>>(&mut self, alerts: I) {
        self.alerts.extend(alerts);
    }

    pub fn health_issues(&self) -> &[HealthIssue] {
        &self.health_issues
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Latest buffer value per channel so far.
    pub fn buffer_latest(&self) -> &MetricSnapshot {
        &self.buffer_latest
    }

    /// Latest resource value per channel so far.
    pub fn resource_latest(&self) -> &MetricSnapshot {
        &self.resource_latest
    }

    pub fn buffer_series(&self) -> &SampleSeries {
        &self.buffer_stats
    }

    pub fn resource_series(&self) -> &SampleSeries {
        &self.system_resources
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// End the run.
    pub fn finish(self) -> RunData {
        RunData {
            summary: RunSummary {
                timestamp_of_run: self.timestamp_of_run,
                health_issues: self.health_issues,
                buffer_latest: self.buffer_latest,
                resource_latest: self.resource_latest,
                alerts: self.alerts,
            },
            buffer_stats: self.buffer_stats,
            system_resources: self.system_resources,
            stats: self.stats,
        }
    }
}
