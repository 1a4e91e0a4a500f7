//! One monitor run, end to end.

use chrono::{DateTime, SecondsFormat, Utc};
use soakwatch_types::{LogRecord, MonitorState, RunSummary};
use tracing::info;

use crate::config::MonitorConfig;
use crate::data::{detect_trend, RunAggregator, RunData, Watermarks, BUFFER_LABEL, RESOURCE_LABEL};
use crate::error::Result;
use crate::source::RecordSource;
use crate::store::StateStore;

/// Process exit status reported to the soak-cycle orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    /// No alerts and no fatal issues.
    Clean,
    /// Alerts were raised or a fatal issue occurred.
    Alerts,
    /// The monitor could not start or could not read its inputs.
    Error,
}

impl MonitorExit {
    /// Status for a finished run.
    ///
    /// Only alerts and fatal issues fail a run. Whether the state was saved
    /// is reported separately and does not change the status.
    pub fn for_run(summary: &RunSummary) -> Self {
        if summary.is_failure() {
            MonitorExit::Alerts
        } else {
            MonitorExit::Clean
        }
    }

    pub fn code(self) -> u8 {
        match self {
            MonitorExit::Clean => 0,
            MonitorExit::Alerts => 1,
            MonitorExit::Error => 2,
        }
    }
}

/// The soak-test monitor: persisted state plus the settings to run with.
#[derive(Debug)]
pub struct SoakMonitor {
    config: MonitorConfig,
    store: StateStore,
    state: MonitorState,
}

impl SoakMonitor {
    /// Load state from the configured state file.
    pub fn open(config: MonitorConfig) -> Result<Self> {
        let store = StateStore::new(&config.state_file);
        let state = store.load()?;
        Ok(Self {
            config,
            store,
            state,
        })
    }

    /// Create a monitor over an already-loaded state.
    pub fn with_state(config: MonitorConfig, state: MonitorState) -> Self {
        let store = StateStore::new(&config.state_file);
        Self {
            config,
            store,
            state,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Classify, aggregate and trend-check one run's records, then fold the
    /// result into the in-memory state. Nothing is written to disk.
    pub fn process(&mut self, records: &[LogRecord], now: DateTime<Utc>) -> RunData {
        let timestamp_of_run = now.to_rfc3339_opts(SecondsFormat::Secs, false);
        let mut watermarks = Watermarks::from_state(&self.state);
        let mut aggregator = RunAggregator::new(timestamp_of_run);

        aggregator.ingest_all(records, &mut watermarks);

        let rule = &self.config.trend;
        let buffer_alerts = detect_trend(
            &self.state.buffer_history,
            aggregator.buffer_latest(),
            BUFFER_LABEL,
            rule,
        );
        let resource_alerts = detect_trend(
            &self.state.resource_history,
            aggregator.resource_latest(),
            RESOURCE_LABEL,
            rule,
        );
        aggregator.record_alerts(buffer_alerts);
        aggregator.record_alerts(resource_alerts);

        let data = aggregator.finish();
        let now_secs = u64::try_from(now.timestamp()).unwrap_or(0);
        let next_marks = watermarks.advanced(self.config.watermark_policy, now_secs);
        self.state.merge_run(&data.summary, &next_marks);

        info!(
            accepted = data.stats.accepted(),
            stale = data.stats.stale,
            issues = data.summary.health_issues.len(),
            alerts = data.summary.alerts.len(),
            "Run processed"
        );
        data
    }

    /// Read every source and process the records as one run.
    pub fn run(
        &mut self,
        sources: &mut [Box<dyn RecordSource>],
        now: DateTime<Utc>,
    ) -> Result<RunData> {
        let records = read_all(sources)?;
        Ok(self.process(&records, now))
    }

    /// Persist the current state.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.state)
    }
}

/// Read all sources to completion, in order.
pub fn read_all(sources: &mut [Box<dyn RecordSource>]) -> Result<Vec<LogRecord>> {
    let mut records = Vec::new();
    for source in sources.iter_mut() {
        let batch = source.read_records()?;
        info!(
            source = source.description(),
            records = batch.len(),
            malformed = source.malformed(),
            "Read source"
        );
        records.extend(batch);
    }
    Ok(records)
}
