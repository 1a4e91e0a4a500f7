//! Per-stream watermarks for incremental log processing.
//!
//! A log file may be fed to the monitor many times as it grows. Each stream
//! carries a watermark loaded at the start of a run; only records strictly
//! newer than it are counted. Watermarks stay fixed for the whole run and
//! are advanced once, after the run, according to a [`WatermarkPolicy`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use soakwatch_types::{MonitorState, StreamKey};

/// How watermarks advance at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPolicy {
    /// Advance both streams to the wall-clock time of the run.
    ///
    /// Records stamped behind the clock that arrive after the run are
    /// never counted.
    #[default]
    WallClock,
    /// Advance each stream to the newest timestamp it accepted this run.
    MaxObserved,
}

/// Watermarks in effect for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watermarks {
    start: BTreeMap<StreamKey, u64>,
    observed: BTreeMap<StreamKey, u64>,
}

impl Watermarks {
    /// Start-of-run watermarks taken from persisted state.
    pub fn from_state(state: &MonitorState) -> Self {
        Self::new(state.watermarks.clone())
    }

    pub fn new(start: BTreeMap<StreamKey, u64>) -> Self {
        Self {
            start,
            observed: BTreeMap::new(),
        }
    }

    /// Watermark loaded for a stream (0 if none).
    pub fn get(&self, stream: StreamKey) -> u64 {
        self.start.get(&stream).copied().unwrap_or(0)
    }

    /// Check whether a record with this timestamp is new for its stream.
    ///
    /// Does not move the watermark.
    pub fn accept(&self, stream: StreamKey, timestamp: u64) -> bool {
        timestamp > self.get(stream)
    }

    /// Note a timestamp that was accepted and counted.
    pub fn observe(&mut self, stream: StreamKey, timestamp: u64) {
        let entry = self.observed.entry(stream).or_insert(timestamp);
        *entry = (*entry).max(timestamp);
    }

    /// Newest timestamp accepted on a stream this run.
    pub fn max_observed(&self, stream: StreamKey) -> Option<u64> {
        self.observed.get(&stream).copied()
    }

    /// Watermarks to persist after the run.
    ///
    /// Never lower than the start-of-run values.
    pub fn advanced(&self, policy: WatermarkPolicy, now: u64) -> BTreeMap<StreamKey, u64> {
        StreamKey::ALL
            .iter()
            .map(|&stream| {
                let start = self.get(stream);
                let next = match policy {
                    WatermarkPolicy::WallClock => now,
                    WatermarkPolicy::MaxObserved => self.max_observed(stream).unwrap_or(start),
                };
                (stream, start.max(next))
            })
            .collect()
    }
}
