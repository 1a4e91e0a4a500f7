//! # soakwatch
//!
//! An incremental trend monitor for flight-software soak tests.
//!
//! A soak test runs the flight software for days. Faults that build up
//! slowly (buffer exhaustion, memory growth, recurring warnings) are not
//! visible in any single log excerpt. `soakwatch` is run once per soak
//! cycle over the decoded downlink logs: it counts each record at most once
//! across runs, classifies health issues, keeps the latest value of every
//! buffer-manager and system-resource channel, and compares those values
//! against the previous runs to flag sustained growth.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           SoakMonitor                            │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐    ┌─────────────┐ │
//! │  │ source  │───▶│   data   │───▶│  report  │───▶│  console /  │ │
//! │  │ (input) │    │(per run) │    │          │    │  JSON file  │ │
//! │  └─────────┘    └────┬─────┘    └──────────┘    └─────────────┘ │
//! │                      │                                           │
//! │                      ▼                                           │
//! │                 ┌─────────┐                                      │
//! │                 │  store  │◀── MonitorState (watermarks, history)│
//! │                 └─────────┘                                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Record source abstraction ([`RecordSource`]) with
//!   implementations for decoded log files and in-memory records
//! - **[`data`]**: Classification, watermarks, the per-run aggregator and
//!   trend detection
//! - **[`store`]**: Atomic load/save of [`MonitorState`]
//! - **[`report`]**: Console summary and JSON run report
//! - **[`config`]**: Layered settings (file, environment, flags)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # One soak cycle: process the logs, update state, exit 1 on alerts
//! soakwatch --logs /var/soak/logs --state-file soak_state.json
//!
//! # Also keep a JSON report of this run
//! soakwatch -l run1.log -l run2.log --report-file last_run.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use chrono::Utc;
//! use soakwatch::{MemorySource, MonitorConfig, RecordSource, SoakMonitor};
//! use soakwatch_types::{EventRecord, MonitorState, Severity};
//!
//! let mut monitor = SoakMonitor::with_state(MonitorConfig::default(), MonitorState::new());
//! let mut sources: Vec<Box<dyn RecordSource>> = vec![Box::new(MemorySource::new(
//!     "pipeline",
//!     vec![EventRecord::new(1_700_000_000, "FatalHandler", Severity::Fatal).into()],
//! ))];
//!
//! let run = monitor.run(&mut sources, Utc::now()).unwrap();
//! assert!(run.summary.has_fatal());
//! ```
//!
//! [`MonitorState`]: soakwatch_types::MonitorState

pub mod config;
pub mod data;
pub mod error;
pub mod monitor;
pub mod report;
pub mod source;
pub mod store;

// Re-export main types for convenience
pub use config::MonitorConfig;
pub use data::{RunAggregator, RunData, TrendRule, WatermarkPolicy, Watermarks};
pub use error::{MonitorError, Result};
pub use monitor::{MonitorExit, SoakMonitor};
pub use report::RunReport;
pub use source::{discover_logs, LogFileSource, MemorySource, RecordSource};
pub use store::StateStore;
