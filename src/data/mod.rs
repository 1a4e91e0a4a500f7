//! Record processing for a single monitor run.
//!
//! This module turns decoded downlink records into a [`RunSummary`] and
//! checks that summary against the history of earlier runs.
//!
//! ## Submodules
//!
//! - [`classify`]: Health-issue and metric-category classification
//! - [`value`]: Parsing of unit-suffixed telemetry values
//! - [`watermark`]: Per-stream watermarks and how they advance
//! - [`aggregate`]: The per-run accumulator ([`RunAggregator`])
//! - [`trend`]: Multi-run trend detection
//!
//! ## Data Flow
//!
//! ```text
//! LogRecord
//!     │
//!     ▼
//! Watermarks::accept()  ──▶ stale records dropped
//!     │
//!     ▼
//! classify_event() / classify_telemetry()
//!     │
//!     ▼
//! RunAggregator (issues, alerts, samples, latest values)
//!     │
//!     ├──▶ detect_trend() against MonitorState history
//!     │
//!     └──▶ RunSummary
//! ```
//!
//! [`RunSummary`]: soakwatch_types::RunSummary

pub mod aggregate;
pub mod classify;
pub mod trend;
pub mod value;
pub mod watermark;

pub use aggregate::{IngestStats, Ingested, RunAggregator, RunData, SampleSeries};
pub use classify::{classify_channel, classify_event, classify_telemetry};
pub use trend::{detect_trend, TrendRule, BUFFER_LABEL, RESOURCE_LABEL};
pub use value::parse_metric_value;
pub use watermark::{WatermarkPolicy, Watermarks};
