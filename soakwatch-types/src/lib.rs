//! # soakwatch-types
//!
//! Core types for soak-test trend monitoring. This crate defines the records
//! a downlink decoder hands to the monitor, the per-run summary the monitor
//! produces, and the durable multi-run state it persists between runs.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to read and write state files
//! - **Bounded retention**: Histories are fixed-capacity rings that evict the oldest entry
//! - **Versioned schema**: State documents carry version info for forward compatibility
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON serialization of records, summaries and state via serde
//!
//! ## Example
//!
//! ```rust
//! use soakwatch_types::{Bounded, EventRecord, Severity};
//!
//! let record = EventRecord::new(1_700_000_000, "HLTH_PingLate", Severity::WarningHi)
//!     .with_description("ping reply late");
//! assert!(record.severity.is_warning());
//!
//! let mut ring: Bounded<u32, 2> = Bounded::new();
//! ring.push(1);
//! ring.push(2);
//! ring.push(3);
//! assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. The version is written into every
//! state file so an older or newer monitor can refuse a layout it does not
//! understand instead of silently dropping history.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bounded;
mod record;
mod severity;
mod state;
mod version;

pub use bounded::*;
pub use record::*;
pub use severity::*;
pub use state::*;
pub use version::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the state file layout.
/// Consumers should check this version and handle older formats appropriately.
pub const SCHEMA_VERSION: u32 = 1;
