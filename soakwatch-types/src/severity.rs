//! Event severity levels as reported by the flight software.

use alloc::string::{String, ToString};
use core::fmt;

/// Severity of a decoded event record.
///
/// Decoders report severities as labels such as `WARNING_HI` or
/// `EventSeverity.FATAL`; [`Severity::parse`] accepts both forms. Labels
/// that match no known level are preserved verbatim in [`Severity::Other`]
/// so nothing is lost when state is written back out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", from = "String")
)]
pub enum Severity {
    Fatal,
    WarningHi,
    WarningLo,
    Command,
    ActivityHi,
    ActivityLo,
    Diagnostic,
    Other(String),
}

impl Severity {
    /// Parse a decoder severity label.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        let bare = trimmed
            .rsplit_once('.')
            .map_or(trimmed, |(_, level)| level);

        match bare.to_ascii_uppercase().as_str() {
            "FATAL" => Severity::Fatal,
            "WARNING_HI" => Severity::WarningHi,
            "WARNING_LO" => Severity::WarningLo,
            "COMMAND" => Severity::Command,
            "ACTIVITY_HI" => Severity::ActivityHi,
            "ACTIVITY_LO" => Severity::ActivityLo,
            "DIAGNOSTIC" => Severity::Diagnostic,
            _ => Severity::Other(trimmed.to_string()),
        }
    }

    /// Canonical label for this severity.
    pub fn label(&self) -> &str {
        match self {
            Severity::Fatal => "FATAL",
            Severity::WarningHi => "WARNING_HI",
            Severity::WarningLo => "WARNING_LO",
            Severity::Command => "COMMAND",
            Severity::ActivityHi => "ACTIVITY_HI",
            Severity::ActivityLo => "ACTIVITY_LO",
            Severity::Diagnostic => "DIAGNOSTIC",
            Severity::Other(label) => label,
        }
    }

    /// True when the label names a fatal condition.
    ///
    /// Unknown labels count as fatal if they contain `FATAL`.
    pub fn is_fatal(&self) -> bool {
        match self {
            Severity::Fatal => true,
            Severity::Other(label) => label.contains("FATAL"),
            _ => false,
        }
    }

    /// True when the label names a warning (either level).
    pub fn is_warning(&self) -> bool {
        match self {
            Severity::WarningHi | Severity::WarningLo => true,
            Severity::Other(label) => label.contains("WARNING"),
            _ => false,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        Severity::parse(&label)
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}
