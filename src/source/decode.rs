//! Decoding of textual downlink log lines into records.
//!
//! Each line carries one record. A leading tag names the stream and the
//! remaining comma-separated columns follow the ground-station CSV layout:
//!
//! ```text
//! EVR,<id>,<raw_time>,<component>,<id>,<name>,<severity>[,<description>]
//! TLM,<raw_time>,<component>,<id>,<channel>,<value>
//! ```
//!
//! `raw_time` is `<base>(<context>)-<seconds>:<micros>` or bare seconds.
//! Descriptions and values run to the end of the line and may themselves
//! contain commas (`1,024.5 KB`).

use std::sync::OnceLock;

use regex::Regex;
use soakwatch_types::{EventRecord, LogRecord, Severity, TelemetryRecord};

/// Stream tag for event lines.
pub const EVENT_TAG: &str = "EVR";

/// Stream tag for telemetry lines.
pub const TELEMETRY_TAG: &str = "TLM";

const EVENT_MIN_COLUMNS: usize = 6;
const TELEMETRY_MIN_COLUMNS: usize = 5;

/// Result of decoding one line.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedLine {
    Record(LogRecord),
    /// Blank line or comment.
    Empty,
    /// Unusable line, with the reason.
    Malformed(&'static str),
}

fn raw_time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\d+\(\d+\)-(\d+):\d+").expect("raw time pattern is valid")
    })
}

/// Extract epoch seconds from a raw time column. Zero is not a valid time.
pub fn parse_raw_time(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let seconds = match raw_time_pattern().captures(raw) {
        Some(caps) => caps.get(1)?.as_str().parse().ok()?,
        None => raw.parse().ok()?,
    };
    (seconds > 0).then_some(seconds)
}

/// Decode one log line.
pub fn decode_line(line: &str) -> DecodedLine {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return DecodedLine::Empty;
    }

    let Some((tag, rest)) = line.split_once(',') else {
        return DecodedLine::Malformed("missing stream tag");
    };
    let columns: Vec<&str> = rest.split(',').collect();

    match tag.trim() {
        EVENT_TAG => decode_event(&columns),
        TELEMETRY_TAG => decode_telemetry(&columns),
        _ => DecodedLine::Malformed("unknown stream tag"),
    }
}

fn decode_event(columns: &[&str]) -> DecodedLine {
    if columns.len() < EVENT_MIN_COLUMNS {
        return DecodedLine::Malformed("too few event columns");
    }
    let Some(timestamp) = parse_raw_time(columns[1]) else {
        return DecodedLine::Malformed("bad event time");
    };

    let description = if columns.len() > EVENT_MIN_COLUMNS {
        columns[EVENT_MIN_COLUMNS..].join(",")
    } else {
        String::new()
    };

    let record = EventRecord::new(timestamp, columns[4].trim(), Severity::parse(columns[5]))
        .with_description(description.trim());
    DecodedLine::Record(record.into())
}

fn decode_telemetry(columns: &[&str]) -> DecodedLine {
    if columns.len() < TELEMETRY_MIN_COLUMNS {
        return DecodedLine::Malformed("too few telemetry columns");
    }
    let Some(timestamp) = parse_raw_time(columns[0]) else {
        return DecodedLine::Malformed("bad telemetry time");
    };

    let value = columns[TELEMETRY_MIN_COLUMNS - 1..].join(",");
    let record = TelemetryRecord::new(timestamp, columns[3].trim(), value.trim());
    DecodedLine::Record(record.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_time_formats() {
        assert_eq!(parse_raw_time("2(0)-1700000000:123456"), Some(1_700_000_000));
        assert_eq!(parse_raw_time(" 0(1)-42:0 "), Some(42));
        assert_eq!(parse_raw_time("1700000001"), Some(1_700_000_001));
        assert_eq!(parse_raw_time("0"), None);
        assert_eq!(parse_raw_time("yesterday"), None);
    }

    #[test]
    fn test_decode_event_line() {
        let line = "EVR,1,2(0)-1700000000:5,Svc.Health,0x1,HLTH_PingLate,EventSeverity.WARNING_HI,ping late";
        let DecodedLine::Record(LogRecord::Event(e)) = decode_line(line) else {
            panic!("expected event");
        };
        assert_eq!(e.timestamp, 1_700_000_000);
        assert_eq!(e.name, "HLTH_PingLate");
        assert_eq!(e.severity, Severity::WarningHi);
        assert_eq!(e.description, "ping late");
    }

    #[test]
    fn test_decode_event_description_keeps_commas() {
        let line = "EVR,1,100,c,0,Ev,FATAL,a, b";
        let DecodedLine::Record(LogRecord::Event(e)) = decode_line(line) else {
            panic!("expected event");
        };
        assert_eq!(e.description, "a, b");
    }

    #[test]
    fn test_decode_event_without_description() {
        let DecodedLine::Record(LogRecord::Event(e)) = decode_line("EVR,1,100,c,0,Ev,COMMAND") else {
            panic!("expected event");
        };
        assert_eq!(e.description, "");
        assert_eq!(e.severity, Severity::Command);
    }

    #[test]
    fn test_decode_telemetry_line() {
        let line = "TLM,2(0)-1700000100:0,SoakDeployment,0x20,SoakDeployment.systemResources.MEMORY_USED,2048 KB";
        let DecodedLine::Record(LogRecord::Telemetry(t)) = decode_line(line) else {
            panic!("expected telemetry");
        };
        assert_eq!(t.timestamp, 1_700_000_100);
        assert_eq!(t.channel, "SoakDeployment.systemResources.MEMORY_USED");
        assert_eq!(t.value, "2048 KB");
    }

    #[test]
    fn test_decode_telemetry_value_keeps_thousands_separator() {
        let line = "TLM,2(0)-1700000100:0,SoakDeployment,0x20,SoakDeployment.systemResources.MEMORY_USED,1,024.5 KB";
        let DecodedLine::Record(LogRecord::Telemetry(t)) = decode_line(line) else {
            panic!("expected telemetry");
        };
        assert_eq!(t.value, "1,024.5 KB");
    }

    #[test]
    fn test_decode_skips_blank_and_comments() {
        assert_eq!(decode_line(""), DecodedLine::Empty);
        assert_eq!(decode_line("   "), DecodedLine::Empty);
        assert_eq!(decode_line("# header"), DecodedLine::Empty);
    }

    #[test]
    fn test_decode_malformed_lines() {
        assert!(matches!(decode_line("garbage"), DecodedLine::Malformed(_)));
        assert!(matches!(decode_line("XYZ,1,2,3,4,5,6"), DecodedLine::Malformed(_)));
        assert!(matches!(decode_line("EVR,1,100,c,0"), DecodedLine::Malformed(_)));
        assert!(matches!(decode_line("TLM,100,c,0"), DecodedLine::Malformed(_)));
        assert!(matches!(decode_line("TLM,never,c,0,ch,1"), DecodedLine::Malformed(_)));
    }
}
