//! Numeric parsing of telemetry channel values.
//!
//! Decoders render values with units and formatting ("1,024.5 KB",
//! "37 buffers"). Only the leading token is numeric. Anything that does not
//! parse is ignored rather than reported: partial and unit-suffixed values
//! are normal on a live downlink.

use soakwatch_types::MetricCategory;

/// Parse a channel value for the given category.
///
/// Returns `None` for ignored channels and for malformed values.
pub fn parse_metric_value(category: MetricCategory, text: &str) -> Option<f64> {
    match category {
        MetricCategory::Buffer => parse_count(text).map(|v| v as f64),
        MetricCategory::Resource => parse_gauge(text),
        MetricCategory::Ignored => None,
    }
}

/// Parse a buffer-manager count from its leading token.
///
/// A blank value reads as zero.
pub fn parse_count(text: &str) -> Option<i64> {
    match text.split_whitespace().next() {
        Some(token) => token.parse().ok(),
        None => Some(0),
    }
}

/// Parse a resource gauge from its leading token, ignoring thousands separators.
pub fn parse_gauge(text: &str) -> Option<f64> {
    let token = text.split_whitespace().next()?;
    let value: f64 = token.replace(',', "").parse().ok()?;
    value.is_finite().then_some(value)
}
