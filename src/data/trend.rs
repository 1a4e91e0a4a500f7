//! Multi-run trend detection.
//!
//! A metric trends when its latest value climbed strictly across the last
//! two recorded runs and the current one, and the climb over those three
//! points exceeds a percentage threshold. Any dip resets the trend.

use serde::{Deserialize, Serialize};
use soakwatch_types::{MetricHistory, MetricSnapshot};

/// Alert label for buffer-manager trends.
pub const BUFFER_LABEL: &str = "Buffer allocation";

/// Alert label for system-resource trends.
pub const RESOURCE_LABEL: &str = "System resource";

/// Parameters of the trend rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendRule {
    /// Growth over three points, in percent, that must be exceeded.
    pub threshold_pct: f64,
    /// Prior summaries required before any metric is evaluated.
    pub min_history: usize,
}

impl Default for TrendRule {
    fn default() -> Self {
        Self {
            threshold_pct: 10.0,
            min_history: 3,
        }
    }
}

/// Percentage growth from `v0` to `v2` if `v0 < v1 < v2` and `v0 > 0`.
pub fn monotonic_growth(v0: f64, v1: f64, v2: f64) -> Option<f64> {
    if v2 > v1 && v1 > v0 && v0 > 0.0 {
        Some((v2 - v0) / v0 * 100.0)
    } else {
        None
    }
}

/// Compare the current run's latest values against prior run summaries.
///
/// Metrics missing from either of the two newest history entries are
/// skipped. Returns one alert per trending metric, in metric-name order.
pub fn detect_trend(
    history: &MetricHistory,
    latest: &MetricSnapshot,
    label: &str,
    rule: &TrendRule,
) -> Vec<String> {
    let mut alerts = Vec::new();

    if history.len() < rule.min_history.max(2) {
        return alerts;
    }
    let (Some(prev), Some(prev_prev)) = (history.nth_back(0), history.nth_back(1)) else {
        return alerts;
    };

    for (metric, &v2) in latest {
        let (Some(&v1), Some(&v0)) = (prev.get(metric), prev_prev.get(metric)) else {
            continue;
        };

        if let Some(rate) = monotonic_growth(v0, v1, v2) {
            if rate > rule.threshold_pct {
                alerts.push(format!(
                    "{} trending up: {} increased {:.1}% over last 3 runs",
                    label, metric, rate
                ));
            }
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(pairs: &[(&str, f64)]) -> MetricSnapshot {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn history(values: &[f64]) -> MetricHistory {
        values.iter().map(|&v| snap(&[("m", v)])).collect()
    }

    #[test]
    fn test_sustained_climb_fires_once() {
        let h = history(&[100.0, 100.0, 105.0, 112.0]);
        let alerts = detect_trend(&h, &snap(&[("m", 125.0)]), "Test", &TrendRule::default());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0], "Test trending up: m increased 19.0% over last 3 runs");
    }

    #[test]
    fn test_dip_then_rise_does_not_fire() {
        let h = history(&[100.0, 110.0, 105.0]);
        let alerts = detect_trend(&h, &snap(&[("m", 120.0)]), "Test", &TrendRule::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_short_history_is_not_evaluated() {
        let h = history(&[100.0, 200.0]);
        let alerts = detect_trend(&h, &snap(&[("m", 400.0)]), "Test", &TrendRule::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_growth_at_threshold_does_not_fire() {
        let h = history(&[1.0, 100.0, 105.0]);
        let alerts = detect_trend(&h, &snap(&[("m", 110.0)]), "Test", &TrendRule::default());
        assert!(alerts.is_empty());

        let alerts = detect_trend(&h, &snap(&[("m", 110.5)]), "Test", &TrendRule::default());
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_zero_baseline_is_skipped() {
        let h = history(&[5.0, 0.0, 1.0]);
        assert!(detect_trend(&h, &snap(&[("m", 2.0)]), "Test", &TrendRule::default()).is_empty());
    }

    #[test]
    fn test_metric_missing_from_history_is_skipped() {
        let mut h = history(&[100.0, 110.0]);
        h.push(snap(&[("other", 1.0)]));
        let alerts = detect_trend(&h, &snap(&[("m", 200.0)]), "Test", &TrendRule::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_each_metric_evaluated_independently() {
        let h: MetricHistory = vec![
            snap(&[("a", 1.0), ("b", 1.0)]),
            snap(&[("a", 10.0), ("b", 10.0)]),
            snap(&[("a", 11.0), ("b", 9.0)]),
        ]
        .into_iter()
        .collect();
        let alerts = detect_trend(
            &h,
            &snap(&[("a", 13.0), ("b", 12.0)]),
            BUFFER_LABEL,
            &TrendRule::default(),
        );
        assert_eq!(
            alerts,
            vec!["Buffer allocation trending up: a increased 30.0% over last 3 runs".to_string()]
        );
    }

    #[test]
    fn test_custom_threshold() {
        let h = history(&[100.0, 100.0, 101.0]);
        let rule = TrendRule {
            threshold_pct: 1.0,
            min_history: 3,
        };
        assert_eq!(detect_trend(&h, &snap(&[("m", 103.0)]), "T", &rule).len(), 1);
    }

    #[test]
    fn test_monotonic_growth() {
        assert_eq!(monotonic_growth(100.0, 150.0, 200.0), Some(100.0));
        assert_eq!(monotonic_growth(100.0, 100.0, 200.0), None);
        assert_eq!(monotonic_growth(0.0, 1.0, 2.0), None);
    }
}
