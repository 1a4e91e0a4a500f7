//! Layered monitor configuration.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! config file, `SOAKWATCH_*` environment variables, then command-line flags
//! (applied by the binary).
//!
//! ```toml
//! state_file = "/var/lib/soak/soak_monitor_state.json"
//! report_file = "/var/lib/soak/last_run.json"
//! log_extension = "log"
//! watermark_policy = "wall-clock"
//!
//! [trend]
//! threshold_pct = 10.0
//! min_history = 3
//! ```
//!
//! Nested keys use a double underscore in the environment, for example
//! `SOAKWATCH_TREND__THRESHOLD_PCT=15`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::{TrendRule, WatermarkPolicy};
use crate::error::{MonitorError, Result};
use crate::store::DEFAULT_STATE_FILE;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SOAKWATCH";

/// Monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Where monitor state is kept between runs.
    pub state_file: PathBuf,
    /// Where to write the JSON run report, if anywhere.
    pub report_file: Option<PathBuf>,
    /// Extension of log files picked up from directories.
    pub log_extension: String,
    pub watermark_policy: WatermarkPolicy,
    pub trend: TrendRule,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            report_file: None,
            log_extension: "log".to_string(),
            watermark_policy: WatermarkPolicy::default(),
            trend: TrendRule::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from an optional file plus the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(MonitorError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: MonitorConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.trend.threshold_pct.is_finite() || self.trend.threshold_pct < 0.0 {
            return Err(MonitorError::Config(format!(
                "trend.threshold_pct must be a non-negative number, got {}",
                self.trend.threshold_pct
            )));
        }
        if self.trend.min_history < 2 {
            return Err(MonitorError::Config(format!(
                "trend.min_history must be at least 2, got {}",
                self.trend.min_history
            )));
        }
        if self.log_extension.trim().is_empty() {
            return Err(MonitorError::Config("log_extension must not be empty".to_string()));
        }
        Ok(())
    }
}
