//! Durable monitor state.
//!
//! The state file is the only thing shared between runs. It is read once at
//! start and replaced once at the end. Writes go to a sibling temp file that
//! is synced and renamed over the target, so a crash mid-write leaves the
//! previous state intact. There is no locking: one monitor per state file.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use soakwatch_types::{MonitorState, SchemaVersion};
use tracing::{debug, info};

use crate::error::{MonitorError, Result};

/// Default state file name.
pub const DEFAULT_STATE_FILE: &str = "soak_monitor_state.json";

/// Loads and saves [`MonitorState`] at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state, or a first-run state if no file exists yet.
    pub fn load(&self) -> Result<MonitorState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No state file, starting fresh");
                return Ok(MonitorState::new());
            }
            Err(e) => return Err(MonitorError::io(&self.path, e)),
        };

        let state: MonitorState =
            serde_json::from_str(&content).map_err(|source| MonitorError::StateParse {
                path: self.path.clone(),
                source,
            })?;

        if !state.version.is_compatible() {
            return Err(MonitorError::IncompatibleState {
                path: self.path.clone(),
                found: state.version,
                expected: SchemaVersion::current(),
            });
        }

        debug!(
            path = %self.path.display(),
            buffer_runs = state.buffer_history.len(),
            resource_runs = state.resource_history.len(),
            health_issues = state.health_history.len(),
            "Loaded monitor state"
        );
        Ok(state)
    }

    /// Replace the state file atomically.
    pub fn save(&self, state: &MonitorState) -> Result<()> {
        write_json_atomic(&self.path, state, "monitor state")
    }
}

/// Write a document as pretty JSON via temp file and rename.
///
/// On failure the temp file is removed and the target is left untouched.
pub fn write_json_atomic<T: Serialize>(path: &Path, document: &T, what: &'static str) -> Result<()> {
    let json = serde_json::to_string_pretty(document)
        .map_err(|source| MonitorError::Serialize { what, source })?;

    let tmp = temp_path(path);
    let result = write_and_sync(&tmp, json.as_bytes())
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|e| MonitorError::io(path, e));

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
        return result;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    debug!(path = %path.display(), what, "Wrote document");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut out = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    out.write_all(bytes)?;
    out.write_all(b"\n")?;
    out.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use soakwatch_types::{RunSummary, StreamKey};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn populated_state() -> MonitorState {
        let mut summary = RunSummary {
            timestamp_of_run: "2026-10-18T12:00:00+00:00".to_string(),
            ..Default::default()
        };
        summary.buffer_latest.insert("Svc.BufferManager.CurrBuffs".to_string(), 12.0);
        summary.resource_latest.insert("systemResources.CPU".to_string(), 37.5);

        let marks: BTreeMap<_, _> = StreamKey::ALL.iter().map(|&k| (k, 1_700_000_000)).collect();
        let mut state = MonitorState::new();
        state.merge_run(&summary, &marks);
        state
    }

    #[test]
    fn test_missing_file_is_first_run() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        assert_eq!(store.load().unwrap(), MonitorState::new());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        let state = populated_state();

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_repeated_save_load_is_byte_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = StateStore::new(&path);

        store.save(&populated_state()).unwrap();
        let first = fs::read(&path).unwrap();

        store.save(&store.load().unwrap()).unwrap();
        store.save(&store.load().unwrap()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        StateStore::new(&path).save(&MonitorState::new()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_failed_save_keeps_previous_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = StateStore::new(&path);
        store.save(&populated_state()).unwrap();
        let before = fs::read(&path).unwrap();

        // A directory where the temp file should go makes the write fail.
        fs::create_dir(temp_path(&path)).unwrap();
        assert!(store.save(&MonitorState::new()).is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_corrupt_state_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let err = StateStore::new(&path).load().unwrap_err();
        assert!(matches!(err, MonitorError::StateParse { .. }));
    }

    #[test]
    fn test_incompatible_schema_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{"version": {"major": 99, "minor": 0}, "last_run_timestamp": null}"#,
        )
        .unwrap();

        let err = StateStore::new(&path).load().unwrap_err();
        assert!(matches!(err, MonitorError::IncompatibleState { .. }));
    }

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(
            temp_path(Path::new("/var/soak/state.json")),
            PathBuf::from("/var/soak/state.json.tmp")
        );
    }
}
