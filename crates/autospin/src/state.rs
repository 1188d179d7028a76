use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The sole source of truth for "when is the next cycle due" across
/// restarts. Mutated exactly once per successful cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    /// Epoch milliseconds of the last confirmed success; zero when no
    /// cycle has ever succeeded.
    pub last_ok_ms: u64,
    /// Transaction hash of that success.
    pub last_tx: Option<String>,
}

/// Durable store for [`ScheduleState`]: one small human-readable JSON file,
/// safe to delete (the next startup treats the schedule as immediately due).
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load persisted state; a missing or unreadable file yields the zero
    /// state rather than an error.
    pub fn load(&self) -> ScheduleState {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(state) => state,
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err, "state file unreadable, starting fresh");
                    ScheduleState::default()
                }
            },
            Err(_) => ScheduleState::default(),
        }
    }

    /// Persist atomically: write a sibling temp file, then rename over the
    /// target so a concurrent reader never observes a torn record.
    pub fn save(&self, state: &ScheduleState) -> io::Result<()> {
        let contents = serde_json::to_string_pretty(state)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_zero_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::new(dir.path().join("spin-state.json"));
        assert_eq!(store.load(), ScheduleState::default());
    }

    #[test]
    fn corrupt_file_yields_zero_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("spin-state.json");
        fs::write(&path, "{not json").expect("write");
        let store = StateStore::new(path);
        assert_eq!(store.load(), ScheduleState::default());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::new(dir.path().join("spin-state.json"));
        let state = ScheduleState {
            last_ok_ms: 1_700_000_000_000,
            last_tx: Some("0xabc".to_string()),
        };
        store.save(&state).expect("save");
        assert_eq!(store.load(), state);
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("spin-state.json");
        let store = StateStore::new(path.clone());
        store.save(&ScheduleState::default()).expect("save");
        assert!(path.exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::new(dir.path().join("spin-state.json"));
        store
            .save(&ScheduleState {
                last_ok_ms: 1,
                last_tx: Some("0x1".to_string()),
            })
            .expect("first save");
        let newer = ScheduleState {
            last_ok_ms: 2,
            last_tx: Some("0x2".to_string()),
        };
        store.save(&newer).expect("second save");
        assert_eq!(store.load(), newer);
    }
}
