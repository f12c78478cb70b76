//! Active-session persistence with file locking.
//!
//! A CLI host lives for one event at a time, so it keeps the in-progress
//! `SessionState` on disk between invocations. The file only exists while a
//! session is running.

use crate::session::SessionState;
use crate::{Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl SessionState {
    /// Load session state from a file with shared locking
    ///
    /// Returns `NotStarted` if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns `NotStarted`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No active session file at {:?}", path);
            return Ok(Self::NotStarted);
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        match serde_json::from_str::<SessionState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded {} session from {:?}", state.name(), path);
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse session file {:?}: {}. Starting fresh.",
                    path,
                    e
                );
                Ok(Self::NotStarted)
            }
        }
    }

    /// Persist the state atomically, or remove the file once the session
    /// is back to `NotStarted`
    ///
    /// Atomically writes state by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if matches!(self, SessionState::NotStarted) {
            return Self::clear(path);
        }

        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("Session path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} session to {:?}", self.name(), path);
        Ok(())
    }

    fn clear(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!("Removed session file {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::plan::fixtures::sample_plan;
    use crate::session::{reduce, SessionEvent};
    use chrono::Utc;

    fn running_state() -> SessionState {
        reduce(
            &SessionState::NotStarted,
            &sample_plan(),
            SessionEvent::StartWorkout {
                day_label: "Day A".into(),
                started_at: Utc::now(),
            },
            &SessionConfig::default(),
        )
        .unwrap()
        .state
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session").join("dana.json");

        let state = running_state();
        state.save(&path).unwrap();

        assert_eq!(SessionState::load(&path).unwrap(), state);
    }

    #[test]
    fn test_load_nonexistent_is_not_started() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state = SessionState::load(&temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(state, SessionState::NotStarted);
    }

    #[test]
    fn test_corrupted_file_is_not_started() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dana.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        assert_eq!(SessionState::load(&path).unwrap(), SessionState::NotStarted);
    }

    #[test]
    fn test_saving_not_started_removes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dana.json");

        running_state().save(&path).unwrap();
        assert!(path.exists());

        SessionState::NotStarted.save(&path).unwrap();
        assert!(!path.exists());

        // Clearing twice is fine
        SessionState::NotStarted.save(&path).unwrap();
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dana.json");

        running_state().save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "dana.json")
            .collect();
        assert!(extras.is_empty(), "Expected only dana.json, found {:?}", extras);
    }
}
