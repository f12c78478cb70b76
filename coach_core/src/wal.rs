//! Append-only workout log store.
//!
//! Logs are appended to one JSONL (JSON Lines) file per user with file
//! locking to ensure safe concurrent access. There is no update or delete
//! path; a log is immutable once written.

use crate::{Result, WorkoutLog};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Persistence for finished workouts
pub trait LogStore {
    /// All logs for a user in store order (not sorted by date)
    fn logs_for_user(&self, user_id: &str) -> Result<Vec<WorkoutLog>>;

    fn append_log(&mut self, user_id: &str, log: &WorkoutLog) -> Result<()>;
}

/// JSONL-based log store with file locking
pub struct JsonlLogStore {
    root: PathBuf,
}

impl JsonlLogStore {
    /// Create a store writing `<root>/<user>.jsonl`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.root.join(format!("{}.jsonl", user_id))
    }
}

impl LogStore for JsonlLogStore {
    fn logs_for_user(&self, user_id: &str) -> Result<Vec<WorkoutLog>> {
        read_logs(&self.path_for(user_id))
    }

    fn append_log(&mut self, user_id: &str, log: &WorkoutLog) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(user_id);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(log)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended workout {} to {:?}", log.id, path);
        Ok(())
    }
}

/// Read all logs from a JSONL file, skipping lines that fail to parse
pub fn read_logs(path: &Path) -> Result<Vec<WorkoutLog>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut logs = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutLog>(&line) {
            Ok(log) => logs.push(log),
            Err(e) => {
                tracing::warn!("Failed to parse workout log at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} workout logs from {:?}", logs.len(), path);
    Ok(logs)
}

/// In-memory store for hosts that keep logs elsewhere
#[derive(Default)]
pub struct MemoryLogStore {
    logs: HashMap<String, Vec<WorkoutLog>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogStore for MemoryLogStore {
    fn logs_for_user(&self, user_id: &str) -> Result<Vec<WorkoutLog>> {
        Ok(self.logs.get(user_id).cloned().unwrap_or_default())
    }

    fn append_log(&mut self, user_id: &str, log: &WorkoutLog) -> Result<()> {
        self.logs
            .entry(user_id.to_string())
            .or_default()
            .push(log.clone());
        Ok(())
    }
}
