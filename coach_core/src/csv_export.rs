//! CSV export of workout logs, one row per set.

use crate::history::LogTimeline;
use crate::scoring::set_volume;
use crate::Result;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    log_id: String,
    date: String,
    #[serde(rename = "type")]
    workout_type: &'a str,
    exercise: &'a str,
    set: usize,
    weight: f64,
    reps: u32,
    volume: f64,
}

/// Write every set of every log to `csv_path`, newest workout first.
///
/// The file is replaced, then synced to disk. Returns the number of rows.
pub fn export_logs(timeline: &LogTimeline, csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(csv_path)?;
    let mut rows = 0;

    for log in timeline.logs() {
        let log_id = log.id.to_string();
        let date = log.date.to_string();
        for exercise in &log.exercises {
            for (index, set) in exercise.sets.iter().enumerate() {
                writer.serialize(CsvRow {
                    log_id: log_id.clone(),
                    date: date.clone(),
                    workout_type: &log.workout_type,
                    exercise: &exercise.name,
                    set: index + 1,
                    weight: set.weight,
                    reps: set.reps,
                    volume: set_volume(set.weight, set.reps),
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sets from {} workouts to {:?}", rows, timeline.len(), csv_path);
    Ok(rows)
}
