//! Chronologically ordered views over a user's workout logs.
//!
//! Progress scoring and last-weight lookups only make sense on logs ordered
//! newest first. `LogTimeline` can only be built by sorting, so an unsorted
//! slice cannot reach those functions by accident.

use crate::WorkoutLog;
use chrono::NaiveDate;

/// Workout logs sorted newest first
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogTimeline {
    logs: Vec<WorkoutLog>,
}

impl LogTimeline {
    /// Sort logs by date, then finish time, descending.
    ///
    /// Stores append oldest first, so logs that still tie (same date, no
    /// finish time) are ordered by reverse store order.
    pub fn from_logs(mut logs: Vec<WorkoutLog>) -> Self {
        logs.reverse();
        logs.sort_by(|a, b| (b.date, b.finished_at).cmp(&(a.date, a.finished_at)));
        Self { logs }
    }

    pub fn logs(&self) -> &[WorkoutLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn newest(&self) -> Option<&WorkoutLog> {
        self.logs.first()
    }

    pub fn oldest(&self) -> Option<&WorkoutLog> {
        self.logs.last()
    }

    /// Logs dated within the last `days` calendar days, counting `today`.
    /// Future-dated logs are excluded.
    pub fn within_days(&self, today: NaiveDate, days: i64) -> Vec<&WorkoutLog> {
        self.logs
            .iter()
            .filter(|log| {
                let age = (today - log.date).num_days();
                (0..days).contains(&age)
            })
            .collect()
    }
}

/// Weight of the last recorded set of `exercise_name` in its most recent log.
///
/// Names must match exactly. Returns `None` when the exercise was never
/// logged, which is distinct from having been performed at zero weight.
pub fn last_weight_for_exercise(timeline: &LogTimeline, exercise_name: &str) -> Option<f64> {
    timeline
        .logs()
        .iter()
        .find_map(|log| log.exercises.iter().find(|e| e.name == exercise_name))
        .and_then(|exercise| exercise.sets.last())
        .map(|set| set.weight)
}
