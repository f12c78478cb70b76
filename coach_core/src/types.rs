//! Core domain types for the coaching engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Training plans (days, exercise templates)
//! - Logged sets, exercise logs and persisted workout logs
//! - Progress inputs for scoring
//! - Coach recommendation inputs and message timelines
//! - Trainer rosters for aggregate reporting

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Training Plan Types
// ============================================================================

/// A single exercise prescription inside a training day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseTemplate {
    pub name: String,
    pub set_count: u32,
    /// Free text such as "8-12" or "10"
    pub rep_range_text: String,
    pub rest_seconds: Option<u32>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// One day of a training plan (e.g. "Day A - Legs")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainingDay {
    pub label: String,
    pub focus_area: String,
    pub exercises: Vec<ExerciseTemplate>,
}

/// The immutable plan a session walks through.
///
/// An empty `days` list means no plan is assigned.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct TrainingPlan {
    pub days: Vec<TrainingDay>,
}

// ============================================================================
// Log Types
// ============================================================================

/// A set as written into a workout log
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedSet {
    pub weight: f64,
    pub reps: u32,
}

/// All sets performed for one exercise in a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseLog {
    pub name: String,
    pub sets: Vec<LoggedSet>,
}

/// A finished workout, created once per confirmed session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub date: NaiveDate,
    /// The focus area of the day that was trained
    #[serde(rename = "type")]
    pub workout_type: String,
    pub duration_minutes: u32,
    pub exercises: Vec<ExerciseLog>,
    /// When the session was confirmed; absent on imported logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Progress and Recommendation Types
// ============================================================================

/// Body-composition goal of a client
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    FatLoss,
    MuscleGain,
}

/// Body measurements used for the body-composition score
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyMeasurements {
    pub goal: Goal,
    pub starting_weight: f64,
    pub current_weight: f64,
    pub starting_fat_pct: f64,
    pub current_fat_pct: f64,
}

/// Coach-provided overload direction for the next session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverloadAdjustment {
    Increase,
    Decrease,
    #[default]
    None,
}

/// Recommendation object read from the recommendation provider
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Recommendation {
    #[serde(default)]
    pub overload_adjustment: OverloadAdjustment,
    /// Advisory only; surfaced as guidance text
    #[serde(default)]
    pub deload: bool,
}

/// A message in a trainer/client thread
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub sender: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub text: String,
}

// ============================================================================
// Roster Types
// ============================================================================

/// A trainer the roster belongs to
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Trainer {
    pub id: String,
    pub name: String,
}

/// One client on a trainer's roster, with everything needed to score them
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub measurements: BodyMeasurements,
    #[serde(default)]
    pub logs: Vec<WorkoutLog>,
}

/// Input document for the trainer aggregate report
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Roster {
    pub trainer: Trainer,
    pub clients: Vec<ClientRecord>,
}
