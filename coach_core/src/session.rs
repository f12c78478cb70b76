//! Live workout session state machine.
//!
//! The session is a pure reducer: `reduce(state, plan, event)` returns the
//! next state and, on a confirmed finish, the workout log to persist. It
//! never mutates its input and never schedules timers. The host owns the
//! single live `SessionState` and drives `Tick` once per second while the
//! session is resting and not paused.
//!
//! States:
//! - `NotStarted`
//! - `InProgress` (resting while `rest_remaining_seconds > 0`)
//! - `AwaitingFinishConfirmation`, left by `ConfirmFinish` or `CancelFinish`
//!
//! Finishing is two-phase. `RequestFinish` only moves to the confirmation
//! state; the partially logged exercise is folded into the log at
//! `ConfirmFinish`, so cancelling returns the exact session that was paused
//! for confirmation.

use crate::config::SessionConfig;
use crate::{Error, ExerciseLog, ExerciseTemplate, LoggedSet, Result, TrainingPlan, WorkoutLog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One target set of the active exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct SetSlot {
    pub weight: f64,
    pub reps: u32,
    pub completed: bool,
}

/// The exercise currently being worked through
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActiveExercise {
    pub name: String,
    pub target_sets: Vec<SetSlot>,
    /// Equal to `target_sets.len()` once every set is logged
    pub current_set_index: usize,
    pub rest_seconds: u32,
    pub target_reps_text: String,
}

impl ActiveExercise {
    fn from_template(template: &ExerciseTemplate, config: &SessionConfig) -> Self {
        Self {
            name: template.name.clone(),
            target_sets: vec![SetSlot::default(); template.set_count as usize],
            current_set_index: 0,
            rest_seconds: template.rest_seconds.unwrap_or(config.default_rest_seconds),
            target_reps_text: template.rep_range_text.clone(),
        }
    }

    fn completed_sets(&self) -> Vec<LoggedSet> {
        self.target_sets
            .iter()
            .filter(|slot| slot.completed)
            .map(|slot| LoggedSet {
                weight: slot.weight,
                reps: slot.reps,
            })
            .collect()
    }

    fn is_fully_logged(&self) -> bool {
        self.current_set_index >= self.target_sets.len()
    }

    /// Some sets logged but the exercise not yet flushed
    fn is_partial(&self) -> bool {
        self.current_set_index > 0 && !self.is_fully_logged()
    }

    fn to_log(&self) -> ExerciseLog {
        ExerciseLog {
            name: self.name.clone(),
            sets: self.completed_sets(),
        }
    }
}

/// Everything a running workout carries
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActiveSession {
    pub day_label: String,
    pub focus_area: String,
    pub exercise_count: usize,
    pub exercise_index: usize,
    pub active_exercise: ActiveExercise,
    /// Append-only; each exercise appears at most once
    pub completed_exercise_logs: Vec<ExerciseLog>,
    pub rest_remaining_seconds: u32,
    pub paused: bool,
    pub started_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Exercise logs a confirm would commit right now
    pub fn pending_logs(&self) -> Vec<ExerciseLog> {
        let mut logs = self.completed_exercise_logs.clone();
        if self.active_exercise.is_partial() {
            logs.push(self.active_exercise.to_log());
        }
        logs
    }

    fn has_next_exercise(&self) -> bool {
        self.exercise_index + 1 < self.exercise_count
    }

    /// Move to the next exercise in the day, flushing any logged prefix
    fn advance(&mut self, plan: &TrainingPlan, config: &SessionConfig) -> Result<()> {
        let next_index = self.exercise_index + 1;
        let template = plan
            .day(&self.day_label)
            .and_then(|day| day.exercises.get(next_index))
            .ok_or_else(|| {
                Error::State(format!(
                    "Plan no longer has exercise {} on `{}`",
                    next_index + 1,
                    self.day_label
                ))
            })?;

        if self.active_exercise.is_partial() {
            tracing::info!(
                "Logging {} of {} sets of {} before moving on",
                self.active_exercise.current_set_index,
                self.active_exercise.target_sets.len(),
                self.active_exercise.name
            );
            self.completed_exercise_logs.push(self.active_exercise.to_log());
        }

        self.exercise_index = next_index;
        self.active_exercise = ActiveExercise::from_template(template, config);
        self.rest_remaining_seconds = 0;
        Ok(())
    }
}

/// Session state owned by the host
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "state", content = "session", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NotStarted,
    InProgress(ActiveSession),
    AwaitingFinishConfirmation(ActiveSession),
}

/// Inputs to the reducer
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    StartWorkout {
        day_label: String,
        started_at: DateTime<Utc>,
    },
    /// `None` marks a missing or unparseable field
    CompleteSet {
        weight: Option<f64>,
        reps: Option<u32>,
    },
    SkipExercise,
    SkipRest,
    TogglePause {
        paused: bool,
    },
    /// One second of the host's rest countdown
    Tick,
    RequestFinish,
    ConfirmFinish {
        finished_at: DateTime<Utc>,
    },
    CancelFinish,
}

/// Result of applying one event
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    /// Set only by a confirmed finish with at least one logged exercise
    pub emitted: Option<WorkoutLog>,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            emitted: None,
        }
    }
}

/// Apply an event to a session.
///
/// A refused transition returns `Error::Precondition` and the caller keeps
/// its current state.
pub fn reduce(
    state: &SessionState,
    plan: &TrainingPlan,
    event: SessionEvent,
    config: &SessionConfig,
) -> Result<Transition> {
    match (state, event) {
        (
            SessionState::NotStarted,
            SessionEvent::StartWorkout {
                day_label,
                started_at,
            },
        ) => start_workout(plan, &day_label, started_at, config),
        (_, SessionEvent::StartWorkout { .. }) => {
            Err(refused("a workout is already running"))
        }

        (SessionState::InProgress(session), SessionEvent::CompleteSet { weight, reps }) => {
            complete_set(session, plan, weight, reps, config)
        }

        (SessionState::InProgress(session), SessionEvent::SkipExercise) => {
            let mut next = session.clone();
            if next.has_next_exercise() {
                next.advance(plan, config)?;
                tracing::info!("Skipped to {}", next.active_exercise.name);
            } else {
                tracing::debug!("Skip ignored on the last exercise");
            }
            Ok(Transition::to(SessionState::InProgress(next)))
        }

        (SessionState::InProgress(session), SessionEvent::SkipRest) => {
            let mut next = session.clone();
            next.rest_remaining_seconds = 0;
            Ok(Transition::to(SessionState::InProgress(next)))
        }

        (SessionState::InProgress(session), SessionEvent::TogglePause { paused }) => {
            let mut next = session.clone();
            next.paused = paused;
            tracing::debug!("Session paused: {}", paused);
            Ok(Transition::to(SessionState::InProgress(next)))
        }

        (SessionState::InProgress(session), SessionEvent::Tick) => {
            let mut next = session.clone();
            next.rest_remaining_seconds = next.rest_remaining_seconds.saturating_sub(1);
            Ok(Transition::to(SessionState::InProgress(next)))
        }
        // Late ticks after the session left the active state are harmless
        (_, SessionEvent::Tick) => Ok(Transition::to(state.clone())),

        (SessionState::InProgress(session), SessionEvent::RequestFinish) => {
            tracing::info!("Finish requested on `{}`, awaiting confirmation", session.day_label);
            Ok(Transition::to(SessionState::AwaitingFinishConfirmation(
                session.clone(),
            )))
        }

        (
            SessionState::AwaitingFinishConfirmation(session),
            SessionEvent::ConfirmFinish { finished_at },
        ) => Ok(confirm_finish(session, finished_at)),

        (SessionState::AwaitingFinishConfirmation(session), SessionEvent::CancelFinish) => {
            tracing::info!("Finish cancelled, resuming `{}`", session.day_label);
            Ok(Transition::to(SessionState::InProgress(session.clone())))
        }

        (state, event) => Err(refused(&format!(
            "{:?} is not allowed while {}",
            event,
            state.name()
        ))),
    }
}

fn start_workout(
    plan: &TrainingPlan,
    day_label: &str,
    started_at: DateTime<Utc>,
    config: &SessionConfig,
) -> Result<Transition> {
    let day = plan
        .startable_day(day_label)
        .map_err(|e| refused(&e.to_string()))?;

    tracing::info!(
        "Starting `{}` ({}) with {} exercises",
        day.label,
        day.focus_area,
        day.exercises.len()
    );

    Ok(Transition::to(SessionState::InProgress(ActiveSession {
        day_label: day.label.clone(),
        focus_area: day.focus_area.clone(),
        exercise_count: day.exercises.len(),
        exercise_index: 0,
        active_exercise: ActiveExercise::from_template(&day.exercises[0], config),
        completed_exercise_logs: Vec::new(),
        rest_remaining_seconds: 0,
        paused: false,
        started_at,
    })))
}

fn complete_set(
    session: &ActiveSession,
    plan: &TrainingPlan,
    weight: Option<f64>,
    reps: Option<u32>,
    config: &SessionConfig,
) -> Result<Transition> {
    let (weight, reps) = match (weight, reps) {
        (Some(w), Some(r)) if w.is_finite() && w >= 0.0 => (w, r),
        _ => return Err(refused("weight and reps are required")),
    };
    if session.rest_remaining_seconds > 0 {
        return Err(refused("still resting"));
    }
    if session.active_exercise.is_fully_logged() {
        return Err(refused("every set of this exercise is already logged"));
    }

    let mut next = session.clone();
    let exercise = &mut next.active_exercise;
    let index = exercise.current_set_index;
    exercise.target_sets[index] = SetSlot {
        weight,
        reps,
        completed: true,
    };
    exercise.current_set_index += 1;
    tracing::debug!(
        "{} set {}/{}: {} x {}",
        exercise.name,
        index + 1,
        exercise.target_sets.len(),
        weight,
        reps
    );

    if !exercise.is_fully_logged() {
        next.rest_remaining_seconds = exercise.rest_seconds;
        return Ok(Transition::to(SessionState::InProgress(next)));
    }

    let log = exercise.to_log();
    next.completed_exercise_logs.push(log);

    if next.has_next_exercise() {
        next.advance(plan, config)?;
        tracing::info!("Moving on to {}", next.active_exercise.name);
        Ok(Transition::to(SessionState::InProgress(next)))
    } else {
        tracing::info!("All exercises on `{}` logged", next.day_label);
        Ok(Transition::to(SessionState::AwaitingFinishConfirmation(next)))
    }
}

fn confirm_finish(session: &ActiveSession, finished_at: DateTime<Utc>) -> Transition {
    let exercises = session.pending_logs();
    let emitted = if exercises.is_empty() {
        tracing::info!("Nothing logged on `{}`, discarding session", session.day_label);
        None
    } else {
        let minutes = (finished_at - session.started_at).num_minutes().max(0);
        let log = WorkoutLog {
            id: Uuid::new_v4(),
            date: finished_at.date_naive(),
            workout_type: session.focus_area.clone(),
            duration_minutes: u32::try_from(minutes).unwrap_or(u32::MAX),
            exercises,
            finished_at: Some(finished_at),
        };
        tracing::info!(
            "Workout {} finished: {} exercises in {} min",
            log.id,
            log.exercises.len(),
            log.duration_minutes
        );
        Some(log)
    };

    Transition {
        state: SessionState::NotStarted,
        emitted,
    }
}

fn refused(reason: &str) -> Error {
    Error::Precondition(reason.to_string())
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not started",
            SessionState::InProgress(_) => "in progress",
            SessionState::AwaitingFinishConfirmation(_) => "awaiting finish confirmation",
        }
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            SessionState::NotStarted => None,
            SessionState::InProgress(s) | SessionState::AwaitingFinishConfirmation(s) => Some(s),
        }
    }

    pub fn current_exercise(&self) -> Option<&ActiveExercise> {
        self.active().map(|s| &s.active_exercise)
    }

    pub fn remaining_sets(&self) -> usize {
        self.current_exercise()
            .map(|e| e.target_sets.len().saturating_sub(e.current_set_index))
            .unwrap_or(0)
    }

    /// Exercises after the current one
    pub fn remaining_exercises(&self) -> usize {
        self.active()
            .map(|s| s.exercise_count.saturating_sub(s.exercise_index + 1))
            .unwrap_or(0)
    }

    pub fn rest_remaining(&self) -> u32 {
        self.active().map(|s| s.rest_remaining_seconds).unwrap_or(0)
    }

    pub fn is_resting(&self) -> bool {
        matches!(self, SessionState::InProgress(s) if s.rest_remaining_seconds > 0)
    }

    pub fn is_paused(&self) -> bool {
        self.active().map(|s| s.paused).unwrap_or(false)
    }
}

/// Parse the raw weight/reps fields of the set form.
///
/// Blank or malformed input becomes `None`, which `CompleteSet` refuses.
pub fn parse_set_input(weight_text: &str, reps_text: &str) -> (Option<f64>, Option<u32>) {
    let weight = weight_text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0);
    let reps = reps_text.trim().parse::<u32>().ok();
    (weight, reps)
}
