//! Volume and progress scoring.
//!
//! Every function here is total: empty input and zero denominators return
//! `0.0` instead of NaN or infinity.
//!
//! - Volume: weight x reps, summed over a workout
//! - BCS: body-composition score, relative to the client's goal
//! - WPS: workout-progress score, volume change oldest → newest
//! - OPL: 70/30 blend of BCS and WPS
//! - Weekly intensity: actual volume against an estimated planned volume

use crate::catalog::WeightCatalog;
use crate::history::LogTimeline;
use crate::{BodyMeasurements, Goal, TrainingPlan, WorkoutLog};

/// BCS share of the overall progress level
pub const BCS_WEIGHT: f64 = 0.7;
/// WPS share of the overall progress level
pub const WPS_WEIGHT: f64 = 0.3;

pub fn set_volume(weight: f64, reps: u32) -> f64 {
    weight * f64::from(reps)
}

/// Total volume of a log; `0` for a missing log
pub fn workout_volume(log: Option<&WorkoutLog>) -> f64 {
    log.map(|log| {
        log.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .map(|s| set_volume(s.weight, s.reps))
            .sum()
    })
    .unwrap_or(0.0)
}

/// Percentage change in body composition in the direction of the goal.
///
/// Fat loss: relative drop in body fat, negative when fat was gained.
/// Muscle gain: relative weight gain, credited only while body fat did not
/// rise.
pub fn body_composition_score(m: &BodyMeasurements) -> f64 {
    match m.goal {
        Goal::FatLoss => {
            percent_change(m.starting_fat_pct, m.starting_fat_pct - m.current_fat_pct)
        }
        Goal::MuscleGain => {
            if m.current_fat_pct <= m.starting_fat_pct {
                percent_change(m.starting_weight, m.current_weight - m.starting_weight)
            } else {
                0.0
            }
        }
    }
}

/// Percentage change in volume from the oldest to the newest log.
///
/// Needs at least two logs.
pub fn workout_progress_score(timeline: &LogTimeline) -> f64 {
    if timeline.len() < 2 {
        return 0.0;
    }
    let newest = workout_volume(timeline.newest());
    let oldest = workout_volume(timeline.oldest());
    percent_change(oldest, newest - oldest)
}

/// Weighted blend of BCS and WPS, rounded to 2 decimals
pub fn overall_progress_level(bcs: f64, wps: f64) -> f64 {
    round2(bcs * BCS_WEIGHT + wps * WPS_WEIGHT)
}

/// OPL for one client from their measurements and logs
pub fn client_progress(measurements: &BodyMeasurements, timeline: &LogTimeline) -> f64 {
    overall_progress_level(
        body_composition_score(measurements),
        workout_progress_score(timeline),
    )
}

/// Estimated volume of a full plan pass.
///
/// Approximate: weights come from the keyword catalog, reps from the middle
/// of each rep range.
pub fn planned_volume(plan: &TrainingPlan, catalog: &WeightCatalog) -> f64 {
    plan.days
        .iter()
        .flat_map(|day| day.exercises.iter())
        .map(|exercise| {
            catalog.weight_for(&exercise.name)
                * f64::from(exercise.set_count)
                * exercise.average_reps()
        })
        .sum()
}

/// Actual volume as a percentage of the estimated planned volume
pub fn weekly_intensity(
    actual_logs: &[WorkoutLog],
    plan: &TrainingPlan,
    catalog: &WeightCatalog,
) -> f64 {
    let planned = planned_volume(plan, catalog);
    let actual: f64 = actual_logs.iter().map(|l| workout_volume(Some(l))).sum();
    tracing::debug!("Weekly intensity: actual {} / planned {}", actual, planned);
    percent_change(planned, actual)
}

/// `delta / base * 100`, or `0` when the result would not be finite
fn percent_change(base: f64, delta: f64) -> f64 {
    if base == 0.0 {
        return 0.0;
    }
    let value = delta * 100.0 / base;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
