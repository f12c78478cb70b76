//! Next-session weight recommendation.
//!
//! The increment depends on the weight bracket:
//! - below 20: +1
//! - below 40: +2
//! - below 60: +2.5
//! - otherwise: +5

use crate::history::{last_weight_for_exercise, LogTimeline};
use crate::{OverloadAdjustment, Recommendation};

/// Guidance shown when the coach flagged a deload
pub const DELOAD_GUIDANCE: &str =
    "Deload recommended: reduce load or volume this session and focus on technique";

/// Step size for a given working weight
pub fn increment_for(weight: f64) -> f64 {
    if weight < 20.0 {
        1.0
    } else if weight < 40.0 {
        2.0
    } else if weight < 60.0 {
        2.5
    } else {
        5.0
    }
}

/// Recommended weight for the next session.
///
/// No history means no recommendation. Decreases never go below zero.
pub fn recommended_weight(last_weight: Option<f64>, adjustment: OverloadAdjustment) -> Option<f64> {
    let last = last_weight?;
    let step = increment_for(last);
    let next = match adjustment {
        OverloadAdjustment::Increase => last + step,
        OverloadAdjustment::Decrease => (last - step).max(0.0),
        OverloadAdjustment::None => last,
    };
    Some(next)
}

/// What the session screen shows next to an exercise
#[derive(Clone, Debug, PartialEq)]
pub struct WeightHint {
    pub last_weight: Option<f64>,
    pub recommended_weight: Option<f64>,
    /// Present only when the recommendation flags a deload
    pub guidance: Option<&'static str>,
}

/// Combine the exercise history with the coach's recommendation.
///
/// The deload flag is advisory and never changes the numbers.
pub fn weight_hint(
    timeline: &LogTimeline,
    exercise_name: &str,
    recommendation: Option<&Recommendation>,
) -> WeightHint {
    let last_weight = last_weight_for_exercise(timeline, exercise_name);
    let adjustment = recommendation
        .map(|r| r.overload_adjustment)
        .unwrap_or_default();
    let recommended = recommended_weight(last_weight, adjustment);

    tracing::debug!(
        "Weight hint for {}: last {:?}, recommended {:?} ({:?})",
        exercise_name,
        last_weight,
        recommended,
        adjustment
    );

    WeightHint {
        last_weight,
        recommended_weight: recommended,
        guidance: recommendation
            .filter(|r| r.deload)
            .map(|_| DELOAD_GUIDANCE),
    }
}
