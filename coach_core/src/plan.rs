//! Training plan model and the file-backed plan provider.
//!
//! Plans are read-only here; editing them happens elsewhere.

use crate::{Error, ExerciseTemplate, Result, TrainingDay, TrainingPlan};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Source of a user's assigned training plan
pub trait PlanProvider {
    /// Returns an empty plan when no plan is assigned
    fn plan_for_user(&self, user_id: &str) -> Result<TrainingPlan>;
}

/// Reads plans from `<root>/<user>.json`
pub struct FilePlanProvider {
    root: PathBuf,
}

impl FilePlanProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", user_id))
    }
}

impl PlanProvider for FilePlanProvider {
    fn plan_for_user(&self, user_id: &str) -> Result<TrainingPlan> {
        let path = self.path_for(user_id);
        if !path.exists() {
            tracing::info!("No plan assigned to {} ({:?} missing)", user_id, path);
            return Ok(TrainingPlan::default());
        }
        let plan = TrainingPlan::load(&path)?;
        for problem in plan.validate() {
            tracing::warn!("Plan for {}: {}", user_id, problem);
        }
        Ok(plan)
    }
}

impl TrainingPlan {
    /// Load a plan from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let plan: TrainingPlan = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded plan with {} days from {:?}", plan.days.len(), path);
        Ok(plan)
    }

    pub fn is_assigned(&self) -> bool {
        !self.days.is_empty()
    }

    pub fn day(&self, label: &str) -> Option<&TrainingDay> {
        self.days.iter().find(|d| d.label == label)
    }

    /// Look up a day that can be started, i.e. one with at least one exercise
    pub fn startable_day(&self, label: &str) -> Result<&TrainingDay> {
        let day = self
            .day(label)
            .ok_or_else(|| Error::Plan(format!("No training day labelled `{}`", label)))?;
        if day.exercises.is_empty() {
            return Err(Error::Plan(format!("Training day `{}` has no exercises", label)));
        }
        Ok(day)
    }

    /// Validate plan structure, returning a list of problems
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut labels = HashSet::new();

        for day in &self.days {
            if !labels.insert(day.label.as_str()) {
                errors.push(format!("Duplicate day label `{}`", day.label));
            }
            for exercise in &day.exercises {
                if exercise.set_count == 0 {
                    errors.push(format!(
                        "Exercise `{}` on `{}` has zero sets",
                        exercise.name, day.label
                    ));
                }
            }
        }

        errors
    }
}

impl ExerciseTemplate {
    pub fn average_reps(&self) -> f64 {
        average_reps(&self.rep_range_text)
    }
}

/// Average of a rep range such as "8-12" (→ 10) or "10" (→ 10).
///
/// Only the first two numbers in the text are considered. Text without any
/// number yields 0.
pub fn average_reps(rep_range_text: &str) -> f64 {
    let numbers: Vec<f64> = rep_range_text
        .split(|c: char| !c.is_ascii_digit() && c != '.')
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<f64>().ok())
        .take(2)
        .collect();

    match numbers.as_slice() {
        [low, high] => (low + high) / 2.0,
        [single] => *single,
        _ => 0.0,
    }
}
