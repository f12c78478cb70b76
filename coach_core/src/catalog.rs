//! Default working-weight catalog used to estimate planned volume.
//!
//! Plans carry no weights, so planned volume is estimated by matching
//! keywords (Hebrew and English) against exercise names. The numbers are a
//! rough estimate of a typical working weight in kilograms, not measured data.

use once_cell::sync::Lazy;

/// Weight assumed when no keyword matches
pub const FALLBACK_WEIGHT: f64 = 20.0;

/// A keyword and the working weight it implies
#[derive(Clone, Debug, PartialEq)]
pub struct KeywordWeight {
    pub keyword: String,
    pub weight: f64,
}

/// Ordered keyword table; the first matching entry wins
#[derive(Clone, Debug)]
pub struct WeightCatalog {
    pub entries: Vec<KeywordWeight>,
    pub fallback: f64,
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_WEIGHTS: Lazy<WeightCatalog> = Lazy::new(build_default_weight_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_weights() -> &'static WeightCatalog {
    &DEFAULT_WEIGHTS
}

/// Builds the default keyword table
///
/// **Note**: For production use, prefer `get_default_weights()`.
pub fn build_default_weight_catalog() -> WeightCatalog {
    let table: &[(&str, f64)] = &[
        // Compound lower body
        ("leg press", 100.0),
        ("לחיצת רגליים", 100.0),
        ("deadlift", 70.0),
        ("דדליפט", 70.0),
        ("squat", 60.0),
        ("סקוואט", 60.0),
        ("lunge", 20.0),
        ("מכרעים", 20.0),
        // Compound upper body
        ("bench", 50.0),
        ("לחיצת חזה", 50.0),
        ("shoulder press", 30.0),
        ("overhead", 30.0),
        ("לחיצת כתפיים", 30.0),
        ("pulldown", 40.0),
        ("פולי עליון", 40.0),
        ("row", 40.0),
        ("חתירה", 40.0),
        // Isolation
        ("lateral raise", 8.0),
        ("הרחקת כתפיים", 8.0),
        ("curl", 12.0),
        ("כפיפת מרפקים", 12.0),
        ("tricep", 15.0),
        ("פשיטת מרפקים", 15.0),
    ];

    WeightCatalog {
        entries: table
            .iter()
            .map(|(keyword, weight)| KeywordWeight {
                keyword: keyword.to_lowercase(),
                weight: *weight,
            })
            .collect(),
        fallback: FALLBACK_WEIGHT,
    }
}

impl WeightCatalog {
    /// Estimated working weight for an exercise name (substring match)
    pub fn weight_for(&self, exercise_name: &str) -> f64 {
        let name = exercise_name.to_lowercase();
        self.entries
            .iter()
            .find(|entry| name.contains(&entry.keyword))
            .map(|entry| entry.weight)
            .unwrap_or(self.fallback)
    }
}
