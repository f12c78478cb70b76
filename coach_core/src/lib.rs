#![forbid(unsafe_code)]

//! Core domain model and business logic for the training coach.
//!
//! This crate provides:
//! - Domain types (plans, workout logs, measurements, rosters)
//! - The live workout session reducer
//! - Volume and progress scoring
//! - Weight recommendation and message-engagement heuristics
//! - Trainer aggregate reporting
//! - Persistence (log store, plan files, active session state, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod catalog;
pub mod plan;
pub mod history;
pub mod scoring;
pub mod recommend;
pub mod engagement;
pub mod session;
pub mod report;
pub mod wal;
pub mod state;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::get_default_weights;
pub use config::Config;
pub use plan::{FilePlanProvider, PlanProvider};
pub use history::{last_weight_for_exercise, LogTimeline};
pub use recommend::{recommended_weight, weight_hint, WeightHint};
pub use engagement::engagement_rate;
pub use session::{reduce, parse_set_input, SessionEvent, SessionState, Transition};
pub use report::{summarize_trainer, TrainerSummary};
pub use wal::{JsonlLogStore, LogStore, MemoryLogStore};
