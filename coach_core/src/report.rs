//! Trainer-level aggregates over a client roster.

use crate::history::LogTimeline;
use crate::scoring::client_progress;
use crate::Roster;
use chrono::NaiveDate;
use serde::Serialize;

/// Sessions each client is expected to complete per week
pub const EXPECTED_SESSIONS_PER_WEEK: usize = 3;
/// Days counted as "this week"
pub const WEEK_DAYS: i64 = 7;
/// Progress at or above this is ahead of plan
pub const AHEAD_THRESHOLD: f64 = 90.0;
/// Progress at or above this is on track
pub const ON_TRACK_THRESHOLD: f64 = 70.0;
/// Progress at or above this counts as a goal achieved
pub const GOAL_ACHIEVED_THRESHOLD: f64 = 80.0;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Ahead,
    OnTrack,
    Behind,
}

impl ClientStatus {
    pub fn from_progress(progress: f64) -> Self {
        if progress >= AHEAD_THRESHOLD {
            ClientStatus::Ahead
        } else if progress >= ON_TRACK_THRESHOLD {
            ClientStatus::OnTrack
        } else {
            ClientStatus::Behind
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClientSummary {
    pub id: String,
    pub name: String,
    pub progress: f64,
    pub status: ClientStatus,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct WeeklyMetrics {
    pub completed_sessions: usize,
    /// Expected minus completed; negative when clients over-deliver
    pub missed_sessions: i64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TrainerSummary {
    pub trainer_id: String,
    pub trainer_name: String,
    pub total_clients: usize,
    pub active_clients: usize,
    pub client_retention: f64,
    pub average_progress: f64,
    pub goals_achieved: usize,
    pub weekly_metrics: WeeklyMetrics,
    pub clients: Vec<ClientSummary>,
}

/// Fold a roster into a trainer summary as of `today`.
///
/// An empty roster reports zero retention and progress.
pub fn summarize_trainer(roster: &Roster, today: NaiveDate) -> TrainerSummary {
    let total_clients = roster.clients.len();
    let active_clients = roster.clients.iter().filter(|c| c.active).count();

    let mut completed_sessions = 0;
    let clients: Vec<ClientSummary> = roster
        .clients
        .iter()
        .map(|client| {
            let timeline = LogTimeline::from_logs(client.logs.clone());
            completed_sessions += timeline.within_days(today, WEEK_DAYS).len();

            let progress = client_progress(&client.measurements, &timeline);
            ClientSummary {
                id: client.id.clone(),
                name: client.name.clone(),
                progress,
                status: ClientStatus::from_progress(progress),
            }
        })
        .collect();

    let goals_achieved = clients
        .iter()
        .filter(|c| c.progress >= GOAL_ACHIEVED_THRESHOLD)
        .count();

    let (client_retention, average_progress) = if total_clients == 0 {
        (0.0, 0.0)
    } else {
        (
            active_clients as f64 / total_clients as f64 * 100.0,
            clients.iter().map(|c| c.progress).sum::<f64>() / total_clients as f64,
        )
    };

    let expected = (total_clients * EXPECTED_SESSIONS_PER_WEEK) as i64;
    let missed_sessions = expected - completed_sessions as i64;

    tracing::info!(
        "Trainer {}: {}/{} active, {} sessions this week, {} missed",
        roster.trainer.id,
        active_clients,
        total_clients,
        completed_sessions,
        missed_sessions
    );

    TrainerSummary {
        trainer_id: roster.trainer.id.clone(),
        trainer_name: roster.trainer.name.clone(),
        total_clients,
        active_clients,
        client_retention,
        average_progress,
        goals_achieved,
        weekly_metrics: WeeklyMetrics {
            completed_sessions,
            missed_sessions,
        },
        clients,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::fixtures::*;
    use crate::{BodyMeasurements, ClientRecord, Goal, Trainer};

    fn trainer() -> Trainer {
        Trainer {
            id: "t1".into(),
            name: "Noa".into(),
        }
    }

    fn client(id: &str, active: bool, starting_fat: f64, current_fat: f64) -> ClientRecord {
        ClientRecord {
            id: id.into(),
            name: id.to_uppercase(),
            active,
            measurements: BodyMeasurements {
                goal: Goal::FatLoss,
                starting_weight: 90.0,
                current_weight: 85.0,
                starting_fat_pct: starting_fat,
                current_fat_pct: current_fat,
            },
            logs: vec![],
        }
    }

    #[test]
    fn test_empty_roster_reports_zero() {
        let roster = Roster {
            trainer: trainer(),
            clients: vec![],
        };
        let summary = summarize_trainer(&roster, date(2026, 6, 1));

        assert_eq!(summary.total_clients, 0);
        assert_eq!(summary.client_retention, 0.0);
        assert_eq!(summary.average_progress, 0.0);
        assert_eq!(summary.weekly_metrics.missed_sessions, 0);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(ClientStatus::from_progress(95.0), ClientStatus::Ahead);
        assert_eq!(ClientStatus::from_progress(90.0), ClientStatus::Ahead);
        assert_eq!(ClientStatus::from_progress(70.0), ClientStatus::OnTrack);
        assert_eq!(ClientStatus::from_progress(69.99), ClientStatus::Behind);
        assert_eq!(ClientStatus::from_progress(-5.0), ClientStatus::Behind);
    }

    #[test]
    fn test_roster_summary() {
        let today = date(2026, 6, 10);

        // 20 -> 5 fat: BCS 75, OPL 52.5. 20 -> 0 fat: BCS 100, OPL 70.
        let mut a = client("a", true, 20.0, 5.0);
        a.logs = vec![
            workout(date(2026, 6, 9), vec![]),
            workout(date(2026, 6, 5), vec![]),
            workout(date(2026, 5, 20), vec![]),
        ];
        let mut b = client("b", false, 20.0, 0.0);
        b.logs = vec![workout(date(2026, 6, 10), vec![])];

        let roster = Roster {
            trainer: trainer(),
            clients: vec![a, b],
        };
        let summary = summarize_trainer(&roster, today);

        assert_eq!(summary.active_clients, 1);
        assert_eq!(summary.client_retention, 50.0);
        assert_eq!(summary.clients[0].progress, 52.5);
        assert_eq!(summary.clients[0].status, ClientStatus::Behind);
        assert_eq!(summary.clients[1].progress, 70.0);
        assert_eq!(summary.clients[1].status, ClientStatus::OnTrack);
        assert_eq!(summary.average_progress, 61.25);
        assert_eq!(summary.goals_achieved, 0);
        assert_eq!(
            summary.weekly_metrics,
            WeeklyMetrics {
                completed_sessions: 3,
                missed_sessions: 3,
            }
        );
    }

    #[test]
    fn test_goals_achieved_and_missed_goes_negative() {
        let today = date(2026, 6, 10);
        let mut star = client("star", true, 20.0, 0.0);
        star.measurements.goal = Goal::MuscleGain;
        star.measurements.starting_weight = 50.0;
        star.measurements.current_weight = 110.0; // BCS 120, OPL 84
        star.logs = (0..5).map(|d| workout(date(2026, 6, 10 - d), vec![])).collect();

        let roster = Roster {
            trainer: trainer(),
            clients: vec![star],
        };
        let summary = summarize_trainer(&roster, today);

        assert_eq!(summary.clients[0].progress, 84.0);
        assert_eq!(summary.goals_achieved, 1);
        assert_eq!(summary.weekly_metrics.completed_sessions, 5);
        assert_eq!(summary.weekly_metrics.missed_sessions, -2);
    }
}
