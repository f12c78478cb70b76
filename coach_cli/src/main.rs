use coach_core::catalog::get_default_weights;
use coach_core::csv_export::export_logs;
use coach_core::scoring::{
    body_composition_score, overall_progress_level, weekly_intensity, workout_progress_score,
};
use coach_core::*;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "coach")]
#[command(about = "Workout session tracker and training progress scores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User to act for (defaults to the configured user)
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a workout for a day of the assigned plan
    Start {
        /// Day label, e.g. "Day A"
        day: String,
    },

    /// Log the current set
    Set {
        weight: String,
        reps: String,
    },

    /// Skip to the next exercise (logs any sets already done)
    Skip,

    /// End the current rest early
    SkipRest,

    /// Advance the rest countdown
    Tick {
        #[arg(default_value_t = 1)]
        seconds: u32,
    },

    /// Hold the rest countdown
    Pause,

    /// Release the rest countdown
    Resume,

    /// Ask to finish the workout (needs `confirm` or `cancel`)
    Finish,

    /// Confirm finishing and save the workout log
    Confirm,

    /// Go back to the workout instead of finishing
    Cancel,

    /// Show the current session (default)
    Status,

    /// Show last and recommended weight for an exercise
    Recommend {
        exercise: String,

        /// Overload direction; defaults to the stored recommendation
        #[arg(long, value_enum)]
        adjust: Option<Adjust>,

        /// Flag a deload (advisory)
        #[arg(long)]
        deload: bool,
    },

    /// Body-composition, workout-progress and overall scores
    Progress {
        #[arg(long, value_enum)]
        goal: GoalArg,
        #[arg(long)]
        starting_weight: f64,
        #[arg(long)]
        current_weight: f64,
        #[arg(long)]
        starting_fat: f64,
        #[arg(long)]
        current_fat: f64,
    },

    /// Recent volume against the plan's estimated volume
    Intensity {
        #[arg(long, default_value_t = 7)]
        days: i64,
    },

    /// Engagement rate of a message thread (JSON list of messages)
    Engagement { messages: PathBuf },

    /// Trainer summary for a roster (JSON)
    Report { roster: PathBuf },

    /// Export the user's workout logs as CSV, one row per set
    Export { output: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Adjust {
    Increase,
    Decrease,
    None,
}

impl From<Adjust> for OverloadAdjustment {
    fn from(adjust: Adjust) -> Self {
        match adjust {
            Adjust::Increase => OverloadAdjustment::Increase,
            Adjust::Decrease => OverloadAdjustment::Decrease,
            Adjust::None => OverloadAdjustment::None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GoalArg {
    FatLoss,
    MuscleGain,
}

impl From<GoalArg> for Goal {
    fn from(goal: GoalArg) -> Self {
        match goal {
            GoalArg::FatLoss => Goal::FatLoss,
            GoalArg::MuscleGain => Goal::MuscleGain,
        }
    }
}

/// Where a user's files live under the data directory
struct Paths {
    user: String,
    data_dir: PathBuf,
}

impl Paths {
    fn plans(&self) -> FilePlanProvider {
        FilePlanProvider::new(self.data_dir.join("plans"))
    }

    fn logs(&self) -> JsonlLogStore {
        JsonlLogStore::new(self.data_dir.join("logs"))
    }

    fn session(&self) -> PathBuf {
        self.data_dir.join("session").join(format!("{}.json", self.user))
    }

    fn recommendation(&self) -> PathBuf {
        self.data_dir
            .join("recommendations")
            .join(format!("{}.json", self.user))
    }
}

fn main() -> Result<()> {
    // Initialize logging
    coach_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let paths = Paths {
        user: cli.user.unwrap_or_else(|| config.user.id.clone()),
        data_dir: cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone()),
    };

    tracing::debug!("Using data dir {:?} for user {}", paths.data_dir, paths.user);

    let now = chrono::Utc::now();

    match cli.command {
        Some(Commands::Start { day }) => cmd_session(
            &paths,
            &config,
            SessionEvent::StartWorkout {
                day_label: day,
                started_at: now,
            },
        ),
        Some(Commands::Set { weight, reps }) => {
            let (weight, reps) = parse_set_input(&weight, &reps);
            cmd_session(&paths, &config, SessionEvent::CompleteSet { weight, reps })
        }
        Some(Commands::Skip) => cmd_session(&paths, &config, SessionEvent::SkipExercise),
        Some(Commands::SkipRest) => cmd_session(&paths, &config, SessionEvent::SkipRest),
        Some(Commands::Tick { seconds }) => cmd_tick(&paths, &config, seconds),
        Some(Commands::Pause) => {
            cmd_session(&paths, &config, SessionEvent::TogglePause { paused: true })
        }
        Some(Commands::Resume) => {
            cmd_session(&paths, &config, SessionEvent::TogglePause { paused: false })
        }
        Some(Commands::Finish) => cmd_session(&paths, &config, SessionEvent::RequestFinish),
        Some(Commands::Confirm) => cmd_session(
            &paths,
            &config,
            SessionEvent::ConfirmFinish { finished_at: now },
        ),
        Some(Commands::Cancel) => cmd_session(&paths, &config, SessionEvent::CancelFinish),
        Some(Commands::Recommend {
            exercise,
            adjust,
            deload,
        }) => cmd_recommend(&paths, &exercise, adjust, deload),
        Some(Commands::Progress {
            goal,
            starting_weight,
            current_weight,
            starting_fat,
            current_fat,
        }) => cmd_progress(
            &paths,
            BodyMeasurements {
                goal: goal.into(),
                starting_weight,
                current_weight,
                starting_fat_pct: starting_fat,
                current_fat_pct: current_fat,
            },
        ),
        Some(Commands::Intensity { days }) => cmd_intensity(&paths, days, now.date_naive()),
        Some(Commands::Engagement { messages }) => cmd_engagement(&messages),
        Some(Commands::Report { roster }) => cmd_report(&roster, now.date_naive()),
        Some(Commands::Export { output }) => cmd_export(&paths, &output),
        Some(Commands::Status) | None => cmd_status(&paths),
    }
}

fn load_timeline(paths: &Paths) -> Result<LogTimeline> {
    Ok(LogTimeline::from_logs(paths.logs().logs_for_user(&paths.user)?))
}

fn load_recommendation(paths: &Paths) -> Result<Option<Recommendation>> {
    let path = paths.recommendation();
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Load, reduce, persist. A refused transition leaves the saved state as is.
fn cmd_session(paths: &Paths, config: &Config, event: SessionEvent) -> Result<()> {
    let plan = paths.plans().plan_for_user(&paths.user)?;
    let session_path = paths.session();
    let state = SessionState::load(&session_path)?;

    let transition = reduce(&state, &plan, event, &config.session)?;

    if let Some(ref log) = transition.emitted {
        paths.logs().append_log(&paths.user, log)?;
        println!("\n✓ Workout saved!");
        println!(
            "  {} · {} exercises · {} min",
            log.workout_type,
            log.exercises.len(),
            log.duration_minutes
        );
    } else if matches!(state, SessionState::AwaitingFinishConfirmation(_))
        && transition.state == SessionState::NotStarted
    {
        println!("\nNothing was logged - session discarded.");
    }

    transition.state.save(&session_path)?;
    display_state(paths, &transition.state)
}

fn cmd_tick(paths: &Paths, config: &Config, seconds: u32) -> Result<()> {
    let plan = paths.plans().plan_for_user(&paths.user)?;
    let session_path = paths.session();
    let mut state = SessionState::load(&session_path)?;

    // The rest countdown is ours to hold while paused
    if state.is_paused() {
        println!("Paused - rest timer held at {}s", state.rest_remaining());
        return Ok(());
    }

    for _ in 0..seconds {
        if !state.is_resting() {
            break;
        }
        state = reduce(&state, &plan, SessionEvent::Tick, &config.session)?.state;
    }

    state.save(&session_path)?;
    display_state(paths, &state)
}

fn cmd_status(paths: &Paths) -> Result<()> {
    let state = SessionState::load(&paths.session())?;
    display_state(paths, &state)
}

fn display_state(paths: &Paths, state: &SessionState) -> Result<()> {
    let session = match state.active() {
        Some(session) => session,
        None => {
            println!("No workout in progress.");
            return Ok(());
        }
    };

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} · {}", session.day_label, session.focus_area);
    println!("╰─────────────────────────────────────────╯");
    println!();

    let exercise = &session.active_exercise;
    println!(
        "  {} (exercise {}/{})",
        exercise.name,
        session.exercise_index + 1,
        session.exercise_count
    );
    println!(
        "  Target: {} sets × {} reps",
        exercise.target_sets.len(),
        exercise.target_reps_text
    );
    for (i, slot) in exercise.target_sets.iter().enumerate() {
        if slot.completed {
            println!("    set {}: {} × {}", i + 1, slot.weight, slot.reps);
        }
    }
    println!(
        "  Sets left: {} · Exercises after this: {}",
        state.remaining_sets(),
        state.remaining_exercises()
    );

    let hint = weight_hint(
        &load_timeline(paths)?,
        &exercise.name,
        load_recommendation(paths)?.as_ref(),
    );
    display_hint(&hint);

    if state.is_resting() {
        let paused = if state.is_paused() { " (paused)" } else { "" };
        println!("\n  ⏱ Rest: {}s{}", state.rest_remaining(), paused);
    }

    if let SessionState::AwaitingFinishConfirmation(s) = state {
        println!("\n─────────────────────────────────────────");
        println!("Finish workout? {} exercises will be saved.", s.pending_logs().len());
        println!("  `coach confirm` to save, `coach cancel` to keep going");
    }

    println!();
    Ok(())
}

fn display_hint(hint: &WeightHint) {
    match hint.last_weight {
        Some(w) => println!("  Last weight: {}", w),
        None => println!("  Last weight: -"),
    }
    if let Some(w) = hint.recommended_weight {
        println!("  Recommended: {}", w);
    }
    if let Some(guidance) = hint.guidance {
        println!("  ℹ {}", guidance);
    }
}

fn cmd_recommend(
    paths: &Paths,
    exercise: &str,
    adjust: Option<Adjust>,
    deload: bool,
) -> Result<()> {
    let stored = load_recommendation(paths)?;
    let recommendation = match adjust {
        Some(adjust) => Some(Recommendation {
            overload_adjustment: adjust.into(),
            deload,
        }),
        None => match stored {
            Some(r) => Some(Recommendation {
                deload: r.deload || deload,
                ..r
            }),
            None if deload => Some(Recommendation {
                deload: true,
                ..Default::default()
            }),
            None => None,
        },
    };

    let hint = weight_hint(&load_timeline(paths)?, exercise, recommendation.as_ref());
    println!("{}", exercise);
    display_hint(&hint);
    if hint.last_weight.is_none() {
        println!("  No history for this exercise yet.");
    }
    Ok(())
}

fn cmd_progress(paths: &Paths, measurements: BodyMeasurements) -> Result<()> {
    let timeline = load_timeline(paths)?;
    let bcs = body_composition_score(&measurements);
    let wps = workout_progress_score(&timeline);
    let opl = overall_progress_level(bcs, wps);

    println!("Body composition score: {:.2}", bcs);
    println!("Workout progress score: {:.2} ({} workouts)", wps, timeline.len());
    println!("Overall progress level: {:.2}", opl);
    Ok(())
}

fn cmd_intensity(paths: &Paths, days: i64, today: chrono::NaiveDate) -> Result<()> {
    let plan = paths.plans().plan_for_user(&paths.user)?;
    if !plan.is_assigned() {
        println!("No plan assigned.");
        return Ok(());
    }

    let timeline = load_timeline(paths)?;
    let recent: Vec<WorkoutLog> = timeline
        .within_days(today, days)
        .into_iter()
        .cloned()
        .collect();

    let intensity = weekly_intensity(&recent, &plan, get_default_weights());
    println!(
        "Intensity over {} days: {:.1}% of estimated plan volume ({} workouts)",
        days,
        intensity,
        recent.len()
    );
    Ok(())
}

fn cmd_engagement(path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let messages: Vec<Message> = serde_json::from_str(&contents)?;
    println!(
        "Engagement rate: {:.1} ({} messages)",
        engagement_rate(&messages),
        messages.len()
    );
    Ok(())
}

fn cmd_report(path: &Path, today: chrono::NaiveDate) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let roster: Roster = serde_json::from_str(&contents)?;
    let summary = summarize_trainer(&roster, today);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_export(paths: &Paths, output: &Path) -> Result<()> {
    let timeline = load_timeline(paths)?;
    let rows = export_logs(&timeline, output)?;
    println!("✓ Exported {} sets from {} workouts", rows, timeline.len());
    println!("  CSV: {}", output.display());
    Ok(())
}
