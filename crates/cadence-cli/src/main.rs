//! `cadence` — command-line front end for the Cadence habit tracker.
//!
//! # Usage
//!
//! ```
//! cadence list
//! cadence create --name "Morning stretch" --description "Mobility" --periodicity daily
//! cadence checkoff 3
//! cadence analytics due-today
//! ```
//!
//! Opens (or creates) an SQLite database next to the current directory and
//! seeds demo data on first run, so the analytics commands have something to
//! chew on out of the box.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cadence_core::{
  analytics,
  habit::{Habit, Periodicity},
  store::{HabitStore, NewHabit},
};
use cadence_store_sqlite::SqliteStore;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cadence", about = "Track recurring habits and their streaks")]
struct Cli {
  /// Path to the SQLite database file.
  #[arg(long, env = "CADENCE_DB", default_value = "habit_tracker.db")]
  db: PathBuf,

  /// Skip demo-data seeding on an empty database.
  #[arg(long)]
  no_seed: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// List all habits.
  List,

  /// Create a new habit for the default user.
  Create {
    /// Short habit name (task).
    #[arg(long)]
    name: String,

    /// More detail about the task.
    #[arg(long)]
    description: String,

    #[arg(long, value_enum)]
    periodicity: PeriodicityArg,
  },

  /// Delete a habit (and related completions).
  Delete { habit_id: i64 },

  /// Mark a habit as completed for the current period.
  Checkoff { habit_id: i64 },

  /// Manage users.
  #[command(subcommand)]
  User(UserCommand),

  /// Run analytics queries.
  #[command(subcommand)]
  Analytics(AnalyticsCommand),
}

#[derive(Subcommand)]
enum UserCommand {
  /// Create a user.
  Add { username: String },
  /// List all users.
  List,
  /// Delete a user and, transitively, their habits and completions.
  Remove { user_id: i64 },
}

#[derive(Subcommand)]
enum AnalyticsCommand {
  /// List habits filtered by periodicity.
  Period { periodicity: PeriodicityArg },
  /// Show the longest streak for a single habit.
  Longest { habit_id: i64 },
  /// Show the habit with the longest streak overall.
  LongestOverall,
  /// Show the longest streak for every habit.
  Streaks,
  /// Show habits that are due in the current period.
  DueToday,
}

/// Mirror of [`Periodicity`] carrying the clap `ValueEnum` derive, so the
/// core crate stays free of CLI dependencies.
#[derive(Clone, Copy, ValueEnum)]
enum PeriodicityArg {
  Daily,
  Weekly,
}

impl From<PeriodicityArg> for Periodicity {
  fn from(arg: PeriodicityArg) -> Self {
    match arg {
      PeriodicityArg::Daily => Self::Daily,
      PeriodicityArg::Weekly => Self::Weekly,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let store = SqliteStore::open(&cli.db)
    .await
    .with_context(|| format!("opening database {}", cli.db.display()))?;

  if !cli.no_seed {
    store.seed_if_empty().await.context("seeding demo data")?;
  }

  run(&store, cli.command).await
}

fn now() -> NaiveDateTime { Local::now().naive_local() }

fn display_id(habit: &Habit) -> i64 { habit.id.unwrap_or_default() }

async fn run<S: HabitStore>(store: &S, command: Command) -> Result<()> {
  match command {
    Command::List => {
      let habits = store.list_habits(None).await?;
      if habits.is_empty() {
        println!("No habits stored yet.");
        return Ok(());
      }
      for h in &habits {
        println!(
          "[{:02}] {:<20} | {:<6} | created {}",
          display_id(h),
          h.name,
          h.periodicity,
          h.created_at.date(),
        );
      }
    }

    Command::Create { name, description, periodicity } => {
      let habit = store
        .create_habit(NewHabit::new(name, description, periodicity.into()))
        .await?;
      println!(
        "Created habit [{}] {} ({}).",
        display_id(&habit),
        habit.name,
        habit.periodicity,
      );
    }

    Command::Delete { habit_id } => {
      store.delete_habit(habit_id).await?;
      println!("Deleted habit id={habit_id}.");
    }

    Command::Checkoff { habit_id } => {
      let Some(habit) = store.get_habit(habit_id).await? else {
        println!("Habit not found.");
        return Ok(());
      };

      match store.add_completion(habit_id, Some(now())).await? {
        Some(_) => println!("Saved completion for: {}", habit.name),
        None => println!(
          "Already completed '{}' for the current {} period.",
          habit.name, habit.periodicity,
        ),
      }
    }

    Command::User(cmd) => run_user(store, cmd).await?,

    Command::Analytics(cmd) => run_analytics(store, cmd).await?,
  }

  Ok(())
}

async fn run_user<S: HabitStore>(store: &S, command: UserCommand) -> Result<()> {
  match command {
    UserCommand::Add { username } => {
      let user = store.create_user(&username).await?;
      println!("Created user [{}] {}.", user.id, user.username);
    }

    UserCommand::List => {
      let users = store.list_users().await?;
      if users.is_empty() {
        println!("No users stored yet.");
        return Ok(());
      }
      for u in &users {
        println!("[{:02}] {:<20} | created {}", u.id, u.username, u.created_at.date());
      }
    }

    UserCommand::Remove { user_id } => {
      store.delete_user(user_id).await?;
      println!("Deleted user id={user_id} (habits and completions included).");
    }
  }

  Ok(())
}

async fn run_analytics<S: HabitStore>(
  store: &S,
  command: AnalyticsCommand,
) -> Result<()> {
  match command {
    AnalyticsCommand::Period { periodicity } => {
      let habits = store.list_habits(None).await?;
      for h in analytics::habits_by_periodicity(&habits, periodicity.into()) {
        println!("[{}] {} ({})", display_id(h), h.name, h.periodicity);
      }
    }

    AnalyticsCommand::Longest { habit_id } => {
      let Some(habit) = store.get_habit(habit_id).await? else {
        println!("Habit not found.");
        return Ok(());
      };
      let comps = store.list_completions(Some(habit_id)).await?;
      let streak = analytics::longest_streak_for(&habit, &comps);
      println!("Longest streak for {}: {streak} periods", habit.name);
    }

    AnalyticsCommand::LongestOverall => {
      let habits = store.list_habits(None).await?;
      let comps = store.list_completions(None).await?;
      match analytics::longest_streak_overall(&habits, &comps) {
        None => println!("No habits."),
        Some((habit, streak)) => {
          println!("Longest overall streak: {} -> {streak} periods", habit.name);
        }
      }
    }

    AnalyticsCommand::Streaks => {
      let habits = store.list_habits(None).await?;
      let comps = store.list_completions(None).await?;
      for (h, streak) in analytics::longest_streaks_per_habit(&habits, &comps) {
        println!(
          "[{}] {} ({}) -> longest streak: {streak} periods",
          display_id(h),
          h.name,
          h.periodicity,
        );
      }
    }

    AnalyticsCommand::DueToday => {
      let habits = store.list_habits(None).await?;
      let comps = store.list_completions(None).await?;
      let due = analytics::habits_due(&habits, &comps, now());

      if due.is_empty() {
        println!("No habits due right now. Well done!");
      } else {
        println!("Habits due now:");
        for h in due {
          println!("- [{}] {} ({})", display_id(h), h.name, h.periodicity);
        }
      }
    }
  }

  Ok(())
}
