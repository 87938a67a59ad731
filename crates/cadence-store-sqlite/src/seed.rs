//! Demo fixture data for a fresh database.
//!
//! Seeds five habits (three daily, two weekly) with four weeks of mixed
//! completion history so the CLI has something to show out of the box. Runs
//! only when the store holds no habits at all.

use chrono::{Local, NaiveDateTime, TimeDelta};
use tracing::info;

use cadence_core::{
  habit::Periodicity,
  store::{HabitStore, NewHabit},
};

use crate::{Result, SqliteStore};

/// Four weeks of history, anchored a fixed time of day so period mapping is
/// deterministic within a run.
fn fixture_start() -> NaiveDateTime {
  (Local::now() - TimeDelta::days(27))
    .naive_local()
    .date()
    .and_hms_opt(18, 0, 0)
    .unwrap()
}

impl SqliteStore {
  /// Seed demo habits and completions if the database holds no habits yet.
  pub async fn seed_if_empty(&self) -> Result<()> {
    if !self.list_habits(None).await?.is_empty() {
      return Ok(());
    }

    let user = self.ensure_default_user().await?;
    let start = fixture_start();

    let new_habit = |name: &str, description: &str, periodicity| NewHabit {
      user_id: Some(user.id),
      name: name.to_owned(),
      description: description.to_owned(),
      periodicity,
      created_at: Some(start),
    };

    let stretch = self
      .create_habit(new_habit(
        "Morning stretch",
        "5-10 min mobility routine.",
        Periodicity::Daily,
      ))
      .await?;
    let no_sugar = self
      .create_habit(new_habit(
        "No sugary drink",
        "Avoid soda/energy drinks.",
        Periodicity::Daily,
      ))
      .await?;
    let study = self
      .create_habit(new_habit(
        "Study session",
        "45 min focused study.",
        Periodicity::Daily,
      ))
      .await?;
    let cleaning = self
      .create_habit(new_habit(
        "Weekly cleaning",
        "Clean room + laundry.",
        Periodicity::Weekly,
      ))
      .await?;
    let budget = self
      .create_habit(new_habit(
        "Budget review",
        "Check spending & plan week.",
        Periodicity::Weekly,
      ))
      .await?;

    for day in 0..28i64 {
      let d = start + TimeDelta::days(day);

      // Daily habits with different miss patterns, so the demo streak
      // analytics have gaps to find.
      if day % 6 != 5 {
        self.add_completion(stretch.id.unwrap(), Some(d)).await?;
      }
      if day % 4 != 3 {
        self
          .add_completion(no_sugar.id.unwrap(), Some(d + TimeDelta::minutes(30)))
          .await?;
      }
      if day % 3 != 2 {
        self
          .add_completion(study.id.unwrap(), Some(d + TimeDelta::hours(1)))
          .await?;
      }

      // Weekly habits: cleaning every week, budget review missing week 4.
      if matches!(day, 2 | 9 | 16 | 23) {
        self
          .add_completion(cleaning.id.unwrap(), Some(d + TimeDelta::hours(2)))
          .await?;
      }
      if matches!(day, 4 | 11 | 18) {
        self
          .add_completion(budget.id.unwrap(), Some(d + TimeDelta::hours(3)))
          .await?;
      }
    }

    info!("seeded demo habits and four weeks of completions");
    Ok(())
  }
}
