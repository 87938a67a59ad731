//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as `%Y-%m-%d %H:%M:%S` strings — second precision,
//! readable when inspecting the database file by hand. Periodicity is stored
//! as its lowercase name.

use cadence_core::{
  completion::Completion,
  habit::{Habit, Periodicity},
  user::User,
};
use chrono::NaiveDateTime;

use crate::{Error, Result};

/// Column format for every timestamp in the database.
pub const DT_FMT: &str = "%Y-%m-%d %H:%M:%S";

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: NaiveDateTime) -> String { dt.format(DT_FMT).to_string() }

pub fn decode_dt(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DT_FMT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Periodicity ─────────────────────────────────────────────────────────────

pub fn encode_periodicity(p: Periodicity) -> &'static str { p.as_str() }

pub fn decode_periodicity(s: &str) -> Result<Periodicity> {
  Ok(s.parse::<Periodicity>()?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub id:         i64,
  pub username:   String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         self.id,
      username:   self.username,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `habits` row.
pub struct RawHabit {
  pub id:          i64,
  pub user_id:     i64,
  pub name:        String,
  pub description: String,
  pub periodicity: String,
  pub created_at:  String,
}

impl RawHabit {
  pub fn into_habit(self) -> Result<Habit> {
    Ok(Habit {
      id:          Some(self.id),
      user_id:     self.user_id,
      name:        self.name,
      description: self.description,
      periodicity: decode_periodicity(&self.periodicity)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `completions` row.
pub struct RawCompletion {
  pub id:           i64,
  pub habit_id:     i64,
  pub completed_at: String,
}

impl RawCompletion {
  pub fn into_completion(self) -> Result<Completion> {
    Ok(Completion {
      id:           Some(self.id),
      habit_id:     self.habit_id,
      completed_at: decode_dt(&self.completed_at)?,
    })
  }
}
