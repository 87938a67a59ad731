//! Habit — the tracked task with a cadence.
//!
//! A habit holds identity metadata and a periodicity. Everything derived
//! (period indices, streaks, due status) is computed on read from the
//! completion log, never stored.

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The cadence of a habit: one period per day or per week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
  Daily,
  Weekly,
}

impl Periodicity {
  /// Length of one period in whole calendar days.
  ///
  /// Every period computation in the workspace goes through this mapping;
  /// analytics and persistence must agree on what a "period" means.
  pub fn period_length_days(self) -> i64 {
    match self {
      Self::Daily => 1,
      Self::Weekly => 7,
    }
  }

  /// The string stored in the `periodicity` database column.
  /// Must match the `rename_all = "lowercase"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Daily => "daily",
      Self::Weekly => "weekly",
    }
  }
}

impl FromStr for Periodicity {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "daily" => Ok(Self::Daily),
      "weekly" => Ok(Self::Weekly),
      other => Err(Error::UnknownPeriodicity(other.to_owned())),
    }
  }
}

impl fmt::Display for Periodicity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A tracked habit. `id` is `None` until the record is persisted.
/// Names are unique per owning user (enforced by the store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
  pub id:          Option<i64>,
  pub user_id:     i64,
  pub name:        String,
  pub description: String,
  pub periodicity: Periodicity,
  pub created_at:  NaiveDateTime,
}
