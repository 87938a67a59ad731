//! Error types for `cadence-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown periodicity: {0:?}")]
  UnknownPeriodicity(String),

  #[error("habit not found: {0}")]
  HabitNotFound(i64),

  #[error("user not found: {0}")]
  UserNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
