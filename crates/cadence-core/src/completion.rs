//! Completion — a single check-off event for a habit.
//!
//! The store may physically hold several rows that fall into the same
//! period (out-of-band inserts); analytics collapse them to one logical
//! event per period.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A completion event. `id` is `None` until the record is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
  pub id:           Option<i64>,
  pub habit_id:     i64,
  pub completed_at: NaiveDateTime,
}
