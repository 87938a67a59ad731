//! Period mapping — absolute timestamps to habit-relative period indices.
//!
//! A period is a fixed-length bucket of 1 or 7 calendar days anchored to the
//! habit's creation date. Weekly periods are 7-day blocks counted from that
//! date, not calendar weeks starting on Monday.

use chrono::NaiveDateTime;

/// Sentinel index for timestamps whose calendar date precedes the habit's
/// creation date: the instant is outside the tracking range.
pub const PERIOD_BEFORE_CREATION: i64 = -1;

/// Map `ts` to a 0-based period index relative to `created_at`.
///
/// Time of day is stripped on both sides, so two completions on the same
/// calendar date always land in the same daily period regardless of hour.
/// The creation day itself is period 0; a timestamp exactly
/// `period_length_days` days later starts period 1.
pub fn period_id(
  created_at: NaiveDateTime,
  period_length_days: i64,
  ts: NaiveDateTime,
) -> i64 {
  let delta_days = (ts.date() - created_at.date()).num_days();
  if delta_days < 0 {
    PERIOD_BEFORE_CREATION
  } else {
    delta_days.div_euclid(period_length_days)
  }
}
