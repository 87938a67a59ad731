//! Streak and due-status analytics.
//!
//! Every function here is pure: it reads an in-memory snapshot of habits and
//! completions and derives a result. Nothing queries the store or an ambient
//! clock — the reference instant for due-status is an explicit parameter, so
//! callers and tests control time.

use chrono::NaiveDateTime;

use crate::{
  completion::Completion,
  habit::{Habit, Periodicity},
  period::period_id,
};

/// Habits that share the given periodicity, in input order.
pub fn habits_by_periodicity(
  habits: &[Habit],
  periodicity: Periodicity,
) -> Vec<&Habit> {
  habits
    .iter()
    .filter(|h| h.periodicity == periodicity)
    .collect()
}

/// Sorted, de-duplicated period indices of the habit's valid completions.
///
/// Completions belonging to other habits and completions that predate the
/// habit's creation date are dropped. Several completions in one period
/// collapse to a single index.
fn completed_periods(habit: &Habit, completions: &[Completion]) -> Vec<i64> {
  let period_days = habit.periodicity.period_length_days();
  let mut pids: Vec<i64> = completions
    .iter()
    .filter(|c| habit.id == Some(c.habit_id))
    .map(|c| period_id(habit.created_at, period_days, c.completed_at))
    .filter(|&pid| pid >= 0)
    .collect();
  pids.sort_unstable();
  pids.dedup();
  pids
}

/// Longest run of consecutive completed periods for one habit.
///
/// A period counts as completed if at least one completion falls in it;
/// extra completions in the same period never extend the run. No completed
/// periods yields 0, a single completed period yields 1.
pub fn longest_streak_for(habit: &Habit, completions: &[Completion]) -> u32 {
  let pids = completed_periods(habit, completions);
  if pids.is_empty() {
    return 0;
  }

  let mut best = 1u32;
  let mut run = 1u32;
  for pair in pids.windows(2) {
    run = if pair[1] == pair[0] + 1 { run + 1 } else { 1 };
    best = best.max(run);
  }
  best
}

/// The habit with the longest streak, paired with that streak.
///
/// Ties resolve to the first habit in input order (strict `>` scan).
/// Returns `None` for an empty habit slice.
pub fn longest_streak_overall<'a>(
  habits: &'a [Habit],
  completions: &[Completion],
) -> Option<(&'a Habit, u32)> {
  let mut best: Option<(&Habit, u32)> = None;
  for habit in habits {
    let streak = longest_streak_for(habit, completions);
    match best {
      Some((_, s)) if streak <= s => {}
      _ => best = Some((habit, streak)),
    }
  }
  best
}

/// Habits with no completion in their current period as of `now`, in input
/// order.
///
/// A habit whose creation date lies after `now` is never due — there is no
/// current period to complete yet.
pub fn habits_due<'a>(
  habits: &'a [Habit],
  completions: &[Completion],
  now: NaiveDateTime,
) -> Vec<&'a Habit> {
  habits
    .iter()
    .filter(|h| {
      let current = period_id(h.created_at, h.periodicity.period_length_days(), now);
      if current < 0 {
        return false;
      }
      !completed_periods(h, completions).contains(&current)
    })
    .collect()
}

/// `(habit, longest streak)` for every habit, in input order.
pub fn longest_streaks_per_habit<'a>(
  habits: &'a [Habit],
  completions: &[Completion],
) -> Vec<(&'a Habit, u32)> {
  habits
    .iter()
    .map(|h| (h, longest_streak_for(h, completions)))
    .collect()
}
