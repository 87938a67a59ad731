//! The `HabitStore` trait and supporting input types.
//!
//! The trait is implemented by storage backends (e.g.
//! `cadence-store-sqlite`). Higher layers (`cadence-cli`) depend on this
//! abstraction, not on any concrete backend. Analytics never go through it
//! at all — they take already-loaded snapshots.

use std::future::Future;

use chrono::NaiveDateTime;

use crate::{
  completion::Completion,
  habit::{Habit, Periodicity},
  user::User,
};

// ─── Input type ──────────────────────────────────────────────────────────────

/// Input to [`HabitStore::create_habit`].
/// The `id` is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewHabit {
  /// Owning user; `None` attaches the habit to the default user.
  pub user_id:     Option<i64>,
  pub name:        String,
  pub description: String,
  pub periodicity: Periodicity,
  /// `None` means "now" as observed by the store.
  pub created_at:  Option<NaiveDateTime>,
}

impl NewHabit {
  /// Convenience constructor with owner and creation time left to the store.
  pub fn new(
    name: impl Into<String>,
    description: impl Into<String>,
    periodicity: Periodicity,
  ) -> Self {
    Self {
      user_id: None,
      name: name.into(),
      description: description.into(),
      periodicity,
      created_at: None,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a habit-tracker storage backend.
///
/// Records are created once and deleted explicitly; nothing is updated in
/// place. Deletes cascade: user → habits → completions.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait HabitStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a user with a unique username.
  fn create_user<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  /// List all users in id order.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Delete a user together with its habits and their completions.
  fn delete_user(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The first user in id order, created as `default_user` on first use.
  ///
  /// Keeps the single-user CLI working without an explicit account step.
  fn ensure_default_user(
    &self,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Habits ────────────────────────────────────────────────────────────

  /// Create and persist a habit. Fails if the owner does not exist or the
  /// name is already taken for that owner.
  fn create_habit(
    &self,
    input: NewHabit,
  ) -> impl Future<Output = Result<Habit, Self::Error>> + Send + '_;

  /// List habits in id order, optionally restricted to one owner.
  fn list_habits(
    &self,
    user_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Habit>, Self::Error>> + Send + '_;

  /// Retrieve a habit by id. Returns `None` if not found.
  fn get_habit(
    &self,
    habit_id: i64,
  ) -> impl Future<Output = Result<Option<Habit>, Self::Error>> + Send + '_;

  /// Delete a habit together with its completions.
  fn delete_habit(
    &self,
    habit_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Completions ───────────────────────────────────────────────────────

  /// Record a completion for `when`'s period.
  ///
  /// Returns `None` when the habit already has a completion in that period
  /// (at most one logical completion per period — policy, not schema).
  /// Fails if the habit does not exist.
  fn add_completion(
    &self,
    habit_id: i64,
    when: Option<NaiveDateTime>,
  ) -> impl Future<Output = Result<Option<Completion>, Self::Error>> + Send + '_;

  /// List completions in timestamp order, optionally restricted to one
  /// habit.
  fn list_completions(
    &self,
    habit_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Completion>, Self::Error>> + Send + '_;
}
