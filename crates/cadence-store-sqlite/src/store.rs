//! [`SqliteStore`] — the SQLite implementation of [`HabitStore`].

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use cadence_core::{
  completion::Completion,
  habit::Habit,
  period::period_id,
  store::{HabitStore, NewHabit},
  user::User,
};

use crate::{
  encode::{
    encode_dt, encode_periodicity, RawCompletion, RawHabit, RawUser,
  },
  schema::SCHEMA,
  Error, Result,
};

fn now_naive() -> NaiveDateTime { Local::now().naive_local() }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A habit store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether the habit already has a completion in the period `ts` falls in.
  ///
  /// Timestamps before the habit's creation date belong to no period and
  /// therefore never collide.
  async fn has_completion_in_period(
    &self,
    habit: &Habit,
    ts: NaiveDateTime,
  ) -> Result<bool> {
    let period_days = habit.periodicity.period_length_days();
    let target = period_id(habit.created_at, period_days, ts);
    if target < 0 {
      return Ok(false);
    }

    let completions = self.list_completions(habit.id).await?;
    Ok(
      completions
        .iter()
        .any(|c| period_id(habit.created_at, period_days, c.completed_at) == target),
    )
  }
}

// ─── HabitStore impl ─────────────────────────────────────────────────────────

impl HabitStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, username: &str) -> Result<User> {
    let username = username.trim().to_owned();
    let created_at = now_naive();
    let at_str = encode_dt(created_at);

    let id = {
      let username = username.clone();
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO users (username, created_at) VALUES (?1, ?2)",
            rusqlite::params![username, at_str],
          )?;
          Ok(conn.last_insert_rowid())
        })
        .await?
    };

    debug!(user_id = id, %username, "created user");
    Ok(User { id, username, created_at })
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT id, username, created_at FROM users ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawUser {
              id:         row.get(0)?,
              username:   row.get(1)?,
              created_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, username, created_at FROM users WHERE id = ?1",
            rusqlite::params![user_id],
            |row| {
              Ok(RawUser {
                id:         row.get(0)?,
                username:   row.get(1)?,
                created_at: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_user(&self, user_id: i64) -> Result<()> {
    // FK cascade removes the user's habits and, transitively, their
    // completions.
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![user_id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn ensure_default_user(&self) -> Result<User> {
    if let Some(first) = self.list_users().await?.into_iter().next() {
      return Ok(first);
    }
    self.create_user("default_user").await
  }

  // ── Habits ────────────────────────────────────────────────────────────────

  async fn create_habit(&self, input: NewHabit) -> Result<Habit> {
    let user_id = match input.user_id {
      Some(id) => {
        // The FK would reject unknown owners anyway; checking here turns a
        // constraint failure into a typed error.
        if self.get_user(id).await?.is_none() {
          return Err(Error::UserNotFound(id));
        }
        id
      }
      None => self.ensure_default_user().await?.id,
    };

    let habit = Habit {
      id: None,
      user_id,
      name: input.name.trim().to_owned(),
      description: input.description.trim().to_owned(),
      periodicity: input.periodicity,
      created_at: input.created_at.unwrap_or_else(now_naive),
    };

    let name = habit.name.clone();
    let description = habit.description.clone();
    let periodicity_str = encode_periodicity(habit.periodicity).to_owned();
    let at_str = encode_dt(habit.created_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO habits (user_id, name, description, periodicity, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![user_id, name, description, periodicity_str, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(habit_id = id, name = %habit.name, "created habit");
    Ok(Habit { id: Some(id), ..habit })
  }

  async fn list_habits(&self, user_id: Option<i64>) -> Result<Vec<Habit>> {
    let raws: Vec<RawHabit> = self
      .conn
      .call(move |conn| {
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawHabit {
            id:          row.get(0)?,
            user_id:     row.get(1)?,
            name:        row.get(2)?,
            description: row.get(3)?,
            periodicity: row.get(4)?,
            created_at:  row.get(5)?,
          })
        };

        let rows = if let Some(uid) = user_id {
          let mut stmt = conn.prepare(
            "SELECT id, user_id, name, description, periodicity, created_at
             FROM habits WHERE user_id = ?1 ORDER BY id",
          )?;
          stmt
            .query_map(rusqlite::params![uid], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT id, user_id, name, description, periodicity, created_at
             FROM habits ORDER BY id",
          )?;
          stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHabit::into_habit).collect()
  }

  async fn get_habit(&self, habit_id: i64) -> Result<Option<Habit>> {
    let raw: Option<RawHabit> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, user_id, name, description, periodicity, created_at
             FROM habits WHERE id = ?1",
            rusqlite::params![habit_id],
            |row| {
              Ok(RawHabit {
                id:          row.get(0)?,
                user_id:     row.get(1)?,
                name:        row.get(2)?,
                description: row.get(3)?,
                periodicity: row.get(4)?,
                created_at:  row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawHabit::into_habit).transpose()
  }

  async fn delete_habit(&self, habit_id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn
          .execute("DELETE FROM habits WHERE id = ?1", rusqlite::params![habit_id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Completions ───────────────────────────────────────────────────────────

  async fn add_completion(
    &self,
    habit_id: i64,
    when: Option<NaiveDateTime>,
  ) -> Result<Option<Completion>> {
    let ts = when.unwrap_or_else(now_naive);

    let habit = self
      .get_habit(habit_id)
      .await?
      .ok_or(Error::HabitNotFound(habit_id))?;

    if self.has_completion_in_period(&habit, ts).await? {
      debug!(habit_id, "period already completed, skipping");
      return Ok(None);
    }

    let ts_str = encode_dt(ts);
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO completions (habit_id, completed_at) VALUES (?1, ?2)",
          rusqlite::params![habit_id, ts_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Some(Completion { id: Some(id), habit_id, completed_at: ts }))
  }

  async fn list_completions(&self, habit_id: Option<i64>) -> Result<Vec<Completion>> {
    let raws: Vec<RawCompletion> = self
      .conn
      .call(move |conn| {
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawCompletion {
            id:           row.get(0)?,
            habit_id:     row.get(1)?,
            completed_at: row.get(2)?,
          })
        };

        let rows = if let Some(hid) = habit_id {
          let mut stmt = conn.prepare(
            "SELECT id, habit_id, completed_at FROM completions
             WHERE habit_id = ?1 ORDER BY completed_at",
          )?;
          stmt
            .query_map(rusqlite::params![hid], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT id, habit_id, completed_at FROM completions
             ORDER BY completed_at",
          )?;
          stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCompletion::into_completion).collect()
  }
}
