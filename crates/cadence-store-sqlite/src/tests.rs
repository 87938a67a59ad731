//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use cadence_core::{
  analytics,
  habit::Periodicity,
  store::{HabitStore, NewHabit},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(y, m, d)
    .unwrap()
    .and_hms_opt(h, 0, 0)
    .unwrap()
}

fn habit_for(user_id: i64, name: &str, periodicity: Periodicity) -> NewHabit {
  NewHabit {
    user_id: Some(user_id),
    name: name.to_owned(),
    description: "x".to_owned(),
    periodicity,
    created_at: Some(dt(2025, 1, 1, 10)),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_and_list() {
  let s = store().await;

  let alice = s.create_user("alice").await.unwrap();
  assert_eq!(alice.username, "alice");

  let users = s.list_users().await.unwrap();
  assert_eq!(users.len(), 1);
  assert_eq!(users[0].id, alice.id);
  assert_eq!(users[0].username, "alice");
}

#[tokio::test]
async fn create_user_through_trait_with_borrowed_name() {
  // Generic call site: the returned future borrows both the store and the
  // username, so the trait signature must tie the two lifetimes together.
  async fn create_via<S: HabitStore>(
    store: &S,
    username: &str,
  ) -> Result<cadence_core::user::User, S::Error> {
    store.create_user(username).await
  }

  let s = store().await;
  let name = String::from("borrowed");
  let user = create_via(&s, &name).await.unwrap();
  assert_eq!(user.username, "borrowed");
}

#[tokio::test]
async fn username_unique_constraint() {
  let s = store().await;
  s.create_user("alice").await.unwrap();
  assert!(s.create_user("alice").await.is_err());
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(42).await.unwrap().is_none());
}

#[tokio::test]
async fn ensure_default_user_is_stable() {
  let s = store().await;

  let first = s.ensure_default_user().await.unwrap();
  assert_eq!(first.username, "default_user");

  // A second call returns the same account instead of creating another.
  let again = s.ensure_default_user().await.unwrap();
  assert_eq!(again.id, first.id);
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn ensure_default_user_prefers_existing_account() {
  let s = store().await;
  let alice = s.create_user("alice").await.unwrap();
  assert_eq!(s.ensure_default_user().await.unwrap().id, alice.id);
}

// ─── Habits ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_habit_for_specific_user() {
  let s = store().await;
  let u1 = s.create_user("u1").await.unwrap();
  let u2 = s.create_user("u2").await.unwrap();

  s.create_habit(habit_for(u1.id, "H1", Periodicity::Daily))
    .await
    .unwrap();
  s.create_habit(habit_for(u2.id, "H2", Periodicity::Weekly))
    .await
    .unwrap();

  let habits_u1 = s.list_habits(Some(u1.id)).await.unwrap();
  let habits_u2 = s.list_habits(Some(u2.id)).await.unwrap();

  assert_eq!(habits_u1.len(), 1);
  assert_eq!(habits_u1[0].name, "H1");
  assert_eq!(habits_u2.len(), 1);
  assert_eq!(habits_u2[0].name, "H2");
}

#[tokio::test]
async fn habit_name_unique_per_owner() {
  let s = store().await;
  let u1 = s.create_user("u1").await.unwrap();
  let u2 = s.create_user("u2").await.unwrap();

  s.create_habit(habit_for(u1.id, "Unique", Periodicity::Daily))
    .await
    .unwrap();

  // Same name, same owner: rejected by UNIQUE(user_id, name).
  assert!(
    s.create_habit(habit_for(u1.id, "Unique", Periodicity::Weekly))
      .await
      .is_err()
  );

  // Same name, different owner: fine.
  s.create_habit(habit_for(u2.id, "Unique", Periodicity::Daily))
    .await
    .unwrap();
}

#[tokio::test]
async fn create_habit_for_unknown_user_errors() {
  let s = store().await;
  let err = s
    .create_habit(habit_for(999, "H", Periodicity::Daily))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::UserNotFound(999)));
}

#[tokio::test]
async fn create_habit_without_owner_uses_default_user() {
  let s = store().await;

  let habit = s
    .create_habit(NewHabit::new("H", "x", Periodicity::Daily))
    .await
    .unwrap();

  let default = s.ensure_default_user().await.unwrap();
  assert_eq!(habit.user_id, default.id);
}

#[tokio::test]
async fn get_habit_roundtrips_fields() {
  let s = store().await;
  let u = s.create_user("u1").await.unwrap();

  let created = s
    .create_habit(habit_for(u.id, "Stretch", Periodicity::Weekly))
    .await
    .unwrap();
  let fetched = s.get_habit(created.id.unwrap()).await.unwrap().unwrap();

  assert_eq!(fetched.name, "Stretch");
  assert_eq!(fetched.periodicity, Periodicity::Weekly);
  assert_eq!(fetched.created_at, dt(2025, 1, 1, 10));
}

// ─── Completions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_completion_per_period_daily() {
  let s = store().await;
  let u = s.create_user("u1").await.unwrap();
  let h = s
    .create_habit(habit_for(u.id, "Daily", Periodicity::Daily))
    .await
    .unwrap();
  let hid = h.id.unwrap();
  let created = dt(2025, 1, 1, 10);

  // Same calendar day, different hours: only the first insert lands.
  let first = s
    .add_completion(hid, Some(created + TimeDelta::hours(1)))
    .await
    .unwrap();
  assert!(first.is_some());

  let second = s
    .add_completion(hid, Some(created + TimeDelta::hours(5)))
    .await
    .unwrap();
  assert!(second.is_none());

  // Next day is a new period.
  let next_day = s
    .add_completion(hid, Some(created + TimeDelta::days(1) + TimeDelta::hours(1)))
    .await
    .unwrap();
  assert!(next_day.is_some());

  assert_eq!(s.list_completions(Some(hid)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn one_completion_per_period_weekly() {
  let s = store().await;
  let u = s.create_user("u1").await.unwrap();
  let h = s
    .create_habit(habit_for(u.id, "Weekly", Periodicity::Weekly))
    .await
    .unwrap();
  let hid = h.id.unwrap();
  let created = dt(2025, 1, 1, 10);

  assert!(
    s.add_completion(hid, Some(created + TimeDelta::days(1)))
      .await
      .unwrap()
      .is_some()
  );
  // Day 5 is still week 0.
  assert!(
    s.add_completion(hid, Some(created + TimeDelta::days(5)))
      .await
      .unwrap()
      .is_none()
  );
  // Day 7 starts week 1.
  assert!(
    s.add_completion(hid, Some(created + TimeDelta::days(7)))
      .await
      .unwrap()
      .is_some()
  );
}

#[tokio::test]
async fn checkoff_missing_habit_errors() {
  let s = store().await;
  let err = s.add_completion(99, None).await.unwrap_err();
  assert!(matches!(err, crate::Error::HabitNotFound(99)));
}

#[tokio::test]
async fn list_completions_is_ordered_by_timestamp() {
  let s = store().await;
  let u = s.create_user("u1").await.unwrap();
  let h = s
    .create_habit(habit_for(u.id, "Daily", Periodicity::Daily))
    .await
    .unwrap();
  let hid = h.id.unwrap();
  let created = dt(2025, 1, 1, 10);

  // Insert out of chronological order.
  s.add_completion(hid, Some(created + TimeDelta::days(2)))
    .await
    .unwrap();
  s.add_completion(hid, Some(created))
    .await
    .unwrap();
  s.add_completion(hid, Some(created + TimeDelta::days(1)))
    .await
    .unwrap();

  let comps = s.list_completions(Some(hid)).await.unwrap();
  let stamps: Vec<_> = comps.iter().map(|c| c.completed_at).collect();
  let mut sorted = stamps.clone();
  sorted.sort();
  assert_eq!(stamps, sorted);
}

// ─── Cascade deletes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn user_delete_cascades_habits_and_completions() {
  let s = store().await;
  let u = s.create_user("u1").await.unwrap();
  let h = s
    .create_habit(habit_for(u.id, "H", Periodicity::Daily))
    .await
    .unwrap();
  let hid = h.id.unwrap();
  s.add_completion(hid, None).await.unwrap();

  assert_eq!(s.list_habits(Some(u.id)).await.unwrap().len(), 1);
  assert_eq!(s.list_completions(Some(hid)).await.unwrap().len(), 1);

  s.delete_user(u.id).await.unwrap();

  assert!(s.list_habits(Some(u.id)).await.unwrap().is_empty());
  assert!(s.list_completions(Some(hid)).await.unwrap().is_empty());
}

#[tokio::test]
async fn habit_delete_cascades_completions() {
  let s = store().await;
  let u = s.create_user("u1").await.unwrap();
  let h = s
    .create_habit(habit_for(u.id, "H", Periodicity::Daily))
    .await
    .unwrap();
  let hid = h.id.unwrap();
  s.add_completion(hid, None).await.unwrap();

  s.delete_habit(hid).await.unwrap();

  assert!(s.get_habit(hid).await.unwrap().is_none());
  assert!(s.list_completions(Some(hid)).await.unwrap().is_empty());
  // The owner survives.
  assert!(s.get_user(u.id).await.unwrap().is_some());
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_if_empty_populates_once() {
  let s = store().await;

  s.seed_if_empty().await.unwrap();
  let habits = s.list_habits(None).await.unwrap();
  assert_eq!(habits.len(), 5);
  assert!(!s.list_completions(None).await.unwrap().is_empty());

  // Second run is a no-op.
  s.seed_if_empty().await.unwrap();
  assert_eq!(s.list_habits(None).await.unwrap().len(), 5);
}

#[tokio::test]
async fn seeded_data_yields_nonzero_streaks() {
  let s = store().await;
  s.seed_if_empty().await.unwrap();

  let habits = s.list_habits(None).await.unwrap();
  let comps = s.list_completions(None).await.unwrap();

  let (_, streak) = analytics::longest_streak_overall(&habits, &comps).unwrap();
  assert!(streak >= 4);
}

// ─── Analytics over a stored snapshot ────────────────────────────────────────

#[tokio::test]
async fn streak_from_persisted_completions() {
  let s = store().await;
  let u = s.create_user("u1").await.unwrap();
  let h = s
    .create_habit(habit_for(u.id, "Daily", Periodicity::Daily))
    .await
    .unwrap();
  let hid = h.id.unwrap();
  let created = dt(2025, 1, 1, 10);

  // Days 0, 1, 2 complete, day 3 missed, day 4 complete.
  for day in [0, 1, 2, 4] {
    s.add_completion(hid, Some(created + TimeDelta::days(day)))
      .await
      .unwrap();
  }

  let habit = s.get_habit(hid).await.unwrap().unwrap();
  let comps = s.list_completions(Some(hid)).await.unwrap();
  assert_eq!(analytics::longest_streak_for(&habit, &comps), 3);
}
