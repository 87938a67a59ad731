//! User — the owner of a set of habits.
//!
//! The CLI runs single-user against a default account; the model is kept
//! explicit so multi-user front ends need no schema change. Deleting a user
//! cascades to its habits and their completions (store concern).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:         i64,
  pub username:   String,
  pub created_at: NaiveDateTime,
}
