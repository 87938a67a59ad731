//! Core types and trait definitions for the Cadence habit tracker.
//!
//! This crate is deliberately free of database and I/O dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod analytics;
pub mod completion;
pub mod error;
pub mod habit;
pub mod period;
pub mod store;
pub mod user;

pub use error::{Error, Result};
