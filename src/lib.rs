//! Race condition tester for web applications.
//!
//! A run fires `count` near-simultaneous executions of every configured
//! target request, waits for all of them, and groups the responses into
//! unique outcomes. More than one outcome for a request that should be
//! idempotent points at a race window on the server.
//!
//! The [`run_race_test`] entry point drives the engine; the `race-the-web`
//! binary wraps it with a console report and an HTTP control surface.
pub mod args;
pub mod config;
pub mod control;
pub mod error;
pub mod http;
pub mod race;
pub mod report;

mod entry;
mod system;

pub use entry::run;
pub use race::{RaceOutcome, run_race_test};
