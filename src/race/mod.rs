//! The race test engine: prepare targets, fire the burst, group what came
//! back.
mod group;
mod prepare;
mod target;

#[cfg(test)]
mod tests;

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Url;
use tracing::{debug, info};

use crate::config::RaceConfig;
use crate::error::{AppResult, RaceError};
use crate::http::dispatch;

pub use group::{OutcomeGroup, ResponseGrouper, ResponseSnapshot, group_responses};
pub use prepare::{AttackPlan, normalize_proxy, prepare_attack};
pub use target::{PreparedTarget, TargetCookieStore};

/// Counters and timings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub targets: usize,
    pub requests_per_target: usize,
    pub dispatched: usize,
    pub completed: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// The grouped outcomes of a run plus every non-fatal error, in execution
/// order.
#[derive(Debug)]
pub struct RaceOutcome {
    pub groups: Vec<OutcomeGroup>,
    pub errors: Vec<RaceError>,
    pub stats: RunStats,
    /// The proxy every request went through, after scheme defaulting.
    pub proxy: Option<Url>,
}

impl RaceOutcome {
    /// Responses that made it into a group.
    #[must_use]
    pub fn grouped_responses(&self) -> usize {
        self.groups.iter().map(|group| group.count).sum()
    }
}

/// Runs one race test end to end.
///
/// Configuration problems abort the run before any request is sent.
/// Anything that goes wrong with an individual request lands in
/// [`RaceOutcome::errors`] instead.
///
/// # Errors
///
/// Returns an error when the configuration is invalid or an HTTP client
/// cannot be constructed.
pub async fn run_race_test(config: &RaceConfig) -> AppResult<RaceOutcome> {
    let plan = prepare_attack(config)?;

    info!("Requests begin.");
    let dispatched = dispatch(&plan).await?;
    info!("Requests completed.");

    let dispatched_total = plan.total_requests();
    let mut errors = dispatched.errors;
    let completed = dispatched.records.len();

    debug!("Unique response comparison begin.");
    let (groups, group_errors) = group_responses(dispatched.records);
    debug!("Unique response comparison complete.");

    errors.extend(group_errors);
    errors.sort_by_key(RaceError::index);

    let stats = RunStats {
        targets: plan.targets.len(),
        requests_per_target: plan.count,
        dispatched: dispatched_total,
        completed,
        failed: errors.len(),
        started_at: dispatched.started_at,
        finished_at: dispatched.finished_at,
        elapsed: dispatched.elapsed,
    };

    Ok(RaceOutcome {
        groups,
        errors,
        stats,
        proxy: plan.proxy,
    })
}
