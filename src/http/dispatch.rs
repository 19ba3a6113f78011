use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use reqwest::Client;
use tokio::sync::{Semaphore, mpsc};
use tracing::debug;

use crate::error::{AppResult, RaceError};
use crate::race::{AttackPlan, PreparedTarget};

use super::client::build_target_client;
use super::request::build_request;
use super::response::{ExecutionOutcome, ResponseRecord};

/// Everything the burst produced, collected after the last execution ended.
#[derive(Debug)]
pub struct Dispatched {
    pub records: Vec<ResponseRecord>,
    pub errors: Vec<RaceError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Fires `count` concurrent executions of every target and waits for all of
/// them.
///
/// Executions are numbered `target_position * count + repetition`. Each task
/// builds its request first and then waits on a shared gate, which opens
/// once every task exists, so the sends leave as close together as the
/// runtime allows.
///
/// # Errors
///
/// Returns an error when a target's client cannot be built. Failures of
/// individual executions are collected in [`Dispatched::errors`].
pub async fn dispatch(plan: &AttackPlan) -> AppResult<Dispatched> {
    let clients = plan
        .targets
        .iter()
        .map(|target| build_target_client(target, plan.proxy.as_ref(), plan.timeout))
        .collect::<AppResult<Vec<_>>>()?;

    let total = plan.total_requests();
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<ExecutionOutcome>(total.max(1));
    let gate = Arc::new(Semaphore::new(0));
    let mut handles = Vec::with_capacity(total);

    let started_at = Utc::now();
    let start = Instant::now();

    for (position, (target, client)) in plan.targets.iter().zip(clients).enumerate() {
        if plan.verbose {
            debug!(
                "Sending {} {} requests to {}",
                plan.count, target.spec.method, target.spec.url
            );
            if !target.spec.body.is_empty() {
                debug!("Request body: {}", target.spec.body);
            }
            if !target.spec.cookies.is_empty() {
                debug!("Request cookies: {:?}", target.spec.cookies);
            }
        }
        for repetition in 0..plan.count {
            let index = position.saturating_mul(plan.count).saturating_add(repetition);
            let task = Execution {
                index,
                target: Arc::clone(target),
                client: client.clone(),
                gate: Arc::clone(&gate),
                outcome_tx: outcome_tx.clone(),
            };
            handles.push((index, tokio::spawn(task.run())));
        }
    }
    drop(outcome_tx);
    gate.add_permits(total);

    let (indices, joins): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
    let joined = join_all(joins).await;

    let mut errors = Vec::new();
    for (index, result) in indices.into_iter().zip(joined) {
        if let Err(source) = result {
            errors.push(RaceError::TaskAborted { index, source });
        }
    }

    let mut records = Vec::with_capacity(total);
    while let Some(outcome) = outcome_rx.recv().await {
        match outcome {
            ExecutionOutcome::Completed(record) => {
                if record.redirect_intercepted {
                    debug!(
                        "Request #{}: Redirect not followed to: {}",
                        record.index,
                        record.head.location.as_deref().unwrap_or("<none>")
                    );
                }
                records.push(*record);
            }
            ExecutionOutcome::Failed(err) => errors.push(err),
        }
    }
    errors.sort_by_key(RaceError::index);

    Ok(Dispatched {
        records,
        errors,
        started_at,
        finished_at: Utc::now(),
        elapsed: start.elapsed(),
    })
}

struct Execution {
    index: usize,
    target: Arc<PreparedTarget>,
    client: Client,
    gate: Arc<Semaphore>,
    outcome_tx: mpsc::Sender<ExecutionOutcome>,
}

impl Execution {
    async fn run(self) {
        let outcome = self.execute().await;
        // Capacity covers every execution, so this never waits.
        drop(self.outcome_tx.send(outcome).await);
    }

    async fn execute(&self) -> ExecutionOutcome {
        let url = match self.target.url.as_ref() {
            Ok(url) => url.clone(),
            Err(source) => {
                return ExecutionOutcome::Failed(RaceError::InvalidUrl {
                    index: self.index,
                    url: self.target.spec.url.clone(),
                    source: *source,
                });
            }
        };

        let request = match build_request(&self.client, &self.target, url) {
            Ok(request) => request,
            Err(source) => {
                return ExecutionOutcome::Failed(RaceError::BuildRequest {
                    index: self.index,
                    source,
                });
            }
        };

        drop(self.gate.acquire().await);

        match self.client.execute(request).await {
            Ok(response) => {
                let intercepted =
                    response.status().is_redirection() && !self.target.spec.redirects;
                let record = ResponseRecord::capture(
                    self.index,
                    Arc::clone(&self.target.spec),
                    response,
                    intercepted,
                )
                .await;
                ExecutionOutcome::Completed(Box::new(record))
            }
            Err(source) => ExecutionOutcome::Failed(RaceError::Request {
                index: self.index,
                source,
            }),
        }
    }
}
