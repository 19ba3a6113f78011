//! Turns grouped outcomes into a report for people or machines.
mod console;
mod json;


use std::collections::BTreeMap;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::args::HttpMethod;
use crate::config::TargetSpec;
use crate::http::body_text;
use crate::race::{OutcomeGroup, RaceOutcome, RunStats};

pub use console::{print_runtime_errors, write_text};
pub use json::render_json;

/// The complete result of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceReport {
    pub summary: ReportSummary,
    pub responses: Vec<GroupReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub targets: usize,
    pub requests_per_target: usize,
    pub dispatched: usize,
    pub completed: usize,
    pub failed: usize,
    pub unique_responses: usize,
    pub started_at: String,
    pub finished_at: String,
    pub elapsed_ms: u64,
}

/// One unique outcome and the targets that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    pub response: ResponseReport,
    pub count: usize,
    pub similar: usize,
    pub requests: Vec<RequestReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseReport {
    pub body: String,
    /// The exemplar body exactly as received, for the text dump.
    #[serde(skip)]
    pub body_bytes: Vec<u8>,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    pub protocol: String,
    pub headers: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestReport {
    pub method: HttpMethod,
    pub url: String,
    pub body: String,
    pub cookies: Vec<String>,
    pub headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    pub redirects: bool,
}

/// Builds the report for a finished run. The normalized proxy is echoed on
/// every request entry so each group reads on its own.
#[must_use]
pub fn build_report(outcome: &RaceOutcome) -> RaceReport {
    let proxy = outcome.proxy.as_ref().map(Url::as_str);
    RaceReport {
        summary: summarize(&outcome.stats, outcome.groups.len()),
        responses: outcome
            .groups
            .iter()
            .map(|group| group_report(group, proxy))
            .collect(),
        errors: outcome.errors.iter().map(ToString::to_string).collect(),
    }
}

fn summarize(stats: &RunStats, unique_responses: usize) -> ReportSummary {
    ReportSummary {
        targets: stats.targets,
        requests_per_target: stats.requests_per_target,
        dispatched: stats.dispatched,
        completed: stats.completed,
        failed: stats.failed,
        unique_responses,
        started_at: stats.started_at.to_rfc3339(),
        finished_at: stats.finished_at.to_rfc3339(),
        elapsed_ms: u64::try_from(stats.elapsed.as_millis()).unwrap_or(u64::MAX),
    }
}

fn group_report(group: &OutcomeGroup, proxy: Option<&str>) -> GroupReport {
    let head = &group.exemplar.head;
    GroupReport {
        response: ResponseReport {
            body: body_text(&group.exemplar.body).into_owned(),
            body_bytes: group.exemplar.body.clone(),
            status_code: head.status_code,
            length: head.content_length,
            protocol: head.protocol.clone(),
            headers: head.headers.clone(),
            location: head.location.clone(),
        },
        count: group.count,
        similar: group.similar(),
        requests: group
            .targets
            .iter()
            .map(|spec| request_report(spec, proxy))
            .collect(),
    }
}

fn request_report(spec: &TargetSpec, proxy: Option<&str>) -> RequestReport {
    RequestReport {
        method: spec.method,
        url: spec.url.clone(),
        body: spec.body.clone(),
        cookies: spec.cookies.clone(),
        headers: spec.headers.clone(),
        proxy: proxy.map(str::to_owned),
        redirects: spec.redirects,
    }
}
