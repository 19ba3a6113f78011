use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::args::HttpMethod;

/// Repetitions per target when the configuration leaves `count` unset or zero.
pub const DEFAULT_COUNT: usize = 100;

/// Upper bound on a single request, connection setup through body read.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// A complete race test: how often to hit every target, and how.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RaceConfig {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
}

/// One request template. Equality is structural over every field, with
/// cookie and header lists compared in order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct TargetSpec {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub cookies: Vec<String>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub redirects: bool,
}

impl RaceConfig {
    /// Fills in `count` when it was left at zero.
    pub const fn apply_defaults(&mut self) {
        if self.count == 0 {
            self.count = DEFAULT_COUNT;
        }
    }

    #[must_use]
    pub const fn effective_count(&self) -> usize {
        if self.count == 0 {
            DEFAULT_COUNT
        } else {
            self.count
        }
    }

    /// The configured proxy, treating a blank string as no proxy.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.proxy
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

impl TargetSpec {
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: String::new(),
            cookies: Vec::new(),
            headers: Vec::new(),
            redirects: false,
        }
    }
}
