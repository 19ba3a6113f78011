use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::args::{HttpMethod, parse_cookie, parse_header};
use crate::config::{RaceConfig, TargetSpec};
use crate::error::{AppError, AppResult, ValidationError};

use super::target::{PreparedTarget, TargetCookieStore};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Everything the dispatcher needs, validated before the first byte is sent.
#[derive(Debug)]
pub struct AttackPlan {
    pub count: usize,
    pub proxy: Option<Url>,
    pub timeout: Duration,
    pub verbose: bool,
    pub targets: Vec<Arc<PreparedTarget>>,
}

impl AttackPlan {
    #[must_use]
    pub fn total_requests(&self) -> usize {
        self.count.saturating_mul(self.targets.len())
    }
}

/// Validates the configuration and derives per-target state.
///
/// A target whose URL does not parse is kept; each of its executions fails
/// on its own at dispatch time.
///
/// # Errors
///
/// Returns a validation error when no targets are configured, a cookie or
/// header is malformed, or the proxy is unusable.
pub fn prepare_attack(config: &RaceConfig) -> AppResult<AttackPlan> {
    if config.targets.is_empty() {
        return Err(AppError::validation(ValidationError::NoTargetsConfigured));
    }

    let proxy = config.proxy().map(normalize_proxy).transpose()?;
    if let Some(proxy_url) = proxy.as_ref() {
        debug!("Routing requests through proxy {}", proxy_url);
    }

    let targets = config
        .targets
        .iter()
        .map(|spec| prepare_target(spec).map(Arc::new))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(AttackPlan {
        count: config.effective_count(),
        proxy,
        timeout: config.request_timeout(),
        verbose: config.verbose,
        targets,
    })
}

fn prepare_target(spec: &TargetSpec) -> AppResult<PreparedTarget> {
    let cookies = spec
        .cookies
        .iter()
        .map(|cookie| parse_cookie(cookie))
        .collect::<Result<Vec<_>, _>>()?;

    let url = Url::parse(&spec.url);
    if let Err(err) = url.as_ref() {
        warn!("Target URL {} will not be requested: {}", spec.url, err);
    }

    let cookie_store = TargetCookieStore::from_pairs(url.as_ref().ok(), &cookies);
    let headers = build_headers(spec)?;

    Ok(PreparedTarget {
        spec: Arc::new(spec.clone()),
        url,
        headers,
        cookie_store: Arc::new(cookie_store),
    })
}

fn build_headers(spec: &TargetSpec) -> Result<HeaderMap, ValidationError> {
    let mut headers = HeaderMap::new();

    if !spec.cookies.is_empty() {
        let joined = spec.cookies.join(";");
        let value =
            HeaderValue::from_str(&joined).map_err(|source| ValidationError::InvalidHeaderValue {
                header: COOKIE.as_str().to_owned(),
                source,
            })?;
        headers.append(COOKIE, value);
    }

    for raw in &spec.headers {
        let (key, value) = parse_header(raw)?;
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|source| {
            ValidationError::InvalidHeaderName {
                header: key.clone(),
                source,
            }
        })?;
        let value =
            HeaderValue::from_str(&value).map_err(|source| ValidationError::InvalidHeaderValue {
                header: key.clone(),
                source,
            })?;
        headers.append(name, value);
    }

    if spec.method == HttpMethod::Post && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
    }

    Ok(headers)
}

/// Accepts `host:port` shorthand by assuming `http://`, then requires an
/// http or https scheme.
///
/// # Errors
///
/// Returns an error when the proxy does not parse as a URL or names a
/// scheme other than http or https.
pub fn normalize_proxy(raw: &str) -> Result<Url, ValidationError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("http://{}", trimmed)
    };
    let url = Url::parse(&candidate).map_err(|source| ValidationError::InvalidProxyUrl {
        url: raw.to_owned(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::InvalidProxyScheme {
            scheme: other.to_owned(),
        }),
    }
}
