use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Response;
use reqwest::header::{CONTENT_LENGTH, HeaderMap, LOCATION};

use crate::config::TargetSpec;
use crate::error::RaceError;

/// Response metadata captured once the status line and headers arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status_code: u16,
    pub protocol: String,
    pub headers: BTreeMap<String, Vec<String>>,
    /// Advertised `Content-Length`; `None` when absent or unparseable.
    pub content_length: Option<u64>,
    /// Redirect target, resolved against the request URL.
    pub location: Option<String>,
}

/// One completed request execution.
#[derive(Debug)]
pub struct ResponseRecord {
    pub index: usize,
    pub origin: Arc<TargetSpec>,
    pub head: ResponseHead,
    pub body: Result<Vec<u8>, reqwest::Error>,
    /// A 3xx answer that was returned instead of followed.
    pub redirect_intercepted: bool,
}

/// How a single execution ended.
#[derive(Debug)]
pub enum ExecutionOutcome {
    Completed(Box<ResponseRecord>),
    Failed(RaceError),
}

impl ResponseHead {
    pub(crate) fn from_response(response: &Response) -> Self {
        let headers = response.headers();
        Self {
            status_code: response.status().as_u16(),
            protocol: format!("{:?}", response.version()),
            headers: collect_headers(headers),
            content_length: headers
                .get(CONTENT_LENGTH)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok()),
            location: headers
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(|value| {
                    response
                        .url()
                        .join(value)
                        .map_or_else(|_| value.to_owned(), |url| url.to_string())
                }),
        }
    }
}

impl ResponseRecord {
    /// Reads the body to completion. A body that fails mid-stream is kept
    /// as an error so the record can be dropped during grouping.
    pub(crate) async fn capture(
        index: usize,
        origin: Arc<TargetSpec>,
        response: Response,
        redirect_intercepted: bool,
    ) -> Self {
        let head = ResponseHead::from_response(&response);
        let body = response.bytes().await.map(|bytes| bytes.to_vec());
        Self {
            index,
            origin,
            head,
            body,
            redirect_intercepted,
        }
    }

    #[cfg(test)]
    pub(crate) fn completed(
        index: usize,
        origin: Arc<TargetSpec>,
        head: ResponseHead,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            index,
            origin,
            head,
            body: Ok(body.into()),
            redirect_intercepted: false,
        }
    }
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut collected: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        collected
            .entry(name.as_str().to_owned())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    collected
}

/// Body bytes as text, replacing invalid UTF-8.
#[must_use]
pub fn body_text(body: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(body)
}
