use thiserror::Error;

/// Failures that cost a single execution or a single response record but
/// never the run as a whole.
#[derive(Debug, Error)]
pub enum RaceError {
    #[error("Error parsing URL {url} for request #{index}: {source}")]
    InvalidUrl {
        index: usize,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Error in forming request #{index}: {source}")]
    BuildRequest {
        index: usize,
        #[source]
        source: reqwest::Error,
    },
    #[error("Error in request #{index}: {source}")]
    Request {
        index: usize,
        #[source]
        source: reqwest::Error,
    },
    #[error("Error reading response body of request #{index}: {source}")]
    BodyRead {
        index: usize,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request task #{index} did not complete: {source}")]
    TaskAborted {
        index: usize,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl RaceError {
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::InvalidUrl { index, .. }
            | Self::BuildRequest { index, .. }
            | Self::Request { index, .. }
            | Self::BodyRead { index, .. }
            | Self::TaskAborted { index, .. } => *index,
        }
    }
}
