use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client for {url}: {source}")]
    BuildClientFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid proxy '{url}': {source}")]
    ProxyRejected {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
