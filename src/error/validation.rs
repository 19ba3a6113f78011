use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No targets set. Minimum of 1 target required.")]
    NoTargetsConfigured,
    #[error("Invalid cookie format: '{value}'. Expected 'name=value'")]
    InvalidCookieFormat { value: String },
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Invalid header name '{header}': {source}")]
    InvalidHeaderName {
        header: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },
    #[error("Invalid header value for '{header}': {source}")]
    InvalidHeaderValue {
        header: String,
        #[source]
        source: http::header::InvalidHeaderValue,
    },
    #[error("Invalid request method '{value}'. Use GET, POST, PUT, or HEAD.")]
    InvalidMethod { value: String },
    #[error("Invalid proxy URL '{url}': {source}")]
    InvalidProxyUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(
        "Proxy must be an http or https proxy, and specify the proper scheme (e.g. \"http://127.0.0.1:8080\"), got '{scheme}'."
    )]
    InvalidProxyScheme { scheme: String },
    #[error("Missing configuration (pass a config file or create race.toml).")]
    MissingConfig,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
