use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Failed to bind control listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize {context}: {source}")]
    Serialize {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error during {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}
