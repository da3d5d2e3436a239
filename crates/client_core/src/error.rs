use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to build http client: {0}")]
    Setup(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

