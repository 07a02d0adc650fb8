// File: ./src/client/error.rs
use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("tls setup failed: {0}")]
    Tls(String),
    #[error("could not build request: {0}")]
    Request(#[from] http::Error),
    #[error("connection failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
    #[error("reading response failed: {0}")]
    Body(#[from] hyper::Error),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server returned no list")]
    MissingList,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
            || matches!(self, ApiError::MissingList)
    }
}
