//! Client construction errors and transport error mapping

use hhmap_core::{FetchError, SubmitError};

/// Errors while building an [`crate::ApiClient`]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Base URL is empty or not http(s)
    #[error("invalid base url '{0}'")]
    InvalidBaseUrl(String),

    /// Underlying HTTP client could not be created
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result alias for client construction
pub type Result<T> = std::result::Result<T, ClientError>;

pub(crate) fn fetch_transport(e: &reqwest::Error) -> FetchError {
    match e.status() {
        Some(status) => FetchError::Status {
            status: status.as_u16(),
        },
        None => FetchError::Network(e.to_string()),
    }
}

pub(crate) fn submit_transport(e: &reqwest::Error) -> SubmitError {
    if e.is_decode() {
        return SubmitError::Decode(e.to_string());
    }
    match e.status() {
        Some(status) => SubmitError::Status {
            status: status.as_u16(),
        },
        None => SubmitError::Network(e.to_string()),
    }
}
