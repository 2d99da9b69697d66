//! Events-search error types

use thiserror::Error;

/// Errors from the events backend
///
/// These never leave [`super::EventSearchClient::search`]; they are logged and
/// the search resolves to no events.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Events backend unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to decode events response: {0}")]
    Decode(#[from] serde_json::Error),
}
