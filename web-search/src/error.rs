//! Error types for web search.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors from a single provider attempt.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The provider answered with a non-success status.
    #[error("{provider} search failed: {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    /// A CSS selector failed to parse.
    #[error("invalid selector: {0}")]
    Selector(String),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
