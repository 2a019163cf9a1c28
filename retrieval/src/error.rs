//! Error types for passage retrieval.

use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur in the retrieval engine.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// No embedding capability at all; retrieval cannot run.
    #[error("embedding provider {0} is not available")]
    EmbeddingUnavailable(String),

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] scripture_embeddings::EmbeddingError),

    /// Corpus data file could not be parsed.
    #[error("invalid corpus data: {0}")]
    InvalidCorpus(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
