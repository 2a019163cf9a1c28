//! Configuration for passage retrieval.

use std::path::PathBuf;

use scripture_embeddings::GeneratorConfig;
use serde::{Deserialize, Serialize};

/// Passages returned per query unless overridden.
pub const DEFAULT_TOP_K: usize = 5;

/// Scores must be strictly above this to be returned.
pub const DEFAULT_MIN_SCORE: f64 = 0.3;

/// Conversation turns prepended to the query before embedding.
pub const DEFAULT_HISTORY_TURNS: usize = 3;

/// Configuration for the retrieval engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Directory holding `<corpus>.json` passage files.
    pub data_dir: PathBuf,

    /// Directory holding `<corpus>_embeddings.json` cache files.
    pub cache_dir: PathBuf,

    /// Query processing configuration.
    pub query: QueryConfig,

    /// Embedding generation configuration.
    pub generator: GeneratorConfig,
}

impl RetrievalConfig {
    /// Create a new configuration with default values.
    pub fn new(data_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache_dir: cache_dir.into(),
            query: QueryConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }

    /// Set the query configuration.
    pub fn with_query(mut self, config: QueryConfig) -> Self {
        self.query = config;
        self
    }

    /// Set the generator configuration.
    pub fn with_generator(mut self, config: GeneratorConfig) -> Self {
        self.generator = config;
        self
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self::new("data", "cache")
    }
}

/// Configuration for query processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Maximum number of passages to return.
    pub top_k: usize,

    /// Minimum similarity score (exclusive).
    pub min_score: f64,

    /// How many recent turns augment the query.
    pub history_turns: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
            history_turns: DEFAULT_HISTORY_TURNS,
        }
    }
}
