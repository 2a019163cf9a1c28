//! # Embeddings
//!
//! Embedding generation, persistence and similarity scoring for passage
//! corpora.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert passages to dense vectors in batches
//! - **Cache Store**: One JSON cache file per corpus, overwritten only after a full pass
//! - **Similarity**: Cosine similarity and stable descending ranking
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► EmbeddingGenerator ──► EmbeddingCacheStore│
//! │       │                                            │            │
//! │       ▼                                            ▼            │
//! │  OpenAI API                            <corpus>_embeddings.json │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod generator;
pub mod provider;
pub mod similarity;

use scripture_protocol::Passage;
use serde::{Deserialize, Serialize};

pub use cache::EmbeddingCacheStore;
pub use error::{EmbeddingError, Result};
pub use generator::{
    BatchOutcome, EmbeddingGenerator, GenerationError, GeneratorConfig, RegenerationPlan,
    collect_records, regeneration_plan,
};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};
pub use similarity::{
    SimilarityResult, checked_cosine_similarity, cosine_similarity, count_dimension_mismatches,
    rank_records,
};

/// A dense vector embedding.
pub type Embedding = Vec<f64>;

/// Default embedding model (OpenAI text-embedding-3-small).
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// A passage together with its embedding.
///
/// This is also the element shape of the per-corpus cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub passage: Passage,
    pub embedding: Embedding,
}

impl EmbeddingRecord {
    pub fn new(passage: Passage, embedding: Embedding) -> Self {
        Self { passage, embedding }
    }
}
