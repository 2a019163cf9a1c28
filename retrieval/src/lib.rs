//! # Retrieval Engine
//!
//! Semantic passage retrieval over per-corpus embedding caches.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Retrieval Engine                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  CorpusSource ──► CorpusStore ◄── EmbeddingCacheStore           │
//! │  (<id>.json)          │  ▲             ▲                        │
//! │                       │  └── EmbeddingGenerator (startup only)  │
//! │                       ▼                                         │
//! │  query + history ──► SemanticRetriever ──► ranked passages      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scripture_retrieval::{CorpusStore, RetrievalConfig, SemanticRetriever};
//!
//! let provider = Arc::new(OpenAIProvider::new());
//! let mut store = CorpusStore::new(&RetrievalConfig::default(), provider.clone())?;
//! store.load_corpus("bible").await;
//!
//! let retriever = SemanticRetriever::new(provider, Arc::new(store))?;
//! let passages = retriever.search("bible", "What is love?", &[], 5).await;
//! ```

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod format;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::{QueryConfig, RetrievalConfig};
pub use corpus::CorpusSource;
pub use engine::{SemanticRetriever, augment_query, select_top_k};
pub use error::{Result, RetrievalError};
pub use format::format_passages_for_prompt;
pub use store::{CorpusStore, LoadedCorpus};

// Re-export from dependencies for convenience
pub use scripture_embeddings::{EmbeddingProvider, OpenAIProvider, RegenerationPlan};
pub use scripture_protocol::{ConversationTurn, Passage, Role};
