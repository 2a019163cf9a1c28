//! Semantic passage retrieval.

use std::sync::Arc;

use scripture_embeddings::{
    EmbeddingProvider, SimilarityResult, count_dimension_mismatches, rank_records,
};
use scripture_protocol::{ConversationTurn, Passage, recent_turns_text};
use tracing::{debug, error, warn};

use crate::config::QueryConfig;
use crate::error::{Result, RetrievalError};
use crate::store::CorpusStore;

/// Ranks a corpus's cached embeddings against a live query.
///
/// The retriever only reads the [`CorpusStore`], so one instance can
/// serve concurrent queries for different corpora.
pub struct SemanticRetriever {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<CorpusStore>,
    config: QueryConfig,
}

impl SemanticRetriever {
    /// Create a retriever over a loaded store.
    ///
    /// `provider` must be the one the corpus embeddings were generated
    /// with so that query and passage vectors share a dimension.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: Arc<CorpusStore>) -> Result<Self> {
        if !provider.is_available() {
            return Err(RetrievalError::EmbeddingUnavailable(
                provider.name().to_string(),
            ));
        }
        Ok(Self {
            provider,
            store,
            config: QueryConfig::default(),
        })
    }

    /// Set the query configuration.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    /// Search with the configured `top_k`.
    pub async fn search_default(
        &self,
        corpus_id: &str,
        query: &str,
        history: &[ConversationTurn],
    ) -> Vec<Passage> {
        self.search(corpus_id, query, history, self.config.top_k)
            .await
    }

    /// Return at most `top_k` passages scoring above the threshold, best
    /// first.
    ///
    /// Returns an empty list when the corpus has no embeddings or the
    /// query cannot be embedded.
    pub async fn search(
        &self,
        corpus_id: &str,
        query: &str,
        history: &[ConversationTurn],
        top_k: usize,
    ) -> Vec<Passage> {
        let records = self.store.records(corpus_id);
        if records.is_empty() {
            warn!("No embeddings found for {corpus_id}. Returning empty results.");
            return Vec::new();
        }

        let augmented = augment_query(query, history, self.config.history_turns);
        debug!("Embedding query for {corpus_id}: {augmented}");

        let query_embedding = match self.provider.embed_one(&augmented).await {
            Ok(embedding) => embedding,
            Err(err) => {
                error!("Error in semantic search for {corpus_id}: {err}");
                return Vec::new();
            }
        };

        let mismatched = count_dimension_mismatches(&query_embedding, records);
        if mismatched > 0 {
            warn!(
                "{mismatched} of {} embeddings for {corpus_id} do not match the query dimension {}; scored as 0.0",
                records.len(),
                query_embedding.len()
            );
        }

        let ranked = rank_records(&query_embedding, records);
        select_top_k(ranked, top_k, self.config.min_score)
            .into_iter()
            .map(|result| result.passage)
            .collect()
    }
}

/// Prepend the last `turns` history messages to the query.
pub fn augment_query(query: &str, history: &[ConversationTurn], turns: usize) -> String {
    if history.is_empty() {
        return query.to_string();
    }
    format!("{} {query}", recent_turns_text(history, turns))
}

/// Truncate ranked results to `top_k`, then keep scores above `min_score`.
///
/// Truncation happens first, so the threshold can only shorten the list.
pub fn select_top_k(
    ranked: Vec<SimilarityResult>,
    top_k: usize,
    min_score: f64,
) -> Vec<SimilarityResult> {
    ranked
        .into_iter()
        .take(top_k)
        .filter(|result| result.score > min_score)
        .collect()
}
