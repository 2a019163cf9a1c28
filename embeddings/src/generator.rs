//! Batch embedding generation for whole corpora.
//!
//! Passages are embedded in fixed-size batches. A failed batch is logged
//! and dropped; the surviving records are written to the cache store in
//! one full overwrite once every batch has been attempted.

use std::sync::Arc;

use scripture_protocol::Passage;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::EmbeddingRecord;
use crate::cache::EmbeddingCacheStore;
use crate::error::EmbeddingError;
use crate::provider::{EmbeddingProvider, EmbeddingRequest};

/// Passages per embedding request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Configuration for the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Passages sent per request.
    pub batch_size: usize,

    /// Model override; the provider's model is used when unset.
    pub model: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            model: None,
        }
    }
}

/// Result of embedding one batch.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Every passage of the batch got a vector.
    Embedded(Vec<EmbeddingRecord>),

    /// The batch was lost.
    Degraded {
        offset: usize,
        size: usize,
        reason: String,
    },
}

/// Fold batch outcomes into the records that survived, in order.
pub fn collect_records(outcomes: impl IntoIterator<Item = BatchOutcome>) -> Vec<EmbeddingRecord> {
    outcomes
        .into_iter()
        .flat_map(|outcome| match outcome {
            BatchOutcome::Embedded(records) => records,
            BatchOutcome::Degraded { .. } => Vec::new(),
        })
        .collect()
}

/// What the startup workflow should do for a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegenerationPlan {
    /// The corpus has no passages.
    Skip,

    /// The cache holds exactly one record per passage.
    ReuseCache,

    /// The cache is missing or stale.
    Generate(String),
}

/// Decide whether a corpus must be re-embedded.
///
/// `cached` is the number of cached records, or `None` when no usable
/// cache exists.
pub fn regeneration_plan(cached: Option<usize>, passage_count: usize) -> RegenerationPlan {
    if passage_count == 0 {
        return RegenerationPlan::Skip;
    }
    match cached {
        None => RegenerationPlan::Generate("no cache found".to_string()),
        Some(count) if count != passage_count => RegenerationPlan::Generate(format!(
            "cache incomplete ({count}/{passage_count} passages)"
        )),
        Some(_) => RegenerationPlan::ReuseCache,
    }
}

/// Embeds corpora and persists them through the cache store.
pub struct EmbeddingGenerator {
    provider: Arc<dyn EmbeddingProvider>,
    store: EmbeddingCacheStore,
    config: GeneratorConfig,
}

impl EmbeddingGenerator {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: EmbeddingCacheStore) -> Self {
        Self {
            provider,
            store,
            config: GeneratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &EmbeddingCacheStore {
        &self.store
    }

    /// Embed every passage of a corpus and overwrite its cache file.
    ///
    /// Failed batches are skipped, so the returned records may be fewer
    /// than `passages`. The only error is a failed cache write, which
    /// still hands back the generated records.
    pub async fn generate(
        &self,
        corpus_id: &str,
        passages: &[Passage],
    ) -> std::result::Result<Vec<EmbeddingRecord>, GenerationError> {
        if passages.is_empty() {
            info!("No passages to generate embeddings for {corpus_id}");
            return Ok(Vec::new());
        }

        info!(
            "Starting embedding generation for {corpus_id} ({} passages)",
            passages.len()
        );

        let batch_size = self.config.batch_size.max(1);
        let mut outcomes = Vec::with_capacity(passages.len().div_ceil(batch_size));
        for (batch_index, batch) in passages.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;
            let outcome = self.embed_batch(offset, batch).await;
            match &outcome {
                BatchOutcome::Embedded(_) => info!(
                    "Generated embeddings for {}/{} passages",
                    offset + batch.len(),
                    passages.len()
                ),
                BatchOutcome::Degraded {
                    offset,
                    size,
                    reason,
                } => error!(
                    "Error generating embeddings for {corpus_id} batch at {offset} ({size} passages): {reason}"
                ),
            }
            outcomes.push(outcome);
        }

        let records = collect_records(outcomes);
        if records.len() < passages.len() {
            error!(
                "Embedding generation for {corpus_id} lost {} of {} passages",
                passages.len() - records.len(),
                passages.len()
            );
        }

        match self.store.save(corpus_id, &records).await {
            Ok(()) => Ok(records),
            Err(source) => Err(GenerationError { records, source }),
        }
    }

    async fn embed_batch(&self, offset: usize, batch: &[Passage]) -> BatchOutcome {
        let texts = batch.iter().map(|p| p.text.clone()).collect();
        let model = self
            .config
            .model
            .clone()
            .unwrap_or_else(|| self.provider.model().to_string());
        let request = EmbeddingRequest::new(texts).with_model(model);

        let degraded = |reason: String| BatchOutcome::Degraded {
            offset,
            size: batch.len(),
            reason,
        };

        match self.provider.embed(request).await {
            Ok(response) if response.embeddings.len() == batch.len() => BatchOutcome::Embedded(
                batch
                    .iter()
                    .cloned()
                    .zip(response.embeddings)
                    .map(|(passage, embedding)| EmbeddingRecord::new(passage, embedding))
                    .collect(),
            ),
            Ok(response) => degraded(
                EmbeddingError::InvalidResponse(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                ))
                .to_string(),
            ),
            Err(err) => degraded(err.to_string()),
        }
    }
}

/// Generated records whose cache write failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to write embeddings cache: {source}")]
pub struct GenerationError {
    /// Records produced before the write failed.
    pub records: Vec<EmbeddingRecord>,

    #[source]
    pub source: EmbeddingError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tempfile::TempDir;

    use crate::error::Result;
    use crate::provider::EmbeddingResponse;

    /// Embeds each text as `[len, 1.0]` and fails the configured calls.
    struct ScriptedProvider {
        calls: Mutex<Vec<usize>>,
        fail_calls: Vec<usize>,
    }

    impl ScriptedProvider {
        fn new(fail_calls: Vec<usize>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_calls,
            }
        }

        fn batch_sizes(&self) -> Vec<usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(request.input.len());
                calls.len() - 1
            };
            if self.fail_calls.contains(&call) {
                return Err(EmbeddingError::ApiRequest("boom".to_string()));
            }
            Ok(EmbeddingResponse {
                embeddings: request
                    .input
                    .iter()
                    .map(|text| vec![text.len() as f64, 1.0])
                    .collect(),
                model: "scripted-model".to_string(),
                tokens_used: None,
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn passages(count: usize) -> Vec<Passage> {
        (0..count)
            .map(|i| Passage::new(format!("Ref {i}"), "x".repeat(i + 1)))
            .collect()
    }

    #[test]
    fn test_regeneration_plan() {
        assert_eq!(regeneration_plan(None, 0), RegenerationPlan::Skip);
        assert_eq!(regeneration_plan(Some(3), 3), RegenerationPlan::ReuseCache);
        assert!(matches!(
            regeneration_plan(None, 3),
            RegenerationPlan::Generate(_)
        ));
        assert!(matches!(
            regeneration_plan(Some(2), 3),
            RegenerationPlan::Generate(_)
        ));
        assert!(matches!(
            regeneration_plan(Some(4), 3),
            RegenerationPlan::Generate(_)
        ));
    }

    #[test]
    fn test_collect_records_drops_degraded_batches() {
        let keep = EmbeddingRecord::new(Passage::new("a", "a"), vec![1.0]);
        let records = collect_records(vec![
            BatchOutcome::Degraded {
                offset: 0,
                size: 2,
                reason: "timeout".to_string(),
            },
            BatchOutcome::Embedded(vec![keep.clone()]),
        ]);
        assert_eq!(records, vec![keep]);
    }

    #[tokio::test]
    async fn test_small_corpus_uses_one_batch_and_writes_cache() {
        let temp_dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let store = EmbeddingCacheStore::new(temp_dir.path());
        let generator = EmbeddingGenerator::new(provider.clone(), store.clone());

        let corpus = passages(3);
        let records = generator.generate("bible", &corpus).await.unwrap();

        assert_eq!(provider.batch_sizes(), vec![3]);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].passage, corpus[2]);
        assert_eq!(records[2].embedding, vec![3.0, 1.0]);
        assert_eq!(store.load("bible").await, Some(records));
    }

    #[tokio::test]
    async fn test_failed_batch_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(vec![1]));
        let store = EmbeddingCacheStore::new(temp_dir.path());
        let generator = EmbeddingGenerator::new(provider.clone(), store.clone());

        let corpus = passages(250);
        let records = generator.generate("quran", &corpus).await.unwrap();

        assert_eq!(provider.batch_sizes(), vec![100, 100, 50]);
        assert_eq!(records.len(), 150);
        assert_eq!(records[99].passage.reference, "Ref 99");
        assert_eq!(records[100].passage.reference, "Ref 200");
        assert_eq!(store.load("quran").await.map(|r| r.len()), Some(150));
    }

    #[tokio::test]
    async fn test_custom_batch_size() {
        let temp_dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let generator = EmbeddingGenerator::new(
            provider.clone(),
            EmbeddingCacheStore::new(temp_dir.path()),
        )
        .with_config(GeneratorConfig {
            batch_size: 2,
            model: None,
        });

        generator.generate("torah", &passages(5)).await.unwrap();

        assert_eq!(provider.batch_sizes(), vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_empty_corpus_makes_no_calls() {
        let temp_dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(Vec::new()));
        let store = EmbeddingCacheStore::new(temp_dir.path());
        let generator = EmbeddingGenerator::new(provider.clone(), store.clone());

        let records = generator.generate("bible", &[]).await.unwrap();

        assert!(records.is_empty());
        assert!(provider.batch_sizes().is_empty());
        assert!(!store.path_for("bible").exists());
    }
}
