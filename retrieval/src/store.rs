//! In-memory store of loaded corpora keyed by corpus id.
//!
//! Loading is the only mutation and needs `&mut CorpusStore`; it happens
//! during startup. Afterwards the store is shared read-only, so queries
//! against different corpora never contend.

use std::collections::BTreeMap;
use std::sync::Arc;

use scripture_embeddings::{
    EmbeddingCacheStore, EmbeddingGenerator, EmbeddingProvider, EmbeddingRecord,
    RegenerationPlan, regeneration_plan,
};
use scripture_protocol::Passage;
use tracing::{error, info};

use crate::config::RetrievalConfig;
use crate::corpus::CorpusSource;
use crate::error::{Result, RetrievalError};

/// Passages and embeddings of one corpus.
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    pub passages: Vec<Passage>,
    pub records: Vec<EmbeddingRecord>,
}

impl LoadedCorpus {
    /// Every passage has exactly one embedding.
    pub fn is_ready(&self) -> bool {
        !self.passages.is_empty() && self.passages.len() == self.records.len()
    }
}

/// Explicit per-corpus state, replacing ambient global maps.
pub struct CorpusStore {
    source: CorpusSource,
    cache: EmbeddingCacheStore,
    generator: EmbeddingGenerator,
    corpora: BTreeMap<String, LoadedCorpus>,
}

impl CorpusStore {
    /// Create an empty store.
    ///
    /// Fails when the embedding provider is unavailable, since no corpus
    /// could ever be embedded.
    pub fn new(config: &RetrievalConfig, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        if !provider.is_available() {
            return Err(RetrievalError::EmbeddingUnavailable(
                provider.name().to_string(),
            ));
        }

        let cache = EmbeddingCacheStore::new(&config.cache_dir);
        let generator = EmbeddingGenerator::new(provider, cache.clone())
            .with_config(config.generator.clone());

        Ok(Self {
            source: CorpusSource::new(&config.data_dir),
            cache,
            generator,
            corpora: BTreeMap::new(),
        })
    }

    /// Load a corpus, reusing its embedding cache when it is complete and
    /// regenerating every embedding otherwise.
    pub async fn load_corpus(&mut self, corpus_id: &str) -> RegenerationPlan {
        let passages = self.source.load(corpus_id).await;
        let cached = self.cache.load(corpus_id).await;
        let plan = regeneration_plan(cached.as_ref().map(Vec::len), passages.len());

        let records = match &plan {
            RegenerationPlan::Skip => Vec::new(),
            RegenerationPlan::ReuseCache => {
                let records = cached.unwrap_or_default();
                info!(
                    "Using cached embeddings for {corpus_id} ({} passages)",
                    records.len()
                );
                records
            }
            RegenerationPlan::Generate(reason) => {
                info!(
                    "Generating embeddings for {corpus_id}: {reason} ({} passages)",
                    passages.len()
                );
                match self.generator.generate(corpus_id, &passages).await {
                    Ok(records) => records,
                    Err(err) => {
                        error!("{corpus_id}: {err}");
                        err.records
                    }
                }
            }
        };

        info!("Loaded {} passages for {corpus_id}", passages.len());
        self.corpora
            .insert(corpus_id.to_string(), LoadedCorpus { passages, records });
        plan
    }

    /// Register a corpus whose passages and embeddings are already known.
    pub fn insert(&mut self, corpus_id: impl Into<String>, corpus: LoadedCorpus) {
        self.corpora.insert(corpus_id.into(), corpus);
    }

    pub fn get(&self, corpus_id: &str) -> Option<&LoadedCorpus> {
        self.corpora.get(corpus_id)
    }

    /// Cached embeddings for a corpus; empty when it is unknown.
    pub fn records(&self, corpus_id: &str) -> &[EmbeddingRecord] {
        self.corpora
            .get(corpus_id)
            .map(|corpus| corpus.records.as_slice())
            .unwrap_or_default()
    }

    pub fn passage_count(&self, corpus_id: &str) -> usize {
        self.corpora.get(corpus_id).map_or(0, |c| c.passages.len())
    }

    pub fn record_count(&self, corpus_id: &str) -> usize {
        self.records(corpus_id).len()
    }

    pub fn is_ready(&self, corpus_id: &str) -> bool {
        self.corpora.get(corpus_id).is_some_and(LoadedCorpus::is_ready)
    }

    pub fn corpus_ids(&self) -> impl Iterator<Item = &str> {
        self.corpora.keys().map(String::as_str)
    }
}
