//! Per-corpus embedding cache files.
//!
//! Each corpus owns one `<corpus>_embeddings.json` file holding a JSON
//! array of `{ "passage": .., "embedding": [..] }` records.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::EmbeddingRecord;
use crate::error::{EmbeddingError, Result};

/// Durable mapping from corpus id to its ordered embedding records.
#[derive(Debug, Clone)]
pub struct EmbeddingCacheStore {
    /// Directory that holds the cache files.
    cache_dir: PathBuf,
}

impl EmbeddingCacheStore {
    /// Create a store rooted at `cache_dir`. The directory is created on
    /// the first save.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Directory holding the cache files.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the cache file for `corpus_id`.
    pub fn path_for(&self, corpus_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{corpus_id}_embeddings.json"))
    }

    /// Load the cached records for a corpus.
    ///
    /// Returns `None` when the file is missing, unreadable, not valid
    /// JSON, not an array, or an empty array. Each case is logged.
    pub async fn load(&self, corpus_id: &str) -> Option<Vec<EmbeddingRecord>> {
        let path = self.path_for(corpus_id);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("No cache file found for {corpus_id} at {}", path.display());
                return None;
            }
            Err(err) => {
                error!("Error reading embeddings cache for {corpus_id}: {err}");
                return None;
            }
        };

        match parse_records(&content) {
            Ok(records) if records.is_empty() => {
                warn!("Cache file for {corpus_id} is empty");
                None
            }
            Ok(records) => {
                info!(
                    "Found cache file for {corpus_id} ({} embeddings)",
                    records.len()
                );
                Some(records)
            }
            Err(err) => {
                error!("Error loading embeddings cache for {corpus_id}: {err}");
                None
            }
        }
    }

    /// Replace the cache file for a corpus with `records`.
    ///
    /// The records are written to a sibling temp file which is then
    /// renamed over the cache file, so readers never see a partial write.
    pub async fn save(&self, corpus_id: &str, records: &[EmbeddingRecord]) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).await?;

        let path = self.path_for(corpus_id);
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(records)?;

        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &path).await?;

        info!(
            "Saved embeddings cache for {corpus_id} ({} records)",
            records.len()
        );
        debug!("Cache written to {}", path.display());
        Ok(())
    }
}

fn parse_records(content: &str) -> Result<Vec<EmbeddingRecord>> {
    let value: Value = serde_json::from_str(content)?;
    if !value.is_array() {
        return Err(EmbeddingError::Cache("cache payload is not an array".to_string()));
    }
    Ok(serde_json::from_value(value)?)
}
