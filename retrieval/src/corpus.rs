//! Corpus passage files.
//!
//! A corpus is stored as `<data_dir>/<corpus>.json` with the shape
//! `{ "passages": [ { "reference", "text", "context"? }, .. ] }`.

use std::path::{Path, PathBuf};

use scripture_protocol::Passage;
use serde::Deserialize;
use tokio::fs;
use tracing::{error, warn};

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct CorpusFile {
    #[serde(default)]
    passages: Vec<Passage>,
}

/// Reads corpus passages from static storage.
#[derive(Debug, Clone)]
pub struct CorpusSource {
    data_dir: PathBuf,
}

impl CorpusSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the passage file for `corpus_id`.
    pub fn path_for(&self, corpus_id: &str) -> PathBuf {
        self.data_dir.join(format!("{corpus_id}.json"))
    }

    /// Read the passages of a corpus, failing on I/O or parse errors.
    pub async fn try_load(&self, corpus_id: &str) -> Result<Vec<Passage>> {
        let content = fs::read_to_string(self.path_for(corpus_id)).await?;
        let file: CorpusFile = serde_json::from_str(&content)?;
        Ok(file.passages)
    }

    /// Read the passages of a corpus.
    ///
    /// A missing or unreadable file yields an empty corpus.
    pub async fn load(&self, corpus_id: &str) -> Vec<Passage> {
        match self.try_load(corpus_id).await {
            Ok(passages) => passages,
            Err(crate::RetrievalError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("No data file found for {corpus_id}. Using an empty corpus.");
                Vec::new()
            }
            Err(err) => {
                error!("Error loading {corpus_id}: {err}");
                Vec::new()
            }
        }
    }
}
