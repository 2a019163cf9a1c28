//! Embedding provider double for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use scripture_embeddings::{
    Embedding, EmbeddingError, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, Result,
};

/// Counts calls and returns scripted vectors.
///
/// Texts without a scripted vector embed as `[1.0, len]`.
pub struct CountingProvider {
    available: bool,
    fail: bool,
    calls: AtomicUsize,
    texts: AtomicUsize,
    scripted: HashMap<String, Embedding>,
    last_input: Mutex<Vec<String>>,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self {
            available: true,
            fail: false,
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
            scripted: HashMap::new(),
            last_input: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_vector(mut self, text: &str, embedding: Embedding) -> Self {
        self.scripted.insert(text.to_string(), embedding);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts_embedded(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Vec<String> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    fn model(&self) -> &str {
        "counting-model"
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(request.input.len(), Ordering::SeqCst);
        *self.last_input.lock().unwrap() = request.input.clone();

        if self.fail {
            return Err(EmbeddingError::ApiRequest("provider down".to_string()));
        }

        let embeddings = request
            .input
            .iter()
            .map(|text| {
                self.scripted
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| vec![1.0, text.len() as f64])
            })
            .collect();

        Ok(EmbeddingResponse {
            embeddings,
            model: self.model().to_string(),
            tokens_used: None,
        })
    }

    fn is_available(&self) -> bool {
        self.available
    }
}
