//! Embedding providers.
//!
//! A provider turns an ordered batch of texts into an ordered batch of
//! vectors. The response order always matches the request order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EmbeddingError, Result};
use crate::{DEFAULT_MODEL, Embedding};

/// Request for generating embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Texts to embed, in order.
    pub input: Vec<String>,

    /// Model to use (provider-specific).
    pub model: Option<String>,
}

impl EmbeddingRequest {
    /// Create a batch request.
    pub fn new(input: Vec<String>) -> Self {
        Self { input, model: None }
    }

    /// Create a request for a single text.
    pub fn single(text: impl Into<String>) -> Self {
        Self::new(vec![text.into()])
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Response from embedding generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// One embedding per input, same order as the request.
    pub embeddings: Vec<Embedding>,

    /// Model used to generate the embeddings.
    pub model: String,

    /// Token usage (if available).
    pub tokens_used: Option<u64>,
}

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Model used for both corpus passages and queries.
    fn model(&self) -> &str;

    /// Generate embeddings for every text of the request.
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse>;

    /// Generate the embedding for a single text.
    async fn embed_one(&self, text: &str) -> Result<Embedding> {
        let request = EmbeddingRequest::single(text).with_model(self.model());
        self.embed(request)
            .await?
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding in response".to_string()))
    }

    /// Check if the provider is available (API key set, etc.).
    fn is_available(&self) -> bool;
}

/// OpenAI embedding provider.
pub struct OpenAIProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Default model.
    model: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for OpenAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        if request.input.is_empty() {
            return Ok(EmbeddingResponse {
                embeddings: Vec::new(),
                model: self.model.clone(),
                tokens_used: None,
            });
        }

        let api_key = self
            .api_key
            .as_ref()
            .ok_or(EmbeddingError::ProviderNotConfigured)?;

        let model = request.model.unwrap_or_else(|| self.model.clone());
        let expected = request.input.len();

        debug!("Generating embeddings for {expected} texts with model: {model}");

        let body = serde_json::json!({
            "input": request.input,
            "model": model
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let mut result: OpenAIEmbeddingResponse = response.json().await?;

        if result.data.len() != expected {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {expected} embeddings, got {}",
                result.data.len()
            )));
        }

        // The API documents `index` as the position in the request.
        result.data.sort_by_key(|item| item.index);

        Ok(EmbeddingResponse {
            embeddings: result.data.into_iter().map(|item| item.embedding).collect(),
            model: result.model,
            tokens_used: result.usage.map(|u| u.total_tokens),
        })
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
    model: String,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingData {
    embedding: Embedding,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAIProvider {
        OpenAIProvider::new()
            .with_api_key("test-key")
            .with_base_url(server.uri())
    }

    #[test]
    fn test_embedding_request() {
        let request = EmbeddingRequest::single("Hello world").with_model("text-embedding-3-small");

        assert_eq!(request.input, vec!["Hello world".to_string()]);
        assert_eq!(request.model, Some("text-embedding-3-small".to_string()));
    }

    #[tokio::test]
    async fn test_batch_embeddings_follow_request_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "input": ["first", "second"],
                "model": "text-embedding-3-small"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "text-embedding-3-small",
                "data": [
                    { "index": 1, "embedding": [0.0, 1.0] },
                    { "index": 0, "embedding": [1.0, 0.0] }
                ],
                "usage": { "prompt_tokens": 2, "total_tokens": 2 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider_for(&server)
            .embed(EmbeddingRequest::new(vec![
                "first".to_string(),
                "second".to_string(),
            ]))
            .await
            .unwrap();

        assert_eq!(response.embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(response.tokens_used, Some(2));
    }

    #[tokio::test]
    async fn test_short_response_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "text-embedding-3-small",
                "data": [{ "index": 0, "embedding": [1.0] }]
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .embed(EmbeddingRequest::new(vec!["a".to_string(), "b".to_string()]))
            .await
            .unwrap_err();

        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_reports_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let err = provider_for(&server).embed_one("query").await.unwrap_err();

        assert!(matches!(
            err,
            EmbeddingError::RateLimited {
                retry_after_secs: 7
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let provider = OpenAIProvider {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
        };

        assert!(!provider.is_available());
        let err = provider.embed_one("query").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::ProviderNotConfigured));
    }
}
