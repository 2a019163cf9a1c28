//! Ordered provider fallback.
//!
//! Providers are attempted one at a time in priority order. The first one
//! that yields at least one result wins and nothing is merged across
//! providers. Failures never reach the caller.

use std::time::Duration;

use futures::{Stream, StreamExt, stream};
use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::providers::{DuckDuckGoProvider, GoogleProvider, SearchProvider, SerpApiProvider};
use crate::result::SearchResult;

/// Result of one provider attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    /// The provider answered; the list may be empty.
    Results(Vec<SearchResult>),

    /// The provider failed.
    Degraded {
        provider: &'static str,
        reason: String,
    },
}

impl ProviderOutcome {
    pub fn from_attempt(provider: &'static str, attempt: Result<Vec<SearchResult>>) -> Self {
        match attempt {
            Ok(results) => Self::Results(results),
            Err(err) => Self::Degraded {
                provider,
                reason: err.to_string(),
            },
        }
    }
}

/// Results that end the chain, or `None` to try the next provider.
pub fn accept_outcome(outcome: ProviderOutcome) -> Option<Vec<SearchResult>> {
    match outcome {
        ProviderOutcome::Results(results) if !results.is_empty() => Some(results),
        ProviderOutcome::Results(_) | ProviderOutcome::Degraded { .. } => None,
    }
}

/// Drive `outcomes` until one is accepted.
///
/// The stream is polled lazily, so providers after the winner never run.
pub async fn first_success(outcomes: impl Stream<Item = ProviderOutcome>) -> Vec<SearchResult> {
    let mut outcomes = std::pin::pin!(outcomes);
    while let Some(outcome) = outcomes.next().await {
        if let Some(results) = accept_outcome(outcome) {
            return results;
        }
    }
    Vec::new()
}

/// The configured providers in priority order.
pub struct ProviderChain {
    providers: Vec<SearchProvider>,
}

impl ProviderChain {
    pub fn new(providers: Vec<SearchProvider>) -> Self {
        Self { providers }
    }

    /// Build the chain SerpAPI, Google, DuckDuckGo, keeping only the
    /// providers `config` enables. All of them share one HTTP client.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let mut providers = Vec::new();
        if let Some(serpapi) = &config.serpapi {
            providers.push(SearchProvider::SerpApi(SerpApiProvider::new(
                client.clone(),
                serpapi.clone(),
            )));
        }
        if let Some(google) = &config.google {
            providers.push(SearchProvider::Google(GoogleProvider::new(
                client.clone(),
                google.clone(),
            )));
        }
        if config.duckduckgo.enabled {
            providers.push(SearchProvider::DuckDuckGo(DuckDuckGoProvider::new(
                client,
                config.duckduckgo.clone(),
            )));
        }

        info!(
            "Web search providers: {}",
            config.enabled_providers().join(", ")
        );
        Ok(Self::new(providers))
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(SearchProvider::name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Search with fallback; returns an empty list when every provider
    /// fails or finds nothing.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let attempts = stream::iter(&self.providers).then(|provider| async move {
            let name = provider.name();
            let outcome =
                ProviderOutcome::from_attempt(name, provider.search(query, max_results).await);
            match &outcome {
                ProviderOutcome::Results(results) if results.is_empty() => {
                    info!("{name} returned no results for \"{query}\"");
                }
                ProviderOutcome::Results(results) => {
                    info!("Found {} results from {name}", results.len());
                }
                ProviderOutcome::Degraded { reason, .. } => {
                    warn!("{name} search failed: {reason}");
                }
            }
            outcome
        });

        let results = first_success(attempts).await;
        if results.is_empty() {
            warn!("No search results found from any provider for \"{query}\"");
        }
        results
    }
}
