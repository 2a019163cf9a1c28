//! Concrete search providers.
//!
//! Each provider turns a query into at most `max_results` uniform
//! [`SearchResult`]s or fails with a [`SearchError`](crate::SearchError).

pub mod duckduckgo;
pub mod google;
pub mod serpapi;

pub use duckduckgo::DuckDuckGoProvider;
pub use google::GoogleProvider;
pub use serpapi::SerpApiProvider;

use crate::error::Result;
use crate::result::SearchResult;

/// One entry of the provider chain.
pub enum SearchProvider {
    SerpApi(SerpApiProvider),
    Google(GoogleProvider),
    DuckDuckGo(DuckDuckGoProvider),
}

impl SearchProvider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SerpApi(_) => serpapi::NAME,
            Self::Google(_) => google::NAME,
            Self::DuckDuckGo(_) => duckduckgo::NAME,
        }
    }

    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        match self {
            Self::SerpApi(provider) => provider.search(query, max_results).await,
            Self::Google(provider) => provider.search(query, max_results).await,
            Self::DuckDuckGo(provider) => provider.search(query, max_results).await,
        }
    }
}
