//! Google Custom Search provider.

use serde::Deserialize;
use tracing::debug;

use crate::config::GoogleConfig;
use crate::error::{Result, SearchError};
use crate::result::SearchResult;

pub const NAME: &str = "Google";

/// The API rejects `num` above 10.
const MAX_NUM: usize = 10;

#[derive(Debug, Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<CustomSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CustomSearchItem {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
}

pub struct GoogleProvider {
    client: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleProvider {
    pub fn new(client: reqwest::Client, config: GoogleConfig) -> Self {
        Self { client, config }
    }

    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let url = format!(
            "{}/customsearch/v1",
            self.config.base_url.trim_end_matches('/')
        );
        let num = max_results.clamp(1, MAX_NUM).to_string();
        debug!("Google query: {query}");

        let response = self
            .client
            .get(url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("cx", self.config.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status {
                provider: NAME,
                status: response.status(),
            });
        }

        let payload: CustomSearchResponse = response.json().await?;
        Ok(payload
            .items
            .iter()
            .filter_map(|item| {
                SearchResult::from_parts(
                    item.title.as_deref(),
                    item.snippet.as_deref(),
                    item.link.as_deref(),
                    NAME,
                )
            })
            .take(max_results)
            .collect())
    }
}
