//! SerpAPI (Google engine) provider.

use serde::Deserialize;
use tracing::debug;

use crate::config::SerpApiConfig;
use crate::error::{Result, SearchError};
use crate::result::SearchResult;

pub const NAME: &str = "SerpAPI";

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
}

pub struct SerpApiProvider {
    client: reqwest::Client,
    config: SerpApiConfig,
}

impl SerpApiProvider {
    pub fn new(client: reqwest::Client, config: SerpApiConfig) -> Self {
        Self { client, config }
    }

    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search.json", self.config.base_url.trim_end_matches('/'));
        debug!("SerpAPI query: {query}");

        let response = self
            .client
            .get(url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status {
                provider: NAME,
                status: response.status(),
            });
        }

        let payload: SerpApiResponse = response.json().await?;
        Ok(payload
            .organic_results
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_organic_results_are_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "google"))
            .and(query_param("q", "gaza ceasefire"))
            .and(query_param("api_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic_results": [
                    { "title": "One", "snippet": "First", "link": "https://one" },
                    { "title": "Two", "link": "https://two" },
                    { "title": "Three", "snippet": "Third", "link": "https://three" }
                ]
            })))
            .mount(&server)
            .await;

        let provider = SerpApiProvider::new(
            reqwest::Client::new(),
            SerpApiConfig::new("secret").with_base_url(server.uri()),
        );
        let results = provider.search("gaza ceasefire", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://one");
        assert_eq!(results[1].snippet, crate::result::NO_DESCRIPTION);
        assert_eq!(results[1].source, NAME);
    }

    #[tokio::test]
    async fn test_untitled_results_do_not_count_toward_max() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic_results": [
                    { "snippet": "no title", "link": "https://untitled" },
                    { "title": "One", "snippet": "First" },
                    { "title": "Two", "link": "https://two" },
                    { "title": "Three", "link": "https://three" }
                ]
            })))
            .mount(&server)
            .await;

        let provider = SerpApiProvider::new(
            reqwest::Client::new(),
            SerpApiConfig::new("secret").with_base_url(server.uri()),
        );
        let results = provider.search("q", 2).await.unwrap();

        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://two", "https://three"]);
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = SerpApiProvider::new(
            reqwest::Client::new(),
            SerpApiConfig::new("bad").with_base_url(server.uri()),
        );

        assert!(matches!(
            provider.search("q", 3).await,
            Err(SearchError::Status { provider: NAME, .. })
        ));
    }
}
