//! DuckDuckGo HTML scraping provider.
//!
//! Tries the HTML endpoint first and tops up from the lite endpoint when
//! fewer than `max_results` were found. A URL already collected is never
//! added twice.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::DuckDuckGoConfig;
use crate::error::{Result, SearchError};
use crate::result::SearchResult;

pub const NAME: &str = "DuckDuckGo";

/// Selectors for one result-page layout.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub link: &'static str,
    pub snippet: &'static str,
}

pub const HTML_LAYOUT: Layout = Layout {
    link: "a.result__a",
    snippet: ".result__snippet",
};

pub const LITE_LAYOUT: Layout = Layout {
    link: "a.result-link",
    snippet: ".result-snippet",
};

pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    config: DuckDuckGoConfig,
}

impl DuckDuckGoProvider {
    pub fn new(client: reqwest::Client, config: DuckDuckGoConfig) -> Self {
        Self { client, config }
    }

    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        let mut seen = HashSet::new();

        let attempts = [
            (self.config.html_url.as_str(), HTML_LAYOUT),
            (self.config.lite_url.as_str(), LITE_LAYOUT),
        ];
        for (endpoint, layout) in attempts {
            if results.len() >= max_results {
                break;
            }
            match self.fetch(endpoint, query).await {
                Ok(html) => {
                    parse_results(&html, layout, max_results, &mut seen, &mut results)?;
                    debug!("DuckDuckGo {endpoint}: {} results so far", results.len());
                }
                Err(err) => warn!("DuckDuckGo search error ({endpoint}): {err}"),
            }
        }

        Ok(results)
    }

    async fn fetch(&self, endpoint: &str, query: &str) -> Result<String> {
        let response = self
            .client
            .get(endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status {
                provider: NAME,
                status: response.status(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Append results parsed from one page until `max_results` is reached.
///
/// The snippet is looked up inside the nearest `div` enclosing the link.
pub fn parse_results(
    html: &str,
    layout: Layout,
    max_results: usize,
    seen: &mut HashSet<String>,
    results: &mut Vec<SearchResult>,
) -> Result<()> {
    let link_selector = parse_selector(layout.link)?;
    let snippet_selector = parse_selector(layout.snippet)?;
    let document = Html::parse_document(html);

    for link in document.select(&link_selector) {
        if results.len() >= max_results {
            break;
        }

        let title = element_text(link);
        let Some(url) = link.value().attr("href") else {
            continue;
        };
        if title.is_empty() || url.trim().is_empty() || seen.contains(url) {
            continue;
        }

        let snippet = link
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "div")
            .and_then(|div| div.select(&snippet_selector).next())
            .map(element_text);

        if let Some(result) =
            SearchResult::from_parts(Some(&title), snippet.as_deref(), Some(url), NAME)
        {
            seen.insert(url.to_string());
            results.push(result);
        }
    }

    Ok(())
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|err| SearchError::Selector(err.to_string()))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::NO_DESCRIPTION;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn html_page(entries: &[(&str, &str, &str)]) -> String {
        let body: String = entries
            .iter()
            .map(|(title, url, snippet)| {
                format!(
                    r#"<div class="result"><h2><a class="result__a" href="{url}">{title}</a></h2>
                       <a class="result__snippet">{snippet}</a></div>"#
                )
            })
            .collect();
        format!("<html><body>{body}</body></html>")
    }

    fn lite_page(entries: &[(&str, &str)]) -> String {
        let rows: String = entries
            .iter()
            .map(|(title, url)| {
                format!(
                    r#"<tr><td><a class="result-link" href="{url}">{title}</a></td></tr>
                       <tr><td class="result-snippet">lite snippet</td></tr>"#
                )
            })
            .collect();
        format!("<html><body><table>{rows}</table></body></html>")
    }

    async fn mount(server: &MockServer, route: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("q", "protest news"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_html_layout() {
        let html = html_page(&[
            ("First", "https://one", "Snippet one"),
            ("Second", "https://two", ""),
        ]);
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        parse_results(&html, HTML_LAYOUT, 5, &mut seen, &mut results).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First");
        assert_eq!(results[0].snippet, "Snippet one");
        assert_eq!(results[1].snippet, NO_DESCRIPTION);
        assert_eq!(results[1].source, NAME);
    }

    #[test]
    fn test_parse_stops_at_max_results() {
        let html = html_page(&[("A", "https://a", "a"), ("B", "https://b", "b")]);
        let mut results = Vec::new();

        parse_results(&html, HTML_LAYOUT, 1, &mut HashSet::new(), &mut results).unwrap();

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_lite_page_tops_up_without_duplicates() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/html/",
            html_page(&[("Primary", "https://shared", "from html")]),
        )
        .await;
        mount(
            &server,
            "/lite/",
            lite_page(&[("Shared again", "https://shared"), ("Lite", "https://lite")]),
        )
        .await;

        let provider = DuckDuckGoProvider::new(
            reqwest::Client::new(),
            DuckDuckGoConfig::with_base_url(&server.uri()),
        );
        let results = provider.search("protest news", 3).await.unwrap();

        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://shared", "https://lite"]);
        assert_eq!(results[1].snippet, NO_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_full_primary_page_skips_lite() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/html/",
            html_page(&[("A", "https://a", "a"), ("B", "https://b", "b")]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/lite/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = DuckDuckGoProvider::new(
            reqwest::Client::new(),
            DuckDuckGoConfig::with_base_url(&server.uri()),
        );

        assert_eq!(provider.search("protest news", 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_primary_falls_through_to_lite() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        mount(&server, "/lite/", lite_page(&[("Lite", "https://lite")])).await;

        let provider = DuckDuckGoProvider::new(
            reqwest::Client::new(),
            DuckDuckGoConfig::with_base_url(&server.uri()),
        );
        let results = provider.search("protest news", 3).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Lite");
    }
}
