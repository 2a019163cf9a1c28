//! Uniform search result shape shared by every provider.

use serde::{Deserialize, Serialize};

/// Snippet used when a provider returns none.
pub const NO_DESCRIPTION: &str = "No description available.";

/// One web result with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,

    /// Name of the provider that produced the result.
    pub source: String,
}

impl SearchResult {
    /// Build a result, rejecting entries without a title or URL.
    pub fn from_parts(
        title: Option<&str>,
        snippet: Option<&str>,
        url: Option<&str>,
        source: &str,
    ) -> Option<Self> {
        let title = title.map(str::trim).filter(|t| !t.is_empty())?;
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;
        let snippet = snippet
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_DESCRIPTION);

        Some(Self {
            title: title.to_string(),
            snippet: snippet.to_string(),
            url: url.to_string(),
            source: source.to_string(),
        })
    }
}

/// Render results as numbered blocks for prompt inclusion.
pub fn format_search_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "[News/Current Event {}]\nTitle: {}\nSummary: {}\nSource: {}",
                index + 1,
                result.title,
                result.snippet,
                result.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_parts_requires_title_and_url() {
        assert!(SearchResult::from_parts(None, Some("s"), Some("https://a"), "X").is_none());
        assert!(SearchResult::from_parts(Some("t"), Some("s"), Some(" "), "X").is_none());

        let result = SearchResult::from_parts(Some(" Title "), None, Some("https://a"), "X")
            .unwrap();
        assert_eq!(result.title, "Title");
        assert_eq!(result.snippet, NO_DESCRIPTION);
    }

    #[test]
    fn test_format_search_results() {
        let results = vec![
            SearchResult::from_parts(Some("One"), Some("First"), Some("https://one"), "X")
                .unwrap(),
            SearchResult::from_parts(Some("Two"), Some("Second"), Some("https://two"), "X")
                .unwrap(),
        ];

        assert_eq!(
            format_search_results(&results),
            "[News/Current Event 1]\nTitle: One\nSummary: First\nSource: https://one\n\n\
             [News/Current Event 2]\nTitle: Two\nSummary: Second\nSource: https://two"
        );
        assert_eq!(format_search_results(&[]), "");
    }
}
