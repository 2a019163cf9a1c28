//! Current-events context for a user question.

use scripture_protocol::{ConversationTurn, recent_turns_text};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chain::ProviderChain;
use crate::config::DEFAULT_MAX_RESULTS;
use crate::result::{SearchResult, format_search_results};

/// History turns folded into the key-term phrase.
pub const DEFAULT_HISTORY_TURNS: usize = 2;

/// Key terms kept per phrase.
const MAX_KEY_TERMS: usize = 5;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "should", "could", "may", "might", "must", "can", "what", "where", "when", "why",
    "how", "who", "which", "this", "that", "these", "those",
];

const CURRENT_EVENTS_KEYWORDS: &[&str] = &[
    "iran",
    "israel",
    "palestine",
    "gaza",
    "ukraine",
    "russia",
    "protest",
    "regime",
    "killing",
    "violence",
    "war",
    "conflict",
    "current",
    "today",
    "recent",
    "now",
    "happening",
    "latest",
    "news",
    "breaking",
    "crisis",
    "revolution",
    "uprising",
];

/// Web results gathered for a question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentEventsContext {
    pub has_context: bool,
    pub results: Vec<SearchResult>,

    /// Results rendered by [`format_search_results`]; empty without context.
    pub formatted: String,
}

impl CurrentEventsContext {
    fn from_results(results: Vec<SearchResult>) -> Self {
        Self {
            has_context: true,
            formatted: format_search_results(&results),
            results,
        }
    }
}

/// Reformulates a question into search phrases and runs them through the
/// provider chain until one finds something.
pub struct ContextBuilder {
    chain: ProviderChain,
    max_results: usize,
    history_turns: usize,
}

impl ContextBuilder {
    pub fn new(chain: ProviderChain) -> Self {
        Self {
            chain,
            max_results: DEFAULT_MAX_RESULTS,
            history_turns: DEFAULT_HISTORY_TURNS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub async fn get_context(
        &self,
        query: &str,
        history: &[ConversationTurn],
    ) -> CurrentEventsContext {
        for phrase in search_queries(query, history, self.history_turns) {
            debug!("Searching current events for \"{phrase}\"");
            let results = self.chain.search(&phrase, self.max_results).await;
            if !results.is_empty() {
                info!("Current events context from \"{phrase}\": {} results", results.len());
                return CurrentEventsContext::from_results(results);
            }
        }
        CurrentEventsContext::default()
    }
}

/// Search phrases to try, in order, without blanks or repeats.
///
/// Key terms of the question plus recent history come first, then the
/// raw question, then the question suffixed with `latest` and `news`.
pub fn search_queries(query: &str, history: &[ConversationTurn], turns: usize) -> Vec<String> {
    let terms = extract_key_terms(&format!("{query} {}", recent_turns_text(history, turns)));
    let key_phrase = if terms.is_empty() {
        query.to_string()
    } else {
        terms.join(" ")
    };

    let candidates = [
        key_phrase,
        query.to_string(),
        format!("{query} latest"),
        format!("{query} news"),
    ];

    let mut phrases: Vec<String> = Vec::new();
    for candidate in candidates {
        let trimmed = candidate.trim();
        if !trimmed.is_empty() && !phrases.iter().any(|phrase| phrase == trimmed) {
            phrases.push(trimmed.to_string());
        }
    }
    phrases
}

/// Up to five distinct lower-cased words longer than three characters,
/// with punctuation and stop words removed, in order of appearance.
pub fn extract_key_terms(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut terms: Vec<String> = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.len() <= 3 || STOP_WORDS.contains(&word) || terms.iter().any(|t| t == word) {
            continue;
        }
        terms.push(word.to_string());
        if terms.len() == MAX_KEY_TERMS {
            break;
        }
    }
    terms
}

/// Whether the text mentions a current-events keyword.
///
/// Matches substrings, so `news` also matches `newsletter`. Advisory only:
/// callers decide whether to search.
pub fn is_current_events_query(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CURRENT_EVENTS_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
