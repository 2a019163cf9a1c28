//! Request handling over the retrieval and web-search crates.

use std::sync::Arc;

use anyhow::Result;
use scripture_protocol::ConversationTurn;
use scripture_retrieval::{
    CorpusStore, EmbeddingProvider, RegenerationPlan, RetrievalConfig, SemanticRetriever,
    format_passages_for_prompt,
};
use scripture_web_search::{ContextBuilder, is_current_events_query};
use serde::Serialize;
use tracing::{info, warn};

use crate::augmentation::{Augmentation, CurrentEventsSection};
use crate::book::Book;
use crate::mode::SearchMode;

/// Load state of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookHealth {
    pub book: Book,
    pub passages: usize,
    pub embeddings: usize,
    pub ready: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub books: Vec<BookHealth>,
    pub search_providers: Vec<&'static str>,
}

/// Owns the loaded corpora and the web context builder.
pub struct AugmentationHandler {
    retriever: SemanticRetriever,
    context: ContextBuilder,
}

impl AugmentationHandler {
    /// Load every book, generating embeddings where the cache is missing
    /// or stale.
    ///
    /// Fails only when the embedding provider is unavailable.
    pub async fn initialize(
        config: &RetrievalConfig,
        provider: Arc<dyn EmbeddingProvider>,
        context: ContextBuilder,
    ) -> Result<Self> {
        let mut store = CorpusStore::new(config, Arc::clone(&provider))?;

        info!("Loading holy books...");
        for book in Book::ALL {
            match store.load_corpus(book.id()).await {
                RegenerationPlan::Skip => warn!("No passages for {book}; retrieval disabled"),
                RegenerationPlan::ReuseCache | RegenerationPlan::Generate(_) => {
                    info!(
                        "{book}: {} passages, {} embeddings",
                        store.passage_count(book.id()),
                        store.record_count(book.id())
                    );
                }
            }
        }
        info!("All books loaded and ready");

        let retriever =
            SemanticRetriever::new(provider, Arc::new(store))?.with_config(config.query.clone());
        Ok(Self { retriever, context })
    }

    /// Gather passages and web context for `message`.
    ///
    /// Rejects unknown books; everything else degrades to empty sections.
    pub async fn augment(
        &self,
        book: &str,
        message: &str,
        history: &[ConversationTurn],
        mode: SearchMode,
    ) -> Result<Augmentation> {
        let book: Book = book.parse()?;

        let passages = self.retriever.search_default(book.id(), message, history).await;
        if passages.is_empty() {
            warn!("No relevant passages found for {book}. Using general knowledge.");
        } else {
            info!("Retrieved {} relevant passages for {book}", passages.len());
        }
        let formatted_passages = format_passages_for_prompt(&passages);

        let current_events_query = is_current_events_query(message);
        let current_events = if mode.should_search(current_events_query) {
            info!("Web search mode: {mode}. Searching web...");
            let context = self.context.get_context(message, history).await;
            if context.has_context && !context.formatted.is_empty() {
                info!("Found {} web search results", context.results.len());
                CurrentEventsSection::Context(context.formatted)
            } else {
                warn!("Web search returned no results");
                CurrentEventsSection::NoResults
            }
        } else if current_events_query {
            CurrentEventsSection::Disabled
        } else {
            CurrentEventsSection::Omitted
        };

        Ok(Augmentation {
            book,
            passages,
            formatted_passages,
            current_events_query,
            current_events,
        })
    }

    pub fn health(&self) -> HealthReport {
        let store = self.retriever.store();
        HealthReport {
            books: Book::ALL
                .into_iter()
                .map(|book| BookHealth {
                    book,
                    passages: store.passage_count(book.id()),
                    embeddings: store.record_count(book.id()),
                    ready: store.is_ready(book.id()),
                })
                .collect(),
            search_providers: self.context.chain().provider_names(),
        }
    }
}
