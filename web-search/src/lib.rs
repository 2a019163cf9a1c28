//! Web search with ordered provider fallback, and the current-events
//! context built on top of it.
//!
//! # Example
//!
//! ```rust,ignore
//! use scripture_web_search::{ContextBuilder, ProviderChain, SearchConfig};
//!
//! let chain = ProviderChain::from_config(&SearchConfig::from_env())?;
//! let context = ContextBuilder::new(chain)
//!     .get_context("What is happening in Gaza?", &[])
//!     .await;
//! if context.has_context {
//!     println!("{}", context.formatted);
//! }
//! ```

pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod providers;
pub mod result;

pub use chain::{ProviderChain, ProviderOutcome, accept_outcome, first_success};
pub use config::{DuckDuckGoConfig, GoogleConfig, SearchConfig, SerpApiConfig};
pub use context::{
    ContextBuilder, CurrentEventsContext, extract_key_terms, is_current_events_query,
    search_queries,
};
pub use error::{Result, SearchError};
pub use providers::SearchProvider;
pub use result::{NO_DESCRIPTION, SearchResult, format_search_results};
