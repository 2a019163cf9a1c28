//! Web search policy, supplied by the caller on every request.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Search the web for every question.
    #[default]
    Always,

    /// Search only when the question looks current-events related.
    Auto,

    /// Never search.
    Never,
}

impl SearchMode {
    pub fn should_search(self, is_current_events: bool) -> bool {
        match self {
            SearchMode::Always => true,
            SearchMode::Auto => is_current_events,
            SearchMode::Never => false,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchMode::Always => "always",
            SearchMode::Auto => "auto",
            SearchMode::Never => "never",
        })
    }
}
