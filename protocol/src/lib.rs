//! Types shared between the retrieval and web-search crates.
//!
//! A [`Passage`] is the citable unit of a corpus, and a
//! [`ConversationTurn`] is one message of the chat history handed in by
//! the orchestration layer. Both are read-only to the retrieval core.

use serde::{Deserialize, Serialize};

/// A minimal citable unit of text.
///
/// Identity is positional within its corpus plus [`Passage::reference`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Human-readable reference, e.g. `John 3:16`.
    pub reference: String,

    /// The passage text.
    pub text: String,

    /// Optional background for the passage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Passage {
    /// Create a passage without context.
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
            context: None,
        }
    }

    /// Attach context to the passage.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One message of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Join the content of the last `count` turns with single spaces.
///
/// Returns an empty string when `history` is empty or `count` is zero.
pub fn recent_turns_text(history: &[ConversationTurn], count: usize) -> String {
    let start = history.len().saturating_sub(count);
    history[start..]
        .iter()
        .map(|turn| turn.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
