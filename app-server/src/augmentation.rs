//! Prompt text produced for one question.

use scripture_protocol::Passage;
use serde::Serialize;

use crate::book::Book;

const CONTEXT_INSTRUCTIONS: &str = "Use this information about current events to provide relevant context when answering the question. Connect the sacred text's teachings to these contemporary situations.";

const NO_RESULTS_NOTICE: &str = "CURRENT EVENTS SEARCH NOTICE:\nWeb search returned no results. Answer using general background knowledge and the sacred texts. Do not claim real-time access or browsing; avoid definitive claims about very recent developments.";

const DISABLED_NOTICE: &str = "CURRENT EVENTS NOTICE:\nThis question concerns current events, but web search is disabled. Answer using general background knowledge and the sacred texts. Avoid definitive claims about very recent developments.";

const PASSAGES_REMINDER: &str = "Please answer based on the relevant passages provided, and connect the teachings to any current events or contemporary situations mentioned in my question.";

const CURRENT_EVENTS_REMINDER: &str = "IMPORTANT: This question involves current events. Use any provided web search context and connect it to the sacred text teachings. If no web context is available, answer from general background knowledge without claiming real-time access, and avoid definitive claims about very recent developments.";

/// What the prompt says about current events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "formatted", rename_all = "snake_case")]
pub enum CurrentEventsSection {
    /// Web results, already formatted.
    Context(String),

    /// Searched, found nothing.
    NoResults,

    /// Did not search although the question looks current-events related.
    Disabled,

    /// Nothing to say.
    Omitted,
}

impl CurrentEventsSection {
    pub fn render(&self) -> String {
        match self {
            Self::Context(formatted) => format!(
                "CURRENT EVENTS CONTEXT FROM WEB SEARCH:\n{formatted}\n\n{CONTEXT_INSTRUCTIONS}"
            ),
            Self::NoResults => NO_RESULTS_NOTICE.to_string(),
            Self::Disabled => DISABLED_NOTICE.to_string(),
            Self::Omitted => String::new(),
        }
    }
}

/// Retrieved passages and web context for one question.
#[derive(Debug, Clone, Serialize)]
pub struct Augmentation {
    pub book: Book,
    pub passages: Vec<Passage>,

    /// Passages rendered by `format_passages_for_prompt`.
    pub formatted_passages: String,

    /// Whether the question looks current-events related.
    pub current_events_query: bool,
    pub current_events: CurrentEventsSection,
}

impl Augmentation {
    /// Sections to append to the system prompt, separated by blank lines.
    pub fn system_context(&self) -> String {
        let mut sections = Vec::new();
        if !self.formatted_passages.is_empty() {
            sections.push(format!(
                "RELEVANT PASSAGES FROM {}:\n{}\n\nUse these passages to inform your answer. Quote directly from them when relevant.",
                self.book.name().to_uppercase(),
                self.formatted_passages
            ));
        }
        let current_events = self.current_events.render();
        if !current_events.is_empty() {
            sections.push(current_events);
        }
        sections.join("\n\n")
    }

    /// The user's message with the reminders that apply to it.
    pub fn user_message(&self, message: &str) -> String {
        let mut enhanced = message.to_string();
        if !self.passages.is_empty() {
            enhanced.push_str("\n\n");
            enhanced.push_str(PASSAGES_REMINDER);
        }
        if self.current_events_query {
            enhanced.push_str("\n\n");
            enhanced.push_str(CURRENT_EVENTS_REMINDER);
        }
        enhanced
    }

    /// References of the retrieved passages, in rank order.
    pub fn references(&self) -> Vec<&str> {
        self.passages
            .iter()
            .map(|passage| passage.reference.as_str())
            .collect()
    }
}
