//! Prompt formatting for retrieved passages.

use scripture_protocol::Passage;

/// Render passages as numbered blocks separated by a blank line.
pub fn format_passages_for_prompt(passages: &[Passage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(index, passage)| {
            let mut block = format!(
                "[Passage {}]\nReference: {}\nText: {}",
                index + 1,
                passage.reference,
                passage.text
            );
            if let Some(context) = passage.context.as_deref().filter(|c| !c.is_empty()) {
                block.push_str("\nContext: ");
                block.push_str(context);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
