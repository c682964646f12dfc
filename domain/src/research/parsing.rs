//! Parsing of free-form model replies.
//!
//! Models sometimes wrap their answer in a `<thinking>` block or a fenced
//! code block; these helpers recover the part the loop actually needs.

use crate::core::error::DomainError;

/// Drop everything up to and including the last `</thinking>` tag.
pub fn strip_thinking(text: &str) -> &str {
    match text.rfind("</thinking>") {
        Some(pos) => text[pos + "</thinking>".len()..].trim(),
        None => text.trim(),
    }
}

/// Interpret a classifier reply constrained to "Yes"/"No".
///
/// Anything other than a leading "yes" counts as no.
pub fn parse_yes_no(text: &str) -> bool {
    let answer = strip_thinking(text).to_lowercase();
    let answer = answer.trim_matches(|c: char| !c.is_alphanumeric());
    answer == "yes" || answer.starts_with("yes ") || answer.starts_with("yes,")
}

/// Pull the first JSON value out of a reply.
///
/// Tries, in order: the whole reply, a fenced ```json / ``` block, then the
/// outermost `{...}` or `[...]` span.
pub fn extract_json(text: &str) -> Result<serde_json::Value, DomainError> {
    let text = strip_thinking(text);

    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    let mut in_block = false;
    let mut block = String::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            block.clear();
        } else if in_block && trimmed == "```" {
            in_block = false;
            if let Ok(value) = serde_json::from_str(&block) {
                return Ok(value);
            }
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (text.find(open), text.rfind(close))
            && start < end
            && let Ok(value) = serde_json::from_str(&text[start..=end])
        {
            return Ok(value);
        }
    }

    Err(DomainError::UnparseableOutput(
        crate::core::string::truncate(text, 120),
    ))
}
