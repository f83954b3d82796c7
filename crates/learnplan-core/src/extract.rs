//! Recovering a JSON value from generated text.
//!
//! The model is asked for bare JSON but sometimes wraps it in a markdown
//! fence or surrounds it with prose. Extraction makes two attempts:
//!
//! 1. Strip an optional ```` ``` ```` fence (and `json` tag), then parse strictly.
//! 2. Parse the span from the first `{` to the last `}` of that same text.
//!
//! If both fail the error carries the first parser message and a bounded
//! excerpt of the text.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Longest excerpt of offending text carried in an [`ExtractError`], in characters.
pub const EXCERPT_CHARS: usize = 500;

const FENCE: &str = "```";

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("Could not parse JSON from LLM response.\nError: {message}\nResponse: {excerpt}...")]
    Unparseable { message: String, excerpt: String },
}

/// Parse the JSON payload out of raw generated text.
pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let text = strip_fence(raw);

    serde_json::from_str(text).or_else(|err| {
        braced_span(text)
            .and_then(|span| serde_json::from_str(span).ok())
            .inspect(|_| warn!("generated text was not bare JSON; recovered braced span"))
            .ok_or_else(|| ExtractError::Unparseable {
                message: err.to_string(),
                excerpt: text.chars().take(EXCERPT_CHARS).collect(),
            })
    })
}

/// Trim, and if the text opens with a fence, keep only the first fenced
/// segment minus a leading `json` language tag.
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed;
    }
    match trimmed.split(FENCE).nth(1) {
        Some(inner) => inner.strip_prefix("json").unwrap_or(inner).trim(),
        None => trimmed,
    }
}

/// The greedy span from the first `{` to the last `}` after it.
fn braced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const QUESTION: &str = r#"{"question_id": "background", "question_text": "What's your background?", "options": ["Tech", "Product"]}"#;

    #[test]
    fn parses_bare_json() {
        let value = extract_json(QUESTION).unwrap();
        assert_eq!(value["question_id"], "background");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let value = extract_json(&format!("\n\n   {QUESTION}  \n")).unwrap();
        assert_eq!(value["options"], json!(["Tech", "Product"]));
    }

    #[test]
    fn fenced_with_tag_matches_unfenced() {
        let fenced = format!("```json\n{QUESTION}\n```");
        assert_eq!(extract_json(&fenced).unwrap(), extract_json(QUESTION).unwrap());
    }

    #[test]
    fn fenced_without_tag_matches_unfenced() {
        let fenced = format!("```\n{QUESTION}\n```");
        assert_eq!(extract_json(&fenced).unwrap(), extract_json(QUESTION).unwrap());
    }

    #[test]
    fn fence_keeps_only_first_segment() {
        let fenced = format!("```json\n{QUESTION}\n```\nHope this helps!\n```\n{{}}\n```");
        assert_eq!(extract_json(&fenced).unwrap()["question_id"], "background");
    }

    #[test]
    fn recovers_json_wrapped_in_prose() {
        let raw = format!("Sure! Here is the question you asked for:\n{QUESTION}\nLet me know.");
        assert_eq!(extract_json(&raw).unwrap()["question_id"], "background");
    }

    #[test]
    fn brace_scan_is_greedy_across_nested_objects() {
        let raw = r#"Plan: {"plan": [{"day": 1}, {"day": 2}]} done"#;
        let value = extract_json(raw).unwrap();
        assert_eq!(value["plan"][1]["day"], 2);
    }

    #[test]
    fn fails_with_parser_message_and_excerpt() {
        let err = extract_json("I cannot help with that.").unwrap_err();
        let ExtractError::Unparseable { message, excerpt } = &err;
        assert!(!message.is_empty());
        assert_eq!(excerpt, "I cannot help with that.");
        assert!(err.to_string().starts_with("Could not parse JSON from LLM response."));
    }

    #[test]
    fn fails_when_braced_span_is_not_json() {
        let err = extract_json("prefix {not: json} suffix").unwrap_err();
        assert!(matches!(err, ExtractError::Unparseable { .. }));
    }

    #[test]
    fn fails_when_closing_brace_precedes_opening() {
        assert!(extract_json("} nothing here {").is_err());
    }

    #[test]
    fn excerpt_is_bounded() {
        let raw = "x".repeat(2_000);
        let ExtractError::Unparseable { excerpt, .. } = extract_json(&raw).unwrap_err();
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS);
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let raw = "é".repeat(600);
        let ExtractError::Unparseable { excerpt, .. } = extract_json(&raw).unwrap_err();
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS);
    }

    #[test]
    fn excerpt_is_taken_after_fence_stripping() {
        let ExtractError::Unparseable { excerpt, .. } =
            extract_json("```json\nnot json at all\n```").unwrap_err();
        assert_eq!(excerpt, "not json at all");
    }
}
