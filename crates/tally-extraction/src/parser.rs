//! Model response sanitizing and parsing
//!
//! Models are asked for bare JSON but frequently wrap it in a markdown code
//! fence anyway. The fence is stripped before a strict JSON parse; anything that
//! still does not parse is a format failure, which is reported separately from a
//! schema failure.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*").expect("valid leading fence pattern"));

static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```$").expect("valid trailing fence pattern"));

const EXCERPT_CHARS: usize = 200;

/// The model reply is not JSON even after removing code fences.
#[derive(Debug, thiserror::Error)]
#[error("model response is not valid JSON: {source}")]
pub struct ResponseFormatError {
    #[source]
    pub source: serde_json::Error,
    /// Start of the offending text, for logs
    pub excerpt: String,
}

/// Remove a leading ```` ``` ```` (with optional language tag) and a trailing ```` ``` ````.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let after_start = match LEADING_FENCE.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    let after_start = after_start.trim();
    let body = match TRAILING_FENCE.find(after_start) {
        Some(m) => &after_start[..m.start()],
        None => after_start,
    };
    body.trim()
}

/// Parse a raw model reply into a JSON value.
pub fn parse_model_response(raw: &str) -> Result<Value, ResponseFormatError> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|source| ResponseFormatError {
        source,
        excerpt: raw.chars().take(EXCERPT_CHARS).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID: &str = r#"{"date":"2024-01-15","currency":"USD","vendor_name":"Test Store","receipt_items":[{"item_name":"Coffee","item_cost":4.5}],"tax":1.35,"total":14.84}"#;

    #[test]
    fn test_plain_json() {
        let value = parse_model_response(VALID).unwrap();
        assert_eq!(value["vendor_name"], "Test Store");
    }

    #[test]
    fn test_fenced_json_matches_unwrapped() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(
            parse_model_response(&fenced).unwrap(),
            parse_model_response(VALID).unwrap()
        );
    }

    #[test]
    fn test_fence_without_language_tag() {
        let fenced = format!("```\n{}\n```", VALID);
        assert_eq!(
            parse_model_response(&fenced).unwrap(),
            parse_model_response(VALID).unwrap()
        );
    }

    #[test]
    fn test_fence_on_single_line_and_surrounding_whitespace() {
        let fenced = format!("  \n```JSON{}```\n\n", VALID);
        assert_eq!(
            parse_model_response(&fenced).unwrap(),
            parse_model_response(VALID).unwrap()
        );
    }

    #[test]
    fn test_only_outer_fences_are_removed() {
        let value = parse_model_response("```json\n{\"note\": \"use ``` for code\"}\n```").unwrap();
        assert_eq!(value, json!({"note": "use ``` for code"}));
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let err = parse_model_response("invalid json response").unwrap_err();
        assert_eq!(err.excerpt, "invalid json response");
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_prose_around_json_is_format_error() {
        let raw = format!("Here is the data you asked for:\n{}", VALID);
        assert!(parse_model_response(&raw).is_err());
    }

    #[test]
    fn test_empty_response_is_format_error() {
        assert!(parse_model_response("").is_err());
        assert!(parse_model_response("```json\n```").is_err());
    }

    #[test]
    fn test_non_object_json_still_parses() {
        // Shape is the schema validator's concern
        assert_eq!(parse_model_response("[1, 2]").unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let raw = "x".repeat(1000);
        let err = parse_model_response(&raw).unwrap_err();
        assert_eq!(err.excerpt.chars().count(), 200);
    }
}
