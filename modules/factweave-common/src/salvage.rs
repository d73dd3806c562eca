//! Salvage JSON out of free-form LLM output.
//!
//! Models asked for "ONLY a JSON array" still wrap it in prose or a fenced
//! code block often enough that strict parsing alone loses usable responses.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn fenced_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("valid regex"))
}

/// Extract the first JSON array from text: direct parse, then the outermost
/// `[...]` span, then fenced code blocks.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    let trimmed = text.trim();

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
        return Some(items);
    }

    if let Some(items) = outermost_span(trimmed, '[', ']').and_then(parse_array) {
        return Some(items);
    }

    for cap in fenced_block_re().captures_iter(trimmed) {
        if let Some(items) = parse_array(cap[1].trim().to_string()) {
            return Some(items);
        }
    }

    None
}

/// Extract the first JSON object from text: direct parse, then the outermost
/// `{...}` span, then fenced code blocks.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(value) = outermost_span(trimmed, '{', '}').and_then(parse_object) {
        return Some(value);
    }

    for cap in fenced_block_re().captures_iter(trimmed) {
        if let Some(value) = parse_object(cap[1].trim().to_string()) {
            return Some(value);
        }
    }

    None
}

fn outermost_span(text: &str, open: char, close: char) -> Option<String> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(text[start..=end].to_string())
}

fn parse_array(candidate: String) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn parse_object(candidate: String) -> Option<Value> {
    match serde_json::from_str::<Value>(&candidate) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_array() {
        let items = extract_json_array(r#"[{"title": "A"}, {"title": "B"}]"#).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn parses_array_wrapped_in_prose() {
        let text = "Here is your list:\n[{\"title\": \"A\"}]\nHope that helps!";
        let items = extract_json_array(text).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "A");
    }

    #[test]
    fn parses_fenced_array() {
        let text = "```json\n[{\"title\": \"A\"}]\n```";
        let items = extract_json_array(text).unwrap();
        assert_eq!(items[0]["title"], "A");
    }

    #[test]
    fn rejects_text_without_array() {
        assert!(extract_json_array("no structured data here").is_none());
        assert!(extract_json_array("broken [1, 2").is_none());
    }

    #[test]
    fn parses_object_wrapped_in_prose() {
        let text = "My analysis follows.\n{\"verdict\": \"TRUE\", \"confidence\": 0.9}";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["verdict"], "TRUE");
    }

    #[test]
    fn parses_fenced_object() {
        let text = "```\n{\"verdict\": \"FALSE\"}\n```";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["verdict"], "FALSE");
    }

    #[test]
    fn object_span_with_nested_braces() {
        let text = "note {\"a\": {\"b\": 1}} trailing";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["a"]["b"], 1);
    }
}
