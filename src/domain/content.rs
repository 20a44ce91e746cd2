//! Classification of a CMS content field.
//!
//! A record's body is a single string that may hold either raw HTML or a
//! JSON-encoded op-log. Classification is explicit: callers branch on the
//! returned variant instead of duck-typing the string downstream.

use serde_json::Value;

use super::delta::DeltaDocument;

#[derive(Debug, Clone, PartialEq)]
pub enum ContentField {
    /// Rich-editor op-log; goes through the document converter.
    Ops(DeltaDocument),
    /// Anything else is treated as HTML, including JSON that fails to
    /// parse or parses to a shape without an `ops` array.
    Html(String),
    /// Whitespace-only input.
    Empty,
}

pub fn parse_content_field(raw: &str) -> ContentField {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ContentField::Empty;
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            if let Some(doc) = extract_ops(value) {
                return ContentField::Ops(doc);
            }
        }
    }

    ContentField::Html(raw.to_string())
}

fn extract_ops(value: Value) -> Option<DeltaDocument> {
    let has_ops = match &value {
        Value::Object(map) => map.get("ops").is_some_and(Value::is_array),
        Value::Array(_) => true,
        _ => false,
    };
    if !has_ops {
        return None;
    }

    match value {
        Value::Array(ops) => serde_json::from_value(Value::Object(
            [("ops".to_string(), Value::Array(ops))].into_iter().collect(),
        ))
        .ok(),
        value => serde_json::from_value(value).ok(),
    }
}
