//! Keyword lists embedded as JSON in the page or returned by an API.

use scraper::{Html, Selector};
use serde_json::Value;

use super::KeywordSink;

/// Walk `value`, offering every string item of arrays stored under `keys`.
fn walk(value: &Value, keys: &[String], sink: &mut KeywordSink) {
    match value {
        Value::Object(map) => {
            for key in keys {
                if let Some(Value::Array(items)) = map.get(key) {
                    for item in items {
                        if let Value::String(keyword) = item {
                            sink.offer(keyword);
                        }
                    }
                }
            }
            for nested in map.values() {
                if sink.is_full() {
                    return;
                }
                walk(nested, keys, sink);
            }
        }
        Value::Array(items) => {
            for nested in items {
                if sink.is_full() {
                    return;
                }
                walk(nested, keys, sink);
            }
        }
        _ => {}
    }
}

/// Extract up to `limit` unique keywords from a parsed JSON document.
pub fn keywords_from_json(value: &Value, keys: &[String], limit: usize) -> Vec<String> {
    let mut sink = KeywordSink::new(limit);
    walk(value, keys, &mut sink);
    sink.into_keywords()
}

/// Extract up to `limit` unique keywords from `<script type="application/json">`
/// payloads in an HTML page.
///
/// Payloads that fail to parse are skipped.
pub fn extract_embedded_keywords(html: &str, keys: &[String], limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(r#"script[type="application/json"]"#) else {
        return Vec::new();
    };

    let mut sink = KeywordSink::new(limit);
    for (index, script) in document.select(&selector).enumerate() {
        if sink.is_full() {
            break;
        }
        let payload = script.text().collect::<String>();
        match serde_json::from_str::<Value>(&payload) {
            Ok(value) => walk(&value, keys, &mut sink),
            Err(e) => tracing::debug!(script = index, error = %e, "skipping unparseable JSON payload"),
        }
    }

    sink.into_keywords()
}
