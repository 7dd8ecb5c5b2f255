//! Tolerant parser for agent replies.
//!
//! Agents answer with JSON objects, JSON arrays, fenced JSON, JSON buried in
//! prose, or plain text. Whatever arrives, parsing yields a
//! [`ResponseRecord`] and never fails.

use concierge_core::types::ResponseRecord;
use serde_json::{Map, Value};

use crate::extraction::{candidate_json, decode, Decoded};
use crate::values::{cart_entries, discount_text, field_text, to_json_text, value_to_text};

/// Parse a raw agent reply into the canonical response record.
pub fn parse_agent_response(raw: &str) -> ResponseRecord {
    match decode(candidate_json(raw)) {
        Decoded::List(items) => from_list(items),
        Decoded::Mapping(map) => from_mapping(&map),
        Decoded::Scalar(value) => {
            tracing::debug!("Agent reply decoded to a scalar");
            ResponseRecord::answer_only(value_to_text(&value))
        }
        Decoded::Failure(reason) => {
            tracing::debug!(error = %reason, raw_len = raw.len(), "Agent reply is not JSON");
            ResponseRecord::answer_only(raw)
        }
    }
}

/// Only the first element is read, and only when it is an object.
fn from_list(items: Vec<Value>) -> ResponseRecord {
    if let Some(Value::Object(first)) = items.first() {
        tracing::debug!(len = items.len(), "Agent reply is a list of objects");
        return ResponseRecord {
            answer: field_text(first.get("answer")),
            agent: String::new(),
            products: list_products(first.get("products")),
            discount_percentage: discount_text(first.get("discount_percentage")),
            image_url: field_text(first.get("image_output")),
            video_url: String::new(),
            additional_data: String::new(),
            cart: Some(cart_entries(first.get("cart"))),
        };
    }

    tracing::debug!(len = items.len(), "Agent reply is a list without a leading object");
    ResponseRecord::answer_without_cart(to_json_text(&items))
}

/// Products from a list-shaped reply are always text. Structured values,
/// empty ones included, are encoded; missing or `null` is empty.
fn list_products(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::String(String::new()),
        Some(Value::String(s)) => Value::String(s.clone()),
        Some(v) => Value::String(to_json_text(v)),
    }
}

fn from_mapping(map: &Map<String, Value>) -> ResponseRecord {
    tracing::debug!(keys = map.len(), "Agent reply is an object");

    let answer = match map.get("answer") {
        Some(Value::String(s)) => unwrap_nested_answer(s).unwrap_or_else(|| s.clone()),
        other => field_text(other),
    };

    let products = match map.get("products") {
        None | Some(Value::Null) => Value::String(String::new()),
        Some(v) => v.clone(),
    };

    ResponseRecord {
        answer,
        agent: field_text(map.get("agent")),
        products,
        discount_percentage: discount_text(map.get("discount_percentage")),
        image_url: field_text(map.get("image_url")),
        video_url: field_text(map.get("video_url")),
        additional_data: field_text(map.get("additional_data")),
        cart: Some(cart_entries(map.get("cart"))),
    }
}

/// Some agents double-encode: the `answer` string is itself a JSON list
/// whose first object carries the real answer.
fn unwrap_nested_answer(answer: &str) -> Option<String> {
    if !(answer.starts_with('[') && answer.ends_with(']')) {
        return None;
    }
    let nested: Vec<Value> = match serde_json::from_str(answer) {
        Ok(Value::Array(items)) => items,
        Ok(_) => return None,
        Err(e) => {
            tracing::debug!(error = %e, "Nested answer is not valid JSON, keeping outer value");
            return None;
        }
    };
    match nested.first() {
        Some(Value::Object(first)) => first.get("answer").map(|a| field_text(Some(a))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_falls_back_to_answer() {
        let record = parse_agent_response("hello world");
        assert_eq!(record, ResponseRecord::answer_only("hello world"));
    }

    #[test]
    fn test_fallback_echoes_whole_raw_input() {
        let raw = "Sorry {this is not json}";
        let record = parse_agent_response(raw);
        assert_eq!(record.answer, raw);
        assert_eq!(record.cart, Some(vec![]));
    }

    #[test]
    fn test_list_of_objects() {
        let raw = r#"[{"answer":"A","products":[{"id":1}],"image_output":"I","discount_percentage":10,"cart":[{"sku":"x"}]}]"#;
        let record = parse_agent_response(raw);
        assert_eq!(record.answer, "A");
        assert_eq!(record.products, json!(r#"[{"id": 1}]"#));
        assert_eq!(record.image_url, "I");
        assert_eq!(record.discount_percentage, "10");
        assert_eq!(record.agent, "");
        assert_eq!(record.video_url, "");
        assert_eq!(record.additional_data, "");
        assert_eq!(record.cart, Some(vec![json!({"sku": "x"})]));
    }

    #[test]
    fn test_list_ignores_agent_and_video_keys() {
        let raw = r#"[{"answer":"A","agent":"cora","video_url":"v.mp4","additional_data":"d"}]"#;
        let record = parse_agent_response(raw);
        assert_eq!(record.agent, "");
        assert_eq!(record.video_url, "");
        assert_eq!(record.additional_data, "");
        assert_eq!(record.cart, Some(vec![]));
    }

    #[test]
    fn test_list_only_reads_first_element() {
        let raw = r#"[{"answer":"first"},{"answer":"second","discount_percentage":5}]"#;
        let record = parse_agent_response(raw);
        assert_eq!(record.answer, "first");
        assert_eq!(record.discount_percentage, "");
    }

    #[test]
    fn test_list_products_keep_text_and_encode_the_rest() {
        let text = parse_agent_response(r#"[{"answer":"a","products":"PROD1"}]"#);
        assert_eq!(text.products, json!("PROD1"));

        for (products, expected) in [("[]", "[]"), ("{}", "{}"), ("0", "0"), ("false", "false")] {
            let raw = format!(r#"[{{"answer":"a","products":{}}}]"#, products);
            assert_eq!(parse_agent_response(&raw).products, json!(expected), "products = {}", products);
        }

        let null = parse_agent_response(r#"[{"answer":"a","products":null}]"#);
        assert_eq!(null.products, json!(""));
        let missing = parse_agent_response(r#"[{"answer":"a"}]"#);
        assert_eq!(missing.products, json!(""));
    }

    #[test]
    fn test_list_with_non_object_first_element() {
        let record = parse_agent_response(r#"["x"]"#);
        assert_eq!(record.answer, r#"["x"]"#);
        assert!(!record.has_cart());
        assert_eq!(record.products, json!(""));
    }

    #[test]
    fn test_empty_list() {
        let record = parse_agent_response("[]");
        assert_eq!(record.answer, "[]");
        assert!(!record.has_cart());
    }

    #[test]
    fn test_mapping_reads_fields_directly() {
        let raw = r#"{
            "answer": "This is a test answer",
            "agent": "test_agent",
            "products": "test_products",
            "image_url": "test_image.jpg",
            "video_url": "clip.mp4",
            "additional_data": "extra",
            "discount_percentage": 15
        }"#;
        let record = parse_agent_response(raw);
        assert_eq!(record.answer, "This is a test answer");
        assert_eq!(record.agent, "test_agent");
        assert_eq!(record.products, json!("test_products"));
        assert_eq!(record.image_url, "test_image.jpg");
        assert_eq!(record.video_url, "clip.mp4");
        assert_eq!(record.additional_data, "extra");
        assert_eq!(record.discount_percentage, "15");
        assert_eq!(record.cart, Some(vec![]));
    }

    #[test]
    fn test_mapping_passes_structured_products_through() {
        let record = parse_agent_response(r#"{"answer":"a","products":[{"id":"P1"}]}"#);
        assert_eq!(record.products, json!([{"id": "P1"}]));
    }

    #[test]
    fn test_mapping_missing_keys_default_to_empty() {
        let record = parse_agent_response("{}");
        assert_eq!(record, ResponseRecord::answer_only(""));
    }

    #[test]
    fn test_mapping_zero_discount_is_empty() {
        let record = parse_agent_response(r#"{"answer":"a","discount_percentage":0}"#);
        assert_eq!(record.discount_percentage, "");
    }

    #[test]
    fn test_nested_answer_unwrap() {
        let raw = r#"{"answer":"[{\"answer\":\"inner\"}]","agent":"cora"}"#;
        let record = parse_agent_response(raw);
        assert_eq!(record.answer, "inner");
        assert_eq!(record.agent, "cora");
    }

    #[test]
    fn test_nested_answer_malformed_keeps_outer() {
        let raw = r#"{"answer":"[not json]"}"#;
        assert_eq!(parse_agent_response(raw).answer, "[not json]");
    }

    #[test]
    fn test_nested_answer_without_answer_key_keeps_outer() {
        let raw = r#"{"answer":"[{\"text\":\"inner\"}]"}"#;
        assert_eq!(parse_agent_response(raw).answer, r#"[{"text":"inner"}]"#);

        let raw = r#"{"answer":"[]"}"#;
        assert_eq!(parse_agent_response(raw).answer, "[]");
    }

    #[test]
    fn test_nested_null_answer_matches_top_level_null() {
        let nested = parse_agent_response(r#"{"answer":"[{\"answer\":null}]"}"#);
        let top = parse_agent_response(r#"{"answer":null}"#);
        assert_eq!(nested.answer, "");
        assert_eq!(nested.answer, top.answer);
    }

    #[test]
    fn test_scalar_reply() {
        assert_eq!(parse_agent_response("42"), ResponseRecord::answer_only("42"));
        assert_eq!(parse_agent_response("true").answer, "true");
        assert_eq!(parse_agent_response("\"quoted\"").answer, "quoted");
    }

    #[test]
    fn test_fenced_reply() {
        let raw = "Here you go:\n```json\n{\"answer\": \"Blue works\", \"image_url\": \"b.png\"}\n```";
        let record = parse_agent_response(raw);
        assert_eq!(record.answer, "Blue works");
        assert_eq!(record.image_url, "b.png");
    }
}
