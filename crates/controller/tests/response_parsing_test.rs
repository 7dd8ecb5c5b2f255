use concierge_controller::{
    extract_bot_reply, merge_cart_reply, parse_agent_response,
};
use concierge_core::types::ResponseRecord;
use serde_json::json;

// ============================================================================
// Realistic agent replies
// ============================================================================

const PAINT_LIST_REPLY: &str = r#"[
  {
    "answer": "Here are some amazing blue paint options for your project. Could you share the room dimensions?",
    "image_output": "",
    "products": [
      {
        "id": "PROD0022",
        "name": "Frosted Blue",
        "type": "Paint Accessory",
        "price": "$48.99"
      }
    ]
  }
]"#;

#[test]
fn test_paint_list_reply() {
    let record = parse_agent_response(PAINT_LIST_REPLY);

    assert!(record.answer.starts_with("Here are some amazing blue paint options"));
    assert_eq!(record.image_url, "");
    assert_eq!(
        record.products,
        json!(r#"[{"id": "PROD0022", "name": "Frosted Blue", "type": "Paint Accessory", "price": "$48.99"}]"#)
    );
    assert_eq!(record.cart, Some(vec![]));
}

#[test]
fn test_products_text_decodes_back_to_structure() {
    let record = parse_agent_response(PAINT_LIST_REPLY);
    let text = record.products.as_str().expect("products should be text");
    let decoded: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(decoded[0]["id"], "PROD0022");
}

#[test]
fn test_fenced_loyalty_reply_with_prose() {
    let raw = "Great news!\n```json\n{\"answer\": \"You qualify for a discount.\", \"discount_percentage\": 15, \"agent\": \"customer_loyalty\"}\n```\nLet me know.";
    let record = parse_agent_response(raw);
    assert_eq!(record.answer, "You qualify for a discount.");
    assert_eq!(record.discount_percentage, "15");
    assert_eq!(record.agent, "customer_loyalty");
}

#[test]
fn test_answer_is_always_populated_for_odd_inputs() {
    let inputs = [
        "",
        "   ",
        "{",
        "]",
        "[{]",
        "null",
        "```json\n```",
        "```json\n{\"answer\": }\n```",
        "{\"answer\": null}",
        "[[1, 2], {\"answer\": \"x\"}]",
    ];
    for raw in inputs {
        let record = parse_agent_response(raw);
        let encoded = serde_json::to_value(&record).unwrap();
        assert!(encoded["answer"].is_string(), "answer missing for {:?}", raw);
    }
}

#[test]
fn test_unparsable_input_yields_exact_fallback() {
    let raw = "I could not find that item {sku: 12}";
    let encoded = serde_json::to_value(parse_agent_response(raw)).unwrap();
    assert_eq!(
        encoded,
        json!({
            "answer": raw,
            "agent": "",
            "products": "",
            "discount_percentage": "",
            "image_url": "",
            "video_url": "",
            "additional_data": "",
            "cart": []
        })
    );
}

#[test]
fn test_non_object_list_omits_cart_key() {
    let encoded = serde_json::to_value(parse_agent_response(r#"["simple string in list"]"#)).unwrap();
    assert_eq!(encoded["answer"], r#"["simple string in list"]"#);
    assert!(encoded.get("cart").is_none());
}

#[test]
fn test_record_round_trips_through_serde() {
    let record = parse_agent_response(r#"{"answer":"a","cart":[{"sku":"q"}]}"#);
    let text = serde_json::to_string(&record).unwrap();
    let back: ResponseRecord = serde_json::from_str(&text).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_merge_then_scrape() {
    let merged = merge_cart_reply(
        r#"{"cart": [{"sku": "PROD0022", "qty": 1}]}"#,
        r#"```json
[{"answer": "Added Frosted Blue to your cart.", "image_output": "https://img/blue.png"}]
```"#,
    );
    assert_eq!(merged.answer, "Added Frosted Blue to your cart.");
    assert_eq!(merged.image_output, "https://img/blue.png");
    assert_eq!(merged.cart.len(), 1);

    let stringified = format!("{{'type': 'text', 'text': {{'value': '{}'}}}}", merged.answer);
    assert_eq!(extract_bot_reply(&stringified), merged.answer);
}
