//! Merging a cart agent's reply with a narrative agent's reply.
//!
//! The cart agent is authoritative for cart contents; the other agent is
//! authoritative for the answer and image. Neither knows about the other.

use concierge_core::types::MergedRecord;
use serde_json::Value;

use crate::extraction::{candidate_json, decode, Decoded};
use crate::parser::parse_agent_response;
use crate::values::cart_entries;

/// Combine two raw agent replies into one display record.
pub fn merge_cart_reply(cart_raw: &str, secondary_raw: &str) -> MergedRecord {
    let cart = cart_from_reply(cart_raw);
    let secondary = parse_agent_response(secondary_raw);

    MergedRecord {
        answer: secondary.answer,
        image_output: secondary.image_url,
        cart,
    }
}

/// A bare list is the cart; an object contributes its `cart` key.
fn cart_from_reply(raw: &str) -> Vec<Value> {
    match decode(candidate_json(raw)) {
        Decoded::List(items) => items,
        Decoded::Mapping(map) => cart_entries(map.get("cart")),
        Decoded::Scalar(_) => Vec::new(),
        Decoded::Failure(reason) => {
            tracing::debug!(error = %reason, "Cart reply is not JSON, using empty cart");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_list_cart_with_object_reply() {
        let merged = merge_cart_reply(
            r#"[{"sku":"a"}]"#,
            r#"{"answer":"hi","image_url":"pic.png"}"#,
        );
        assert_eq!(
            merged,
            MergedRecord {
                answer: "hi".into(),
                image_output: "pic.png".into(),
                cart: vec![json!({"sku": "a"})],
            }
        );
    }

    #[test]
    fn test_merge_object_cart_in_fence() {
        let cart = "Updated:\n```json\n{\"cart\": [{\"sku\": \"b\", \"qty\": 2}], \"answer\": \"ignored\"}\n```";
        let merged = merge_cart_reply(cart, "Added to your cart.");
        assert_eq!(merged.cart, vec![json!({"sku": "b", "qty": 2})]);
        assert_eq!(merged.answer, "Added to your cart.");
        assert_eq!(merged.image_output, "");
    }

    #[test]
    fn test_merge_object_without_cart_key() {
        let merged = merge_cart_reply(r#"{"items":[1]}"#, "ok");
        assert!(merged.cart.is_empty());
    }

    #[test]
    fn test_merge_malformed_cart_is_empty() {
        let merged = merge_cart_reply("cart is {broken", r#"[{"answer":"A","image_output":"I"}]"#);
        assert!(merged.cart.is_empty());
        assert_eq!(merged.answer, "A");
        assert_eq!(merged.image_output, "I");
    }

    #[test]
    fn test_merge_discards_secondary_cart() {
        let merged = merge_cart_reply("[]", r#"{"answer":"a","cart":[{"sku":"z"}]}"#);
        assert!(merged.cart.is_empty());
    }
}
