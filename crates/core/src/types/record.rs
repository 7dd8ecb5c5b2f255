use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Canonical Response Record
// =============================================================================

/// Normalized reply handed to the rendering layer.
///
/// Every parse produces a fresh record. `cart` is `None` only on the
/// "list whose first element is not an object" path; everywhere else it is
/// present, possibly empty. The distinction survives serialization: a `None`
/// cart omits the key entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Human-readable reply body. Never absent.
    pub answer: String,
    /// Agent that produced the reply, empty if unknown.
    pub agent: String,
    /// Product payload: JSON text, empty text, or a structure passed through
    /// from an object-shaped reply.
    pub products: Value,
    /// Discount rendered as text, empty when absent or falsy.
    pub discount_percentage: String,
    pub image_url: String,
    pub video_url: String,
    pub additional_data: String,
    /// Cart entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<Vec<Value>>,
}

impl ResponseRecord {
    /// Record carrying only an answer, with an empty cart.
    pub fn answer_only(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            agent: String::new(),
            products: Value::String(String::new()),
            discount_percentage: String::new(),
            image_url: String::new(),
            video_url: String::new(),
            additional_data: String::new(),
            cart: Some(Vec::new()),
        }
    }

    /// Record carrying only an answer and no cart key at all.
    pub fn answer_without_cart(answer: impl Into<String>) -> Self {
        Self {
            cart: None,
            ..Self::answer_only(answer)
        }
    }

    /// Whether the record carries a `cart` key.
    pub fn has_cart(&self) -> bool {
        self.cart.is_some()
    }

    /// Cart entries, empty when the key is absent.
    pub fn cart_items(&self) -> &[Value] {
        self.cart.as_deref().unwrap_or(&[])
    }

    /// Stamp the producing agent if the reply did not name one.
    pub fn with_default_agent(mut self, agent: impl Into<String>) -> Self {
        if self.agent.is_empty() {
            self.agent = agent.into();
        }
        self
    }
}

impl Default for ResponseRecord {
    fn default() -> Self {
        Self::answer_only(String::new())
    }
}

/// Reduced record produced by merging a cart agent's reply with another
/// agent's reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    /// Answer from the narrative agent.
    pub answer: String,
    /// Image from the narrative agent.
    pub image_output: String,
    /// Cart contents from the cart agent.
    pub cart: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_key_presence_survives_serialization() {
        let with_cart = serde_json::to_value(ResponseRecord::answer_only("a")).unwrap();
        assert_eq!(with_cart["cart"], json!([]));

        let without = serde_json::to_value(ResponseRecord::answer_without_cart("a")).unwrap();
        assert!(without.get("cart").is_none());
        assert_eq!(without["products"], json!(""));
    }

    #[test]
    fn test_with_default_agent_keeps_existing() {
        let mut record = ResponseRecord::answer_only("x");
        record.agent = "inventory_agent".into();
        assert_eq!(record.with_default_agent("cora").agent, "inventory_agent");
        assert_eq!(ResponseRecord::answer_only("x").with_default_agent("cora").agent, "cora");
    }
}
