//! Router for picking the agent that answers a turn.
//!
//! A small router model reads the conversation and names an agent; the
//! decision function scans that reply for agent ids in a fixed order.

use std::collections::HashMap;
use std::sync::Arc;

use concierge_core::{
    config::RouterConfig,
    traits::{ChatMessage, CompletionOptions, LlmClient},
    types::{AgentId, ROUTING_PRIORITY},
    Result,
};

/// Prefix of the router reply when the router model's content filter
/// rejected the conversation. The provider error text follows it.
pub const CONTENT_FILTER_SENTINEL: &str = "__CONTENT_FILTER_ERROR__";

/// Pick the agent named in a router reply.
///
/// Ids are matched as case-insensitive substrings in [`ROUTING_PRIORITY`]
/// order and the first hit wins. The endpoint is `None` when the matched
/// agent has no entry in `endpoints`; both are `None` when nothing matched.
pub fn select_agent<'a, E>(
    reply: &str,
    endpoints: &'a HashMap<AgentId, E>,
) -> (Option<&'a E>, Option<AgentId>) {
    let lower = reply.to_lowercase();
    match ROUTING_PRIORITY.iter().find(|id| lower.contains(id.as_str())) {
        Some(id) => (endpoints.get(id), Some(*id)),
        None => (None, None),
    }
}

/// Whether a router reply is the content-filter sentinel.
pub fn is_content_filter_reply(reply: &str) -> bool {
    reply.starts_with(CONTENT_FILTER_SENTINEL)
}

/// Client for the router model.
pub struct RouterService {
    client: Arc<dyn LlmClient>,
    prompt: String,
    options: CompletionOptions,
}

impl RouterService {
    pub fn new(client: Arc<dyn LlmClient>, config: &RouterConfig) -> Self {
        Self {
            client,
            prompt: config.prompt.clone(),
            options: config.options(),
        }
    }

    /// Ask the router model which agent should answer.
    ///
    /// Content-filter rejections come back as `Ok` carrying
    /// [`CONTENT_FILTER_SENTINEL`] followed by the error text. Every other
    /// failure is returned as an error.
    pub async fn call_router(&self, formatted_history: &str) -> Result<String> {
        let messages = [
            ChatMessage::system(self.prompt.as_str()),
            ChatMessage::user(formatted_history),
        ];

        tracing::debug!(
            model = %self.options.model,
            history_len = formatted_history.len(),
            "Calling router model"
        );

        match self.client.chat(&messages, &self.options).await {
            Ok(response) => {
                tracing::debug!(reply = %response.content, "Router replied");
                Ok(response.content)
            }
            Err(e) if e.is_content_filter() => {
                tracing::warn!(error = %e, "Router model rejected the conversation");
                Ok(format!("{}{}", CONTENT_FILTER_SENTINEL, e))
            }
            Err(e) => {
                tracing::error!(error = %e, "Router model call failed");
                Err(e)
            }
        }
    }
}
