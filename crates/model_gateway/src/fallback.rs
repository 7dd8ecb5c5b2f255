//! Fallback completions.
//!
//! When a specialized agent fails, a general model answers from a single
//! system prompt that carries the conversation.

use std::sync::Arc;

use concierge_core::{
    config::FallbackConfig,
    traits::{ChatMessage, CompletionOptions, LlmClient},
    Result,
};

pub struct FallbackService {
    client: Arc<dyn LlmClient>,
    prompt: String,
    options: CompletionOptions,
}

impl FallbackService {
    pub fn new(client: Arc<dyn LlmClient>, config: &FallbackConfig) -> Self {
        Self {
            client,
            prompt: config.prompt.clone(),
            options: config.options(),
        }
    }

    /// Send `prompt` as the only (system) message and return the reply text.
    pub async fn call(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.options.model, prompt_len = prompt.len(), "Calling fallback model");
        let response = self
            .client
            .chat(&[ChatMessage::system(prompt)], &self.options)
            .await?;
        Ok(response.content)
    }

    /// Answer a conversation with the configured fallback persona.
    pub async fn respond(&self, formatted_history: &str) -> Result<String> {
        self.call(&self.prompt_for(formatted_history)).await
    }

    fn prompt_for(&self, formatted_history: &str) -> String {
        format!("{}\n\nConversation so far:\n{}", self.prompt, formatted_history)
    }
}
