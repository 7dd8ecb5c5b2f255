//! Rig LLM client adapter.
//!
//! Wraps Rig's Agent for integration with our LlmClient trait.

use async_trait::async_trait;
use serde_json::{Map, Value};

use concierge_core::{
    traits::{ChatMessage, CompletionOptions, LlmClient, LlmResponse, LlmUsage},
    Error, Result,
};

// Import required Rig traits
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;

/// Provider type for Rig clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigProvider {
    OpenAI,
    Anthropic,
}

/// Configuration for Rig client.
#[derive(Debug, Clone)]
pub struct RigConfig {
    /// Provider to use.
    pub provider: RigProvider,
    /// Model used when a request does not name one.
    pub default_model: String,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            provider: RigProvider::OpenAI,
            default_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl RigConfig {
    /// Create config for OpenAI.
    pub fn openai(model: impl Into<String>) -> Self {
        Self {
            provider: RigProvider::OpenAI,
            default_model: model.into(),
        }
    }

    /// Create config for Anthropic.
    pub fn anthropic(model: impl Into<String>) -> Self {
        Self {
            provider: RigProvider::Anthropic,
            default_model: model.into(),
        }
    }
}

/// Rig-based LLM client.
///
/// System messages become the agent preamble; the remaining messages are
/// flattened into a single prompt.
pub struct RigLlmClient {
    config: RigConfig,
}

impl RigLlmClient {
    /// Create a new Rig client with the given configuration.
    pub fn new(config: RigConfig) -> Self {
        Self { config }
    }

    fn model<'a>(&'a self, options: &'a CompletionOptions) -> &'a str {
        if options.model.is_empty() {
            &self.config.default_model
        } else {
            &options.model
        }
    }

    /// Join system messages into a preamble.
    fn build_preamble(&self, messages: &[ChatMessage]) -> Option<String> {
        let parts: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == "system")
            .map(|m| m.content.as_str())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }

    /// Build non-system messages into a prompt string.
    fn build_prompt(&self, messages: &[ChatMessage]) -> String {
        let mut prompt = String::new();

        for msg in messages {
            match msg.role.as_str() {
                "system" => {}
                "user" => {
                    prompt.push_str(&format!("User: {}\n\n", msg.content));
                }
                "assistant" => {
                    prompt.push_str(&format!("Assistant: {}\n\n", msg.content));
                }
                _ => {
                    prompt.push_str(&format!("{}: {}\n\n", msg.role, msg.content));
                }
            }
        }

        prompt
    }

    /// Sampling parameters Rig has no dedicated builder method for.
    fn extra_params(&self, options: &CompletionOptions) -> Option<Value> {
        let mut params = Map::new();
        if let Some(top_p) = options.top_p {
            params.insert("top_p".into(), Value::from(top_p));
        }
        if let Some(p) = options.presence_penalty {
            params.insert("presence_penalty".into(), Value::from(p));
        }
        if let Some(f) = options.frequency_penalty {
            params.insert("frequency_penalty".into(), Value::from(f));
        }
        if params.is_empty() {
            None
        } else {
            Some(Value::Object(params))
        }
    }

    fn usage(prompt: &str, response: &str) -> LlmUsage {
        LlmUsage {
            prompt_tokens: (prompt.len() / 4) as u64,
            completion_tokens: (response.len() / 4) as u64,
            total_tokens: ((prompt.len() + response.len()) / 4) as u64,
        }
    }

    /// Call OpenAI via Rig.
    async fn call_openai(
        &self,
        preamble: Option<&str>,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<LlmResponse> {
        use rig::providers::openai;

        // Check env var first to avoid panic
        if std::env::var("OPENAI_API_KEY").is_err() {
            return Err(Error::ModelProvider("OPENAI_API_KEY not set".to_string()));
        }

        let client = openai::Client::from_env();

        let mut agent_builder = client.agent(self.model(options));

        if let Some(system) = preamble {
            agent_builder = agent_builder.preamble(system);
        }
        if let Some(temperature) = options.temperature {
            agent_builder = agent_builder.temperature(temperature as f64);
        }
        if let Some(max_tokens) = options.max_tokens {
            agent_builder = agent_builder.max_tokens(max_tokens as u64);
        }
        if let Some(params) = self.extra_params(options) {
            agent_builder = agent_builder.additional_params(params);
        }

        let agent = agent_builder.build();

        let response: String = agent
            .prompt(prompt)
            .await
            .map_err(|e| Error::ModelProvider(format!("OpenAI error: {}", e)))?;

        Ok(LlmResponse {
            usage: Self::usage(prompt, &response),
            content: response,
            finish_reason: "stop".to_string(),
        })
    }

    /// Call Anthropic via Rig.
    async fn call_anthropic(
        &self,
        preamble: Option<&str>,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<LlmResponse> {
        use rig::providers::anthropic;

        // Check env var first to avoid panic
        if std::env::var("ANTHROPIC_API_KEY").is_err() {
            return Err(Error::ModelProvider("ANTHROPIC_API_KEY not set".to_string()));
        }

        let client = anthropic::Client::from_env();

        let mut agent_builder = client.agent(self.model(options));

        if let Some(system) = preamble {
            agent_builder = agent_builder.preamble(system);
        }
        if let Some(temperature) = options.temperature {
            agent_builder = agent_builder.temperature(temperature as f64);
        }
        // Anthropic requires an explicit completion budget.
        agent_builder = agent_builder.max_tokens(options.max_tokens.unwrap_or(4096) as u64);

        let agent = agent_builder.build();

        let response: String = agent
            .prompt(prompt)
            .await
            .map_err(|e| Error::ModelProvider(format!("Anthropic error: {}", e)))?;

        Ok(LlmResponse {
            usage: Self::usage(prompt, &response),
            content: response,
            finish_reason: "stop".to_string(),
        })
    }
}

#[async_trait]
impl LlmClient for RigLlmClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<LlmResponse> {
        let preamble = self.build_preamble(messages);
        let prompt = self.build_prompt(messages);

        tracing::debug!(
            provider = ?self.config.provider,
            model = %self.model(options),
            prompt_len = prompt.len(),
            "Calling LLM"
        );

        match self.config.provider {
            RigProvider::OpenAI => self.call_openai(preamble.as_deref(), &prompt, options).await,
            RigProvider::Anthropic => {
                self.call_anthropic(preamble.as_deref(), &prompt, options).await
            }
        }
    }
}

/// Create a default LLM client based on available API keys.
pub fn create_default_client() -> Result<RigLlmClient> {
    if std::env::var("OPENAI_API_KEY").is_ok() {
        Ok(RigLlmClient::new(RigConfig::openai("gpt-4o-mini")))
    } else if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        Ok(RigLlmClient::new(RigConfig::anthropic("claude-3-haiku-20240307")))
    } else {
        Err(Error::ModelProvider(
            "No API key found. Set OPENAI_API_KEY or ANTHROPIC_API_KEY".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("You route requests"),
            ChatMessage::system("Answer with one agent id"),
            ChatMessage::user("user: I need blue paint"),
        ]
    }

    #[test]
    fn test_preamble_joins_system_messages() {
        let client = RigLlmClient::new(RigConfig::default());
        let preamble = client.build_preamble(&conversation()).unwrap();
        assert_eq!(preamble, "You route requests\n\nAnswer with one agent id");
        assert!(client.build_preamble(&[ChatMessage::user("hi")]).is_none());
    }

    #[test]
    fn test_build_prompt_skips_system() {
        let client = RigLlmClient::new(RigConfig::default());
        let prompt = client.build_prompt(&conversation());
        assert!(prompt.contains("User: user: I need blue paint"));
        assert!(!prompt.contains("You route requests"));
    }

    #[test]
    fn test_extra_params_and_model_selection() {
        let client = RigLlmClient::new(RigConfig::openai("gpt-4o"));
        let mut options = CompletionOptions::for_model("");
        assert!(client.extra_params(&options).is_none());
        assert_eq!(client.model(&options), "gpt-4o");

        options.model = "phi-4".into();
        options.top_p = Some(0.5);
        let params = client.extra_params(&options).unwrap();
        assert_eq!(params["top_p"], 0.5);
        assert_eq!(client.model(&options), "phi-4");
    }
}
