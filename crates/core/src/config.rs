use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

use crate::traits::CompletionOptions;
use crate::types::AgentId;

const DEFAULT_ROUTER_PROMPT: &str = "You route a retail paint-store conversation to one agent. \
Reply with exactly one of: cora, interior_designer, inventory_agent, customer_loyalty.";

const DEFAULT_FALLBACK_PROMPT: &str =
    "You are Cora, a friendly shopping assistant for a paint and home-improvement store.";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub agents: AgentsConfig,
    pub router: RouterConfig,
    pub fallback: FallbackConfig,
    pub history: HistoryConfig,
}

/// Endpoint handle per agent. A missing entry means the agent is not deployed.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AgentsConfig {
    pub cora: Option<String>,
    pub interior_designer: Option<String>,
    pub inventory_agent: Option<String>,
    pub customer_loyalty: Option<String>,
    pub cart: Option<String>,
}

impl AgentsConfig {
    /// Endpoint for one agent.
    pub fn endpoint(&self, agent: AgentId) -> Option<&str> {
        match agent {
            AgentId::Cora => self.cora.as_deref(),
            AgentId::InteriorDesigner => self.interior_designer.as_deref(),
            AgentId::InventoryAgent => self.inventory_agent.as_deref(),
            AgentId::CustomerLoyalty => self.customer_loyalty.as_deref(),
            AgentId::Cart => self.cart.as_deref(),
        }
    }

    /// Table of configured endpoints keyed by agent.
    pub fn endpoint_table(&self) -> HashMap<AgentId, String> {
        AgentId::ALL
            .iter()
            .filter_map(|id| self.endpoint(*id).map(|e| (*id, e.to_string())))
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RouterConfig {
    pub deployment: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl RouterConfig {
    pub fn options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.deployment.clone(),
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
            top_p: Some(self.top_p),
            presence_penalty: Some(self.presence_penalty),
            frequency_penalty: Some(self.frequency_penalty),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            deployment: "phi-4".into(),
            prompt: DEFAULT_ROUTER_PROMPT.into(),
            max_tokens: 2048,
            temperature: 0.8,
            top_p: 0.1,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FallbackConfig {
    pub deployment: String,
    pub prompt: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl FallbackConfig {
    pub fn options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.deployment.clone(),
            max_tokens: None,
            temperature: Some(self.temperature),
            top_p: Some(self.top_p),
            presence_penalty: Some(0.0),
            frequency_penalty: Some(0.0),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            deployment: "gpt-4o".into(),
            prompt: DEFAULT_FALLBACK_PROMPT.into(),
            temperature: 0.7,
            top_p: 0.95,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HistoryConfig {
    /// Turns retained per conversation.
    pub max_turns: usize,
    /// User prompts replaced by `<redacted>` before history reaches a model.
    pub bad_prompts: Vec<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            bad_prompts: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("CONCIERGE_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__AGENTS__CORA=asst_123 to agents.cora
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
