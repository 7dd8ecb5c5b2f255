//! One conversation turn, end to end.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use concierge_controller::{
    clean_conversation_history, format_chat_history, merge_cart_reply, parse_agent_response,
    redact_bad_prompts_in_history,
};
use concierge_core::{
    config::AppConfig,
    traits::{AgentBackend, LlmClient},
    types::{AgentId, ConversationHistory, MergedRecord, ResponseRecord},
    Error, Result,
};
use concierge_governance::{track_content_filter, track_route, PerformanceMonitor};
use concierge_model_gateway::FallbackService;

use crate::router::{is_content_filter_reply, select_agent, RouterService};

/// Answer shown when the router model's content filter rejects a turn.
pub const CONTENT_FILTER_APOLOGY: &str = "I'm sorry, but I can't help with that request. \
Could you rephrase it or ask about something else?";

/// Routes each turn to a specialized agent and normalizes its reply.
pub struct ConciergePipeline {
    router: RouterService,
    fallback: FallbackService,
    backend: Arc<dyn AgentBackend>,
    endpoints: HashMap<AgentId, String>,
    bad_prompts: RwLock<Vec<String>>,
    monitor: Arc<PerformanceMonitor>,
}

impl ConciergePipeline {
    /// Build a pipeline. `llm` serves both the router and fallback models.
    pub fn new(config: &AppConfig, llm: Arc<dyn LlmClient>, backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            router: RouterService::new(Arc::clone(&llm), &config.router),
            fallback: FallbackService::new(llm, &config.fallback),
            backend,
            endpoints: config.agents.endpoint_table(),
            bad_prompts: RwLock::new(config.history.bad_prompts.clone()),
            monitor: Arc::new(PerformanceMonitor::new()),
        }
    }

    /// Share a performance monitor with the caller.
    pub fn with_monitor(mut self, monitor: Arc<PerformanceMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn monitor(&self) -> &Arc<PerformanceMonitor> {
        &self.monitor
    }

    /// User prompts currently redacted from history.
    pub fn bad_prompts(&self) -> Vec<String> {
        self.bad_prompts.read().map(|p| p.clone()).unwrap_or_default()
    }

    fn remember_bad_prompt(&self, prompt: &str) {
        if let Ok(mut prompts) = self.bad_prompts.write() {
            if !prompts.iter().any(|p| p == prompt) {
                prompts.push(prompt.to_string());
            }
        }
    }

    /// History as it is shown to models: bot payloads reduced to answers,
    /// bad prompts redacted.
    fn prepared_history(&self, history: &ConversationHistory) -> String {
        let cleaned = clean_conversation_history(history);
        let redacted = redact_bad_prompts_in_history(&cleaned, &self.bad_prompts());
        format_chat_history(&redacted)
    }

    /// Handle one user message and return the record to render.
    ///
    /// The user message and the raw bot reply are appended to `history`
    /// together. A failed turn leaves `history` unchanged.
    pub async fn handle_turn(
        &self,
        history: &mut ConversationHistory,
        user_message: &str,
    ) -> Result<ResponseRecord> {
        let mut pending = history.clone();
        pending.push_user(user_message);
        let formatted = self.prepared_history(&pending);

        let reply = self
            .monitor
            .time("router_call", self.router.call_router(&formatted))
            .await?;

        if is_content_filter_reply(&reply) {
            tracing::warn!("Turn rejected by content filter, redacting prompt from history");
            track_content_filter();
            self.remember_bad_prompt(user_message);
            pending.push_bot(CONTENT_FILTER_APOLOGY);
            *history = pending;
            return Ok(ResponseRecord::answer_only(CONTENT_FILTER_APOLOGY));
        }

        let (agent, endpoint, routed) = self.resolve_agent(&reply)?;
        track_route(agent.as_str(), !routed);

        let raw = match self
            .monitor
            .time("agent_call", self.backend.invoke(agent, &endpoint, &formatted))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(agent = %agent, error = %e, "Agent call failed, using fallback model");
                self.monitor
                    .time("fallback_call", self.fallback.respond(&formatted))
                    .await?
            }
        };

        let record = parse_agent_response(&raw).with_default_agent(agent.as_str());
        pending.push_bot(raw);
        *history = pending;
        Ok(record)
    }

    /// Pick the routed agent, or `cora` when the router named no agent with
    /// a configured endpoint. The flag is `false` for the fallback case.
    fn resolve_agent(&self, reply: &str) -> Result<(AgentId, String, bool)> {
        match select_agent(reply, &self.endpoints) {
            (Some(endpoint), Some(agent)) => {
                tracing::info!(agent = %agent, "Routed turn");
                Ok((agent, endpoint.clone(), true))
            }
            (_, matched) => {
                tracing::info!(matched = ?matched, reply = %reply, "No routable agent, falling back to cora");
                let endpoint = self
                    .endpoints
                    .get(&AgentId::Cora)
                    .cloned()
                    .ok_or_else(|| Error::AgentNotConfigured(AgentId::Cora.to_string()))?;
                Ok((AgentId::Cora, endpoint, false))
            }
        }
    }

    fn endpoint(&self, agent: AgentId) -> Result<&str> {
        self.endpoints
            .get(&agent)
            .map(String::as_str)
            .ok_or_else(|| Error::AgentNotConfigured(agent.to_string()))
    }

    /// Handle a cart turn: the cart agent and cora answer concurrently and
    /// their replies are merged. A failed turn leaves `history` unchanged.
    pub async fn handle_cart_turn(
        &self,
        history: &mut ConversationHistory,
        user_message: &str,
    ) -> Result<MergedRecord> {
        let cart_endpoint = self.endpoint(AgentId::Cart)?;
        let cora_endpoint = self.endpoint(AgentId::Cora)?;

        let mut pending = history.clone();
        pending.push_user(user_message);
        let formatted = self.prepared_history(&pending);

        let (cart_raw, cora_raw) = tokio::join!(
            self.monitor.time(
                "cart_call",
                self.backend.invoke(AgentId::Cart, cart_endpoint, &formatted)
            ),
            self.monitor.time(
                "agent_call",
                self.backend.invoke(AgentId::Cora, cora_endpoint, &formatted)
            ),
        );
        let cart_raw = cart_raw?;
        let cora_raw = cora_raw?;
        track_route(AgentId::Cart.as_str(), false);

        let merged = merge_cart_reply(&cart_raw, &cora_raw);
        pending.push_bot(cora_raw);
        *history = pending;
        Ok(merged)
    }
}
