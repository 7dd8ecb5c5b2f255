//! Agent processors and the cached backend that drives them.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use concierge_core::{
    traits::{AgentBackend, ChatMessage, CompletionOptions, LlmClient},
    types::AgentId,
    Error, Result,
};

use crate::processor_cache::{ProcessorCache, ProcessorKey, ThreadBound};

/// One specialized agent bound to a conversation thread.
#[async_trait]
pub trait AgentProcessor: ThreadBound + Send + Sync {
    /// Send `message` on the bound thread and return the raw reply.
    async fn run(&self, message: &str) -> Result<String>;
}

type ProcessorFactory<P> = dyn Fn(AgentId, &str, &str) -> Result<P> + Send + Sync;

/// [`AgentBackend`] that reuses one processor per agent and endpoint.
///
/// Every processor handed out is bound to this backend's thread.
pub struct ProcessorBackend<P> {
    cache: ProcessorCache<P>,
    factory: Box<ProcessorFactory<P>>,
    thread_id: String,
}

impl<P: AgentProcessor> ProcessorBackend<P> {
    /// `factory(agent, endpoint, thread_id)` builds a processor on a cache miss.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(AgentId, &str, &str) -> Result<P> + Send + Sync + 'static,
    {
        Self {
            cache: ProcessorCache::new(),
            factory: Box::new(factory),
            thread_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Use an existing conversation thread.
    pub fn with_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = thread_id.into();
        self
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn cache(&self) -> &ProcessorCache<P> {
        &self.cache
    }
}

#[async_trait]
impl<P: AgentProcessor + 'static> AgentBackend for ProcessorBackend<P> {
    async fn invoke(&self, agent: AgentId, endpoint: &str, message: &str) -> Result<String> {
        let key = ProcessorKey::new(agent.as_str(), endpoint);
        let processor = self.cache.get_or_bind(key, &self.thread_id, || {
            (self.factory)(agent, endpoint, &self.thread_id)
        })?;

        tracing::debug!(agent = %agent, endpoint = endpoint, thread_id = %self.thread_id, "Invoking agent");
        processor.run(message).await
    }
}

/// Persona preamble of each agent.
fn agent_instructions(agent: AgentId) -> &'static str {
    match agent {
        AgentId::Cora => {
            "You are Cora, a friendly shopping assistant for a paint and home-improvement store. \
             Reply with a JSON object with keys answer, products, discount_percentage, image_url."
        }
        AgentId::InteriorDesigner => {
            "You are an interior designer. Suggest colors and room ideas. \
             Reply with a JSON object with keys answer, products, image_url."
        }
        AgentId::InventoryAgent => {
            "You check product availability in the store inventory. \
             Reply with a JSON object with keys answer and products."
        }
        AgentId::CustomerLoyalty => {
            "You manage customer loyalty discounts. \
             Reply with a JSON object with keys answer and discount_percentage."
        }
        AgentId::Cart => {
            "You maintain the customer's shopping cart. \
             Reply with the current cart as a JSON list of items."
        }
    }
}

/// Processor answering through a chat model, with the endpoint used as the
/// model deployment name.
pub struct LlmAgentProcessor {
    agent: AgentId,
    client: Arc<dyn LlmClient>,
    options: CompletionOptions,
    thread_id: RwLock<String>,
}

impl LlmAgentProcessor {
    pub fn new(
        agent: AgentId,
        endpoint: &str,
        client: Arc<dyn LlmClient>,
        thread_id: &str,
    ) -> Self {
        Self {
            agent,
            client,
            options: CompletionOptions::for_model(endpoint),
            thread_id: RwLock::new(thread_id.to_string()),
        }
    }

    pub fn thread_id(&self) -> String {
        self.thread_id
            .read()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

impl ThreadBound for LlmAgentProcessor {
    fn bind_thread(&self, thread_id: &str) {
        if let Ok(mut current) = self.thread_id.write() {
            *current = thread_id.to_string();
        }
    }
}

#[async_trait]
impl AgentProcessor for LlmAgentProcessor {
    async fn run(&self, message: &str) -> Result<String> {
        let messages = [
            ChatMessage::system(agent_instructions(self.agent)),
            ChatMessage::user(message),
        ];
        tracing::debug!(agent = %self.agent, thread_id = %self.thread_id(), "Running agent");

        let response = self
            .client
            .chat(&messages, &self.options)
            .await
            .map_err(|e| Error::agent(format!("{} failed: {}", self.agent, e)))?;
        Ok(response.content)
    }
}
