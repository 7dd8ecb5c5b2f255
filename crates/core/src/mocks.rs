//! Mock implementations of core traits for testing.
//!
//! Scripted stand-ins for the model and agent endpoints, usable from unit
//! and integration tests across the workspace.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    traits::{AgentBackend, ChatMessage, CompletionOptions, LlmClient, LlmResponse, LlmUsage},
    types::AgentId,
    Error, Result,
};

// =============================================================================
// Mock LLM Client
// =============================================================================

/// One scripted model outcome.
#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
    Filtered(String),
}

/// Scripted mock LLM that returns predefined responses in a cycle.
pub struct MockLlm {
    script: Vec<Scripted>,
    call_count: Mutex<usize>,
    last_messages: Mutex<Vec<ChatMessage>>,
    last_options: Mutex<Option<CompletionOptions>>,
}

impl MockLlm {
    fn scripted(script: Vec<Scripted>) -> Self {
        Self {
            script,
            call_count: Mutex::new(0),
            last_messages: Mutex::new(Vec::new()),
            last_options: Mutex::new(None),
        }
    }

    /// Create a new mock LLM with a queue of responses.
    pub fn new(responses: Vec<String>) -> Self {
        Self::scripted(responses.into_iter().map(Scripted::Reply).collect())
    }

    /// Create a mock that always returns the same response.
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a mock whose every call fails with a provider error.
    pub fn failing(message: &str) -> Self {
        Self::scripted(vec![Scripted::Fail(message.to_string())])
    }

    /// Create a mock whose every call is rejected by the content filter.
    pub fn content_filtered(message: &str) -> Self {
        Self::scripted(vec![Scripted::Filtered(message.to_string())])
    }

    /// Get the number of calls made to this mock.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Messages sent on the most recent call.
    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }

    /// Options sent on the most recent call.
    pub fn last_options(&self) -> Option<CompletionOptions> {
        self.last_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<LlmResponse> {
        let idx = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            (*count - 1) % self.script.len().max(1)
        };
        *self.last_messages.lock().unwrap() = messages.to_vec();
        *self.last_options.lock().unwrap() = Some(options.clone());

        match self.script.get(idx) {
            Some(Scripted::Reply(content)) => Ok(LlmResponse {
                content: content.clone(),
                finish_reason: "stop".to_string(),
                usage: LlmUsage {
                    prompt_tokens: 10,
                    completion_tokens: 20,
                    total_tokens: 30,
                },
            }),
            Some(Scripted::Fail(msg)) => Err(Error::model_provider(msg.clone())),
            Some(Scripted::Filtered(msg)) => Err(Error::ContentFiltered(msg.clone())),
            None => Err(Error::internal("MockLlm has no scripted responses")),
        }
    }
}

// =============================================================================
// Mock Agent Backend
// =============================================================================

/// Agent backend answering from a fixed reply table and recording calls.
#[derive(Default)]
pub struct MockAgentBackend {
    replies: HashMap<AgentId, String>,
    failures: HashMap<AgentId, String>,
    calls: Mutex<Vec<(AgentId, String, String)>>,
}

impl MockAgentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the raw reply of an agent.
    pub fn with_reply(mut self, agent: AgentId, reply: impl Into<String>) -> Self {
        self.replies.insert(agent, reply.into());
        self
    }

    /// Script an agent to fail.
    pub fn with_failure(mut self, agent: AgentId, message: impl Into<String>) -> Self {
        self.failures.insert(agent, message.into());
        self
    }

    /// Calls made so far as `(agent, endpoint, message)`.
    pub fn calls(&self) -> Vec<(AgentId, String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Agents invoked so far, in call order.
    pub fn invoked_agents(&self) -> Vec<AgentId> {
        self.calls.lock().unwrap().iter().map(|(a, _, _)| *a).collect()
    }
}

#[async_trait]
impl AgentBackend for MockAgentBackend {
    async fn invoke(&self, agent: AgentId, endpoint: &str, message: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((agent, endpoint.to_string(), message.to_string()));

        if let Some(msg) = self.failures.get(&agent) {
            return Err(Error::agent(msg.clone()));
        }
        self.replies
            .get(&agent)
            .cloned()
            .ok_or_else(|| Error::agent(format!("no scripted reply for {}", agent)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_llm_cycles_responses() {
        let llm = MockLlm::new(vec!["a".into(), "b".into()]);
        let opts = CompletionOptions::for_model("m");
        assert_eq!(llm.chat(&[], &opts).await.unwrap().content, "a");
        assert_eq!(llm.chat(&[], &opts).await.unwrap().content, "b");
        assert_eq!(llm.chat(&[], &opts).await.unwrap().content, "a");
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_backend_records_calls() {
        let backend = MockAgentBackend::new().with_reply(AgentId::Cora, "hi");
        let reply = backend.invoke(AgentId::Cora, "asst_1", "hello").await.unwrap();
        assert_eq!(reply, "hi");
        assert!(backend.invoke(AgentId::Cart, "asst_2", "x").await.is_err());
        assert_eq!(backend.invoked_agents(), vec![AgentId::Cora, AgentId::Cart]);
    }
}
