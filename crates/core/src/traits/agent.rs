//! Agent endpoint traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::AgentId;

/// Transport to the specialized agents.
///
/// Implementations own threads, credentials, and retries. The reply is the
/// agent's raw text, normalized later by the response parser.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Send `message` to `agent` at `endpoint` and return its raw reply.
    async fn invoke(&self, agent: AgentId, endpoint: &str, message: &str) -> Result<String>;
}
