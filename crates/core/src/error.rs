//! Error types for Concierge.

use thiserror::Error;

/// Result type alias using Concierge's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Markers a model provider puts in the error body when a prompt or
/// completion trips its content filter.
const CONTENT_FILTER_MARKERS: &[&str] = &["content_filter", "ResponsibleAIPolicyViolation"];

/// Core error type for Concierge.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Gateway Errors
    // =========================================================================
    #[error("Routing failed: {0}")]
    RoutingFailed(String),

    #[error("No endpoint configured for agent: {0}")]
    AgentNotConfigured(String),

    #[error("Agent invocation failed: {0}")]
    AgentInvocation(String),

    // =========================================================================
    // Model Gateway Errors
    // =========================================================================
    #[error("Model provider error: {0}")]
    ModelProvider(String),

    #[error("Content filter triggered: {0}")]
    ContentFiltered(String),

    // =========================================================================
    // Generic Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a routing error.
    pub fn routing(msg: impl Into<String>) -> Self {
        Self::RoutingFailed(msg.into())
    }

    /// Create an agent invocation error.
    pub fn agent(msg: impl Into<String>) -> Self {
        Self::AgentInvocation(msg.into())
    }

    /// Create a model provider error.
    pub fn model_provider(msg: impl Into<String>) -> Self {
        Self::ModelProvider(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error was caused by the provider's content filter.
    ///
    /// Providers surface filter hits as ordinary HTTP errors, so besides the
    /// dedicated variant the rendered message is scanned for known markers.
    pub fn is_content_filter(&self) -> bool {
        if matches!(self, Self::ContentFiltered(_)) {
            return true;
        }
        let text = self.to_string();
        CONTENT_FILTER_MARKERS.iter().any(|m| text.contains(m))
    }
}
