#![deny(unused)]
//! Core types, traits, and error definitions for Concierge.
//!
//! This crate provides the building blocks shared by every layer of the
//! routing system: the canonical response record, agent identifiers,
//! conversation history, configuration, and the collaborator traits.

pub mod config;
pub mod error;
pub mod mocks;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{AgentBackend, ChatMessage, CompletionOptions, LlmClient, LlmResponse, LlmUsage};
pub use types::{
    AgentId, ConversationHistory, MergedRecord, ResponseRecord, Role, Turn, ROUTING_PRIORITY,
};
