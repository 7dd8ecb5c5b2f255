#![deny(unused)]
//! Gateway & Router for Concierge.
//!
//! This crate decides which specialized agent answers a turn and drives the
//! turn end to end: router model call, agent selection, agent invocation,
//! and response normalization.

pub mod messages;
pub mod pipeline;
pub mod processor;
pub mod processor_cache;
pub mod router;

pub use messages::{rotating_message, StatusKind};
pub use pipeline::ConciergePipeline;
pub use processor::{AgentProcessor, LlmAgentProcessor, ProcessorBackend};
pub use processor_cache::{ProcessorCache, ProcessorKey, ThreadBound};
pub use router::{is_content_filter_reply, select_agent, RouterService, CONTENT_FILTER_SENTINEL};
