//! Core traits for Concierge.
//!
//! Traits are organized by the collaborator they describe:
//! - `llm`: model endpoints (router model, fallback model)
//! - `agent`: specialized agent endpoints

pub mod agent;
pub mod llm;

pub use agent::*;
pub use llm::*;
