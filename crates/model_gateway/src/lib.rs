#![deny(unused)]
//! Model Gateway for Concierge.
//!
//! This crate provides:
//! - Rig LLM client adapter for the router and fallback models
//! - Fallback completions used when a specialized agent cannot answer

pub mod fallback;
pub mod rig_client;

pub use fallback::FallbackService;
pub use rig_client::{create_default_client, RigConfig, RigLlmClient, RigProvider};
