//! Core type definitions for Concierge.
//!
//! Broken down into submodules:
//! - `agent`: downstream agent identifiers
//! - `record`: the canonical response record and the reduced merge record
//! - `history`: bounded conversation history

pub mod agent;
pub mod history;
pub mod record;

pub use agent::*;
pub use history::*;
pub use record::*;
