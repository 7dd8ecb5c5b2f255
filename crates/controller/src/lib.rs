#![deny(unused)]
//! Response normalization for Concierge.
//!
//! This crate turns raw agent output into the canonical response record:
//! - Tolerant parsing of fenced, bare, nested, or malformed JSON replies
//! - Merging a cart agent's reply with a narrative agent's reply
//! - Scraping bot replies out of stringified objects
//! - Conversation history cleanup before it is sent to a model

pub mod bot_reply;
pub mod extraction;
pub mod history;
pub mod merge;
pub mod parser;
pub mod values;

pub use bot_reply::extract_bot_reply;
pub use extraction::{candidate_json, decode, Decoded};
pub use history::{clean_conversation_history, format_chat_history, redact_bad_prompts_in_history};
pub use merge::merge_cart_reply;
pub use parser::parse_agent_response;
