//! Conversation history cleanup before it is sent to a model.

use concierge_core::types::{ConversationHistory, Role};
use serde_json::Value;

use crate::values::value_to_text;

/// Placeholder written over redacted user prompts.
pub const REDACTED: &str = "<redacted>";

/// Render history as `user: ...` / `bot: ...` lines for the router prompt.
pub fn format_chat_history(history: &ConversationHistory) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace structured bot turns by their `answer` so product payloads do not
/// bloat later prompts. User turns and unstructured bot turns are kept.
pub fn clean_conversation_history(history: &ConversationHistory) -> ConversationHistory {
    let mut cleaned = history.empty_like();
    for turn in history.iter() {
        let content = match turn.role {
            Role::Bot => bot_answer(&turn.content).unwrap_or_else(|| turn.content.clone()),
            Role::User => turn.content.clone(),
        };
        cleaned.push(turn.role, content);
    }
    cleaned
}

fn bot_answer(message: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(message).ok()?;
    let holder = match &parsed {
        Value::Array(items) => items.first()?,
        other => other,
    };
    holder.as_object()?.get("answer").map(value_to_text)
}

/// Replace user turns that exactly match a known bad prompt.
pub fn redact_bad_prompts_in_history<S>(
    history: &ConversationHistory,
    bad_prompts: &[S],
) -> ConversationHistory
where
    S: AsRef<str>,
{
    let mut redacted = history.empty_like();
    for turn in history.iter() {
        let is_bad = turn.role == Role::User
            && bad_prompts.iter().any(|p| p.as_ref() == turn.content);
        if is_bad {
            redacted.push(turn.role, REDACTED);
        } else {
            redacted.push(turn.role, turn.content.clone());
        }
    }
    redacted
}
