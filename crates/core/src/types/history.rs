use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// =============================================================================
// Conversation History
// =============================================================================

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// A single turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Bounded FIFO of conversation turns. Pushing past `max_len` drops the
/// oldest turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: VecDeque<Turn>,
    max_len: usize,
}

impl ConversationHistory {
    /// Create an empty history holding at most `max_len` turns.
    pub fn new(max_len: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    /// Append a turn.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        if self.max_len == 0 {
            return;
        }
        if self.turns.len() == self.max_len {
            self.turns.pop_front();
        }
        self.turns.push_back(Turn {
            role,
            content: content.into(),
        });
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content);
    }

    pub fn push_bot(&mut self, content: impl Into<String>) {
        self.push(Role::Bot, content);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Empty history with the same bound.
    pub fn empty_like(&self) -> Self {
        Self::new(self.max_len)
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(10)
    }
}
