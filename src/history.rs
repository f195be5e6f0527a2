//! Conversation history supplied as dialogue context

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human speaking to the assistant
    User,
    /// The assistant's reply
    Assistant,
}

impl Role {
    /// Wire-format name of the role
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One user or assistant utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke
    pub role: Role,
    /// What was said
    pub content: String,
}

impl ConversationTurn {
    /// A turn spoken by the user
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// A turn spoken by the assistant
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only log of prior turns
///
/// Insertion order is chronological order. Growth is unbounded within a
/// session; there is no eviction or truncation policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one turn
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// Append one completed exchange: the user turn, then the assistant turn
    pub fn record_exchange(&mut self, user_text: &str, assistant_text: &str) {
        self.turns.push(ConversationTurn::user(user_text));
        self.turns.push(ConversationTurn::assistant(assistant_text));
    }

    /// All turns in chronological order
    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Number of recorded turns
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when no turns have been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_exchange_appends_user_then_assistant() {
        let mut history = ConversationHistory::new();
        history.record_exchange("olá", "oi, como posso ajudar?");

        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.turns()[0].content, "olá");
        assert_eq!(history.turns()[1].role, Role::Assistant);
        assert_eq!(history.turns()[1].content, "oi, como posso ajudar?");
    }

    #[test]
    fn exchanges_accumulate_in_order() {
        let mut history = ConversationHistory::new();
        history.record_exchange("first question", "first answer");
        history.record_exchange("second question", "second answer");

        assert_eq!(history.len(), 4);
        assert_eq!(history.turns()[2].content, "second question");
        assert_eq!(history.turns()[3].content, "second answer");
    }

    #[test]
    fn roles_serialize_lowercase() {
        let turn = ConversationTurn::assistant("hi");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
