//! Append-only transcript for a single completion call.

use super::types::ChatMessage;

/// Ordered conversation: system turn, user turn, then one assistant turn per
/// reasoning step. Turns can only be appended.
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(system_prompt: &str, user_prompt: &str) -> Self {
        Self {
            turns: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)],
        }
    }

    /// Record a reasoning step as an assistant turn.
    pub fn push_reasoning(&mut self, reasoning: &str) {
        let mut turn = ChatMessage::assistant(reasoning);
        turn.reasoning = Some(reasoning.to_string());
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatMessage] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
