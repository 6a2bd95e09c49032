//! Conversation → chat-completion message list.

use serde::Serialize;

use super::types::{Conversation, Role};

/// A `{role, content}` pair as sent in the `messages` array.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Maps every turn, hidden system turn included, to the wire format.
///
/// Order is preserved and nothing is filtered. Same input, same output.
pub fn build_messages(conversation: &Conversation) -> Vec<ChatMessage> {
    conversation
        .turns()
        .iter()
        .map(|turn| ChatMessage {
            role: turn.role(),
            content: turn.text().to_string(),
        })
        .collect()
}
