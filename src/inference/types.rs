use serde::{Deserialize, Serialize};

/// Who authored a turn. Serialized in the lowercase form chat-completion APIs expect.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Hidden instruction turn. Sent to the model, never displayed.
    System,
    User,
    Assistant,
}

/// One role-tagged message in the conversation.
///
/// The role is fixed at construction; there is no setter for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The append-only transcript for one run of the widget.
///
/// At most one `System` turn exists and it is always first: it can only be
/// supplied through [`Conversation::seeded`]. Turns are never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Creates an empty conversation with no seed turns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a conversation from optional seed text.
    ///
    /// Blank seeds are treated as absent, so an empty `system_prompt` in the
    /// config disables the hidden turn instead of sending an empty one.
    pub fn seeded(system_prompt: Option<&str>, welcome: Option<&str>) -> Self {
        let mut turns = Vec::with_capacity(2);
        if let Some(prompt) = system_prompt.filter(|p| !p.trim().is_empty()) {
            turns.push(Turn::new(Role::System, prompt));
        }
        if let Some(text) = welcome.filter(|w| !w.trim().is_empty()) {
            turns.push(Turn::new(Role::Assistant, text));
        }
        Self { turns }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::new(Role::User, text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::new(Role::Assistant, text));
    }

    /// All turns in insertion order, hidden system turn included.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns shown to the user: everything except the system turn.
    pub fn visible(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.role != Role::System)
    }

    pub fn system_turn(&self) -> Option<&Turn> {
        self.turns.first().filter(|t| t.role == Role::System)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
