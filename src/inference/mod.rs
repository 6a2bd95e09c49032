pub mod provider;
pub mod providers;
pub mod request;
pub mod types;

pub use provider::{
    CompletionProvider, CompletionRequest, FALLBACK_REPLY, ProviderError, normalize_reply,
};
pub use providers::OpenRouterProvider;
pub use request::{ChatMessage, build_messages};
pub use types::{Conversation, Role, Turn};
