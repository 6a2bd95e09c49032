//! # Application State
//!
//! Core business state for Folio. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn CompletionProvider>  // completion client
//! ├── conversation: Conversation    // transcript (hidden system turn + visible turns)
//! ├── model_name: String            // model sent with every request
//! ├── is_loading: bool              // a request is in flight
//! ├── generation: u64               // id of the latest accepted submission
//! └── status_message: String        // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::inference::{CompletionProvider, Conversation};

pub const STATUS_READY: &str = "Ready";
pub const STATUS_THINKING: &str = "Thinking...";

pub struct App {
    pub provider: Arc<dyn CompletionProvider>,
    pub conversation: Conversation,
    pub model_name: String,
    /// True from an accepted submit until its reply (or error) is appended.
    pub is_loading: bool,
    /// Bumped on every accepted submit; replies carrying another value are stale.
    pub generation: u64,
    pub status_message: String,
}

impl App {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        model_name: String,
        conversation: Conversation,
    ) -> Self {
        Self {
            provider,
            conversation,
            model_name,
            is_loading: false,
            generation: 0,
            status_message: String::from(STATUS_READY),
        }
    }

    /// Builds the app with seed turns taken from the resolved config.
    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ResolvedConfig) -> Self {
        let conversation = Conversation::seeded(
            config.system_prompt.as_deref(),
            config.welcome_message.as_deref(),
        );
        Self::new(provider, config.model_name.clone(), conversation)
    }
}
