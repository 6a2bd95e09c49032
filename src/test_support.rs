//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::state::App;
use crate::inference::{
    ChatMessage, CompletionProvider, CompletionRequest, Conversation, ProviderError,
};

/// A no-op provider for tests that don't need real API calls.
pub struct NoopProvider;

#[async_trait]
impl CompletionProvider for NoopProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        Ok(String::new())
    }
}

/// Replays canned outcomes in order and records every request it sees.
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `(model, messages)` for each call so far.
    pub fn requests(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.model.to_string(), request.messages.to_vec()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Aborted("script exhausted".into())))
    }
}

/// Creates a test App with a NoopProvider and an empty conversation.
pub fn test_app() -> App {
    App::new(Arc::new(NoopProvider), "test-model".to_string(), Conversation::new())
}

/// Creates a test App with the given seed turns.
pub fn test_app_with(system_prompt: Option<&str>, welcome: Option<&str>) -> App {
    test_app_with_provider(Arc::new(NoopProvider), system_prompt, welcome)
}

pub fn test_app_with_provider(
    provider: Arc<dyn CompletionProvider>,
    system_prompt: Option<&str>,
    welcome: Option<&str>,
) -> App {
    App::new(
        provider,
        "test-model".to_string(),
        Conversation::seeded(system_prompt, welcome),
    )
}
