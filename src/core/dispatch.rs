//! Runs the completion pipeline for one `RequestTicket`.
//!
//! This is the only place that awaits the provider. Whatever happens, the
//! result comes back as a single `Action::Resolve` carrying the ticket's
//! generation, so the store always leaves the in-flight state.

use log::debug;

use crate::core::action::{Action, RequestTicket};
use crate::inference::{CompletionProvider, CompletionRequest};

pub async fn dispatch(provider: &dyn CompletionProvider, ticket: RequestTicket) -> Action {
    debug!(
        "Dispatching generation {} to {} ({} messages)",
        ticket.generation,
        provider.name(),
        ticket.messages.len()
    );

    let outcome = provider
        .complete(CompletionRequest {
            messages: &ticket.messages,
            model: &ticket.model,
        })
        .await;

    Action::Resolve {
        generation: ticket.generation,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Effect, update};
    use crate::inference::{ProviderError, Role, Turn};
    use crate::test_support::{ScriptedProvider, test_app_with_provider};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dispatch_carries_generation_and_reply() {
        let provider = ScriptedProvider::new(vec![Ok("React, Node.js".into())]);
        let ticket = RequestTicket {
            generation: 4,
            model: "m".into(),
            messages: Vec::new(),
        };

        match dispatch(&provider, ticket).await {
            Action::Resolve {
                generation,
                outcome,
            } => {
                assert_eq!(generation, 4);
                assert_eq!(outcome, Ok("React, Node.js".to_string()));
            }
            other => panic!("Expected Resolve, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_passes_model_and_messages() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("ok".into())]));
        let mut app = test_app_with_provider(provider.clone(), Some("S"), Some("Welcome"));

        let Effect::SpawnRequest(ticket) = update(&mut app, Action::Submit("Q".into())) else {
            panic!("Expected SpawnRequest");
        };
        dispatch(provider.as_ref(), ticket).await;

        let seen = provider.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "test-model");
        let roles: Vec<Role> = seen[0].1.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::Assistant, Role::User]);
    }

    #[tokio::test]
    async fn test_full_round_trip_through_update() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::Network("network timeout".into())),
            Ok("second".into()),
        ]));
        let mut app = test_app_with_provider(provider.clone(), None, Some("Welcome"));

        for text in ["first", "again"] {
            let Effect::SpawnRequest(ticket) = update(&mut app, Action::Submit(text.into())) else {
                panic!("Expected SpawnRequest");
            };
            let resolved = dispatch(app.provider.as_ref(), ticket).await;
            assert_eq!(update(&mut app, resolved), Effect::None);
            assert!(!app.is_loading);
        }

        let texts: Vec<&str> = app.conversation.turns().iter().map(Turn::text).collect();
        assert_eq!(
            texts,
            vec![
                "Welcome",
                "first",
                "Error: network error: network timeout",
                "again",
                "second"
            ]
        );
    }
}
