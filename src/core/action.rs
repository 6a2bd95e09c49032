//! # Actions
//!
//! Everything that can happen in Folio becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The completion settles? That's `Action::Resolve { generation, outcome }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state and returns an `Effect` for the caller to carry out. No I/O here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Widget lifecycle:
//!
//! ```text
//!   Idle ──Submit(valid)──▶ Submitting ──Resolve(any outcome)──▶ Idle
//! ```

use log::{debug, info, warn};

use crate::core::state::{App, STATUS_READY, STATUS_THINKING};
use crate::inference::{ChatMessage, ProviderError, build_messages, normalize_reply};

#[derive(Debug)]
pub enum Action {
    /// The user asked to send `text`.
    Submit(String),
    /// The request for `generation` settled.
    Resolve {
        generation: u64,
        outcome: Result<String, ProviderError>,
    },
    Quit,
}

/// A snapshot of everything one completion call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    pub generation: u64,
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Side effect requested by `update()`.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Run the completion pipeline for this ticket.
    SpawnRequest(RequestTicket),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, text),
        Action::Resolve {
            generation,
            outcome,
        } => {
            resolve(app, generation, outcome);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    if text.trim().is_empty() {
        debug!("Ignoring blank submission");
        return Effect::None;
    }
    if app.is_loading {
        debug!("Ignoring submission while generation {} is in flight", app.generation);
        return Effect::None;
    }

    app.conversation.push_user(text);
    app.is_loading = true;
    app.generation += 1;
    app.status_message = STATUS_THINKING.to_string();

    info!(
        "Accepted submission: generation={}, turns={}",
        app.generation,
        app.conversation.len()
    );

    Effect::SpawnRequest(RequestTicket {
        generation: app.generation,
        model: app.model_name.clone(),
        messages: build_messages(&app.conversation),
    })
}

fn resolve(app: &mut App, generation: u64, outcome: Result<String, ProviderError>) {
    if !app.is_loading || generation != app.generation {
        warn!(
            "Discarding stale reply: generation={}, current={}, in_flight={}",
            generation, app.generation, app.is_loading
        );
        return;
    }

    let text = match outcome {
        Ok(reply) => {
            app.status_message = STATUS_READY.to_string();
            normalize_reply(Some(reply))
        }
        Err(e) => {
            warn!("Request {} failed: {}", generation, e);
            app.status_message = String::from("Request failed");
            format!("Error: {e}")
        }
    };

    app.conversation.push_assistant(text);
    app.is_loading = false;
}
