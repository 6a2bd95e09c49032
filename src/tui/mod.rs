//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Request Flow
//!
//! ```text
//! Enter ─▶ InputBox ─▶ update(Submit) ─▶ Effect::SpawnRequest(ticket)
//!                                              │
//!                          tokio task: dispatch(provider, ticket)
//!                                              │
//!            event loop ◀── mpsc ◀── Action::Resolve { generation, outcome }
//! ```
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~120ms so the "Thinking" dots animate.
//! - **Idle**: sleeps up to 500ms and only redraws on events or replies.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, RequestTicket, update};
use crate::core::config::ResolvedConfig;
use crate::core::dispatch::dispatch;
use crate::core::state::App;
use crate::inference::{CompletionProvider, OpenRouterProvider, ProviderError};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const LOADING_TICK: Duration = Duration::from_millis(120);
const IDLE_TICK: Duration = Duration::from_millis(500);
/// Pending-bubble dot changes per second
const DOTS_PER_SECOND: f32 = 3.0;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: redraws reset the blink timer
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the completion provider from resolved credentials.
///
/// A missing key is not fatal: requests go out unauthenticated and the
/// endpoint's 401 shows up as an error turn.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn CompletionProvider> {
    let api_key = config.openrouter_api_key.clone().unwrap_or_else(|| {
        warn!("No OpenRouter API key configured (config file or OPENROUTER_API_KEY)");
        String::new()
    });
    Arc::new(OpenRouterProvider::new(
        api_key,
        Some(config.openrouter_base_url.clone()),
    ))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    let mut app = App::from_config(provider, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    info!("Chat started: model={}", app.model_name);

    'event_loop: loop {
        tui.input_box.disabled = app.is_loading;
        if app.is_loading {
            needs_redraw = true;
        }

        if needs_redraw {
            let anim_frame = (start_time.elapsed().as_secs_f32() * DOTS_PER_SECOND) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, anim_frame))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading { LOADING_TICK } else { IDLE_TICK };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                // Redraw is already flagged
                TuiEvent::Resize => continue,
                TuiEvent::ForceQuit | TuiEvent::Quit => Action::Quit,
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown
                | TuiEvent::ScrollToBottom => {
                    tui.message_list.handle_event(&event);
                    continue;
                }
                other => match tui.input_box.handle_event(&other) {
                    Some(InputEvent::Submit(text)) => Action::Submit(text),
                    _ => continue,
                },
            };

            if apply(&mut app, &mut tui, action, &tx) {
                break 'event_loop;
            }
        }

        // Replies from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if apply(&mut app, &mut tui, action, &tx) {
                break 'event_loop;
            }
        }
    }

    info!("Chat ended with {} turns", app.conversation.len());
    ratatui::restore();
    Ok(())
}

/// Runs one action through `update` and carries out its effect.
/// Returns true when the app should exit.
fn apply(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnRequest(ticket) => {
            tui.input_box.clear();
            spawn_request(app.provider.clone(), ticket, tx.clone());
            false
        }
    }
}

/// Spawns the completion call for `ticket` and reports back over `tx`.
///
/// The call runs in its own task under a supervisor, so even a panicking
/// provider produces a `Resolve` for the ticket's generation.
fn spawn_request(
    provider: Arc<dyn CompletionProvider>,
    ticket: RequestTicket,
    tx: mpsc::Sender<Action>,
) {
    let generation = ticket.generation;
    info!(
        "Spawning request: generation={}, provider={}",
        generation,
        provider.name()
    );

    let request = tokio::spawn(async move { dispatch(provider.as_ref(), ticket).await });

    tokio::spawn(async move {
        let action = match request.await {
            Ok(action) => action,
            Err(e) => {
                warn!("Request task for generation {} failed: {}", generation, e);
                Action::Resolve {
                    generation,
                    outcome: Err(ProviderError::Aborted(e.to_string())),
                }
            }
        };
        if tx.send(action).is_err() {
            warn!(
                "Failed to deliver reply for generation {}: receiver dropped",
                generation
            );
        }
    });
}
