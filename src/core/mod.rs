//! # Core Application Logic
//!
//! This module contains Folio's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. update() pure.  │
//!                    └───────────┬─────────────┘
//!                                │ Effect::SpawnRequest
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │  dispatch() → Resolve   │
//!                    └───────────┬─────────────┘
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`dispatch`]: Turns a request ticket into a `Resolve` action
//! - [`config`]: Layered configuration (file, environment, CLI)

pub mod action;
pub mod config;
pub mod dispatch;
pub mod state;
