//! # TUI Components
//!
//! All widgets of the chat screen.
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: header with model name, status and the "↓ New" badge
//! - `Message`: one transcript bubble (user, assistant or pending)
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: single-line, length-capped text field
//! - `MessageList`: scrollable transcript with layout caching
//!
//! Components receive external data as props rather than reading `App`
//! directly, which keeps each one testable against a `TestBackend`:
//!
//! ```rust,ignore
//! // Dependencies are explicit
//! TitleBar::new(&app.model_name, &app.status_message, unseen).render(frame, area);
//! ```
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single bubble renderer)
//! ├── message_list.rs  (Scrollable message container)
//! └── input_box/       (Text input with counter)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub mod message_list;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
