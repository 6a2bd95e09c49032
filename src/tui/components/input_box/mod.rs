//! # InputBox Component
//!
//! Single-line text field for the next question.
//!
//! ## Responsibilities
//!
//! - Capture text input, capped at [`MAX_INPUT_CHARS`] characters
//! - Handle editing (backspace, delete, word deletion, cursor movement, paste)
//! - Emit `Submit` on Enter for non-blank text
//! - Show a placeholder when empty and a character counter
//!
//! ## State Management
//!
//! The buffer is internal state. `disabled` is a prop mirrored from
//! `App::is_loading`; while set, the box ignores edits and submits. The
//! buffer is only cleared by the parent once a submission is accepted.

mod cursor;
mod text_edit;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
pub use text_edit::MAX_INPUT_CHARS;
use text_edit::{
    INPUT_HEIGHT, flatten, inner_width, insert_capped, next_char_boundary, next_word_boundary,
    prev_char_boundary, prev_word_boundary,
};

const PLACEHOLDER: &str = "Ask a question…";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Mirrors the in-flight flag (Prop)
    pub disabled: bool,
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            cursor: CursorState::new(),
        }
    }

    /// Height of the box; always one text row.
    pub fn height(&self) -> u16 {
        INPUT_HEIGHT
    }

    pub fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Empties the buffer after the parent accepted a submission.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        let flat = flatten(text);
        let inserted = insert_capped(&mut self.buffer, self.cursor.pos, &flat, MAX_INPUT_CHARS);
        if inserted == 0 {
            return None;
        }
        self.cursor.pos += inserted;
        Some(InputEvent::ContentChanged)
    }

    /// Moves the cursor to `pos`, reporting whether it moved.
    fn move_to(&mut self, pos: usize) -> Option<InputEvent> {
        (self.cursor.pos != pos).then(|| {
            self.cursor.pos = pos;
            InputEvent::ContentChanged
        })
    }

    fn delete_range(&mut self, start: usize, end: usize) -> Option<InputEvent> {
        if start == end {
            return None;
        }
        self.buffer.drain(start..end);
        self.cursor.pos = start;
        Some(InputEvent::ContentChanged)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.cursor.update_scroll(&self.buffer, width);

        let border_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };
        let counter = format!("{}/{}", self.char_count(), MAX_INPUT_CHARS);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Message ")
            .title_bottom(Line::from(format!(" {counter} ")).right_aligned())
            .padding(Padding::horizontal(1));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let style = if self.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Paragraph::new(self.cursor.visible_slice(&self.buffer, width)).style(style)
        };

        frame.render_widget(paragraph.block(block), area);

        // No cursor while a reply is pending
        if !self.disabled {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        let pos = self.cursor.pos;
        match event {
            TuiEvent::InputChar(c) => self.insert(c.encode_utf8(&mut [0; 4])),
            TuiEvent::Paste(text) => self.insert(text),
            TuiEvent::Backspace if pos > 0 => {
                self.delete_range(prev_char_boundary(&self.buffer, pos), pos)
            }
            TuiEvent::Delete if pos < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, pos);
                self.buffer.drain(pos..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::DeleteWord => self.delete_range(prev_word_boundary(&self.buffer, pos), pos),
            TuiEvent::CursorLeft if pos > 0 => self.move_to(prev_char_boundary(&self.buffer, pos)),
            TuiEvent::CursorRight if pos < self.buffer.len() => {
                self.move_to(next_char_boundary(&self.buffer, pos))
            }
            TuiEvent::WordLeft => self.move_to(prev_word_boundary(&self.buffer, pos)),
            TuiEvent::WordRight => self.move_to(next_word_boundary(&self.buffer, pos)),
            TuiEvent::CursorHome => self.move_to(0),
            TuiEvent::CursorEnd => self.move_to(self.buffer.len()),
            TuiEvent::Submit if !self.buffer.trim().is_empty() => {
                Some(InputEvent::Submit(self.buffer.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        input
    }

    fn draw(input: &mut InputBox) -> String {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "ab");

        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_submit_keeps_buffer_until_cleared() {
        let mut input = typed("hello");
        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "hello"),
            other => panic!("Expected Submit event, got {:?}", other),
        }
        assert_eq!(input.buffer, "hello");

        input.clear();
        assert!(input.buffer.is_empty());
        assert_eq!(input.char_count(), 0);
    }

    #[test]
    fn test_blank_submit_ignored() {
        let mut input = typed("   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(InputBox::new().handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_character_cap() {
        let mut input = typed(&"x".repeat(MAX_INPUT_CHARS));
        assert_eq!(input.char_count(), MAX_INPUT_CHARS);
        assert_eq!(input.handle_event(&TuiEvent::InputChar('y')), None);

        input.clear();
        input.handle_event(&TuiEvent::Paste("z".repeat(500)));
        assert_eq!(input.char_count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("line one\nline two".into()));
        assert_eq!(input.buffer, "line one line two");
    }

    #[test]
    fn test_disabled_ignores_everything() {
        let mut input = typed("draft");
        input.disabled = true;
        assert_eq!(input.handle_event(&TuiEvent::InputChar('!')), None);
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "draft");
    }

    #[test]
    fn test_cursor_editing_in_middle() {
        let mut input = typed("hllo");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::InputChar('e'));
        assert_eq!(input.buffer, "hello");

        input.handle_event(&TuiEvent::CursorEnd);
        input.handle_event(&TuiEvent::InputChar(' '));
        input.handle_event(&TuiEvent::Paste("world".into()));
        input.handle_event(&TuiEvent::DeleteWord);
        assert_eq!(input.buffer, "hello ");

        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "ello ");
    }

    #[test]
    fn test_render_placeholder_and_counter() {
        let text = draw(&mut InputBox::new());
        assert!(text.contains("Ask a question…"));
        assert!(text.contains("0/180"));

        let text = draw(&mut typed("hi"));
        assert!(text.contains("hi"));
        assert!(text.contains("2/180"));
        assert!(!text.contains("Ask a question"));
    }
}
