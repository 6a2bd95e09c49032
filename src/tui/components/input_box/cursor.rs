//! Cursor position and horizontal scrolling for the single-line InputBox.
//!
//! `CursorState` owns the cursor byte offset and the scroll column.
//! All methods accept `buffer: &str` explicitly; the text itself is owned
//! by `InputBox`.

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::text_edit::{CONTENT_OFFSET, inner_width};

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// Display columns hidden off the left edge
    pub scroll: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self { pos: 0, scroll: 0 }
    }

    /// Reset cursor to start (used when the buffer is cleared).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll = 0;
    }

    /// Display column of the cursor, counted from the start of the buffer.
    pub fn column(&self, buffer: &str) -> u16 {
        u16::try_from(buffer[..self.pos].width()).unwrap_or(u16::MAX)
    }

    /// Shift the scroll column so the cursor stays inside `width` columns.
    pub fn update_scroll(&mut self, buffer: &str, width: u16) {
        if width == 0 {
            self.scroll = 0;
            return;
        }
        let col = self.column(buffer);
        if col < self.scroll {
            self.scroll = col;
        } else if col >= self.scroll.saturating_add(width) {
            self.scroll = col - width + 1;
        }
    }

    /// The part of `buffer` that fits between the scroll column and `width`.
    pub fn visible_slice(&self, buffer: &str, width: u16) -> String {
        let mut skipped = 0usize;
        let mut used = 0usize;
        let mut out = String::new();
        for c in buffer.chars() {
            let w = c.width().unwrap_or(0);
            if skipped < self.scroll as usize {
                skipped += w;
                continue;
            }
            if used + w > width as usize {
                break;
            }
            used += w;
            out.push(c);
        }
        out
    }

    /// Screen position for the terminal cursor inside the input `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let visible_col = self
            .column(buffer)
            .saturating_sub(self.scroll)
            .min(inner_width(area.width));
        (area.x + CONTENT_OFFSET + visible_col, area.y + 1)
    }
}
