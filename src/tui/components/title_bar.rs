//! # TitleBar Component
//!
//! Single-line header above the transcript.
//!
//! The text changes based on state:
//!
//! 1. **Unseen content**: `"AI Assistant (model: gpt-4) | Thinking... | ↓ New"`
//! 2. **Status message**: `"AI Assistant (model: gpt-4) | Ready"`
//! 3. **No status**: `"AI Assistant (model: gpt-4)"`
//!
//! TitleBar is purely presentational: it receives everything as props and
//! keeps no internal state.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

const TITLE: &str = "AI Assistant";

pub struct TitleBar<'a> {
    pub model_name: &'a str,
    pub status_message: &'a str,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl<'a> TitleBar<'a> {
    pub fn new(model_name: &'a str, status_message: &'a str, has_unseen_content: bool) -> Self {
        Self {
            model_name,
            status_message,
            has_unseen_content,
        }
    }

    pub fn text(&self) -> String {
        let mut text = format!("{TITLE} (model: {})", self.model_name);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(title_bar: &mut TitleBar<'_>) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let text = draw(&mut TitleBar::new("gpt-4", "Thinking...", true));
        assert!(text.contains("AI Assistant"));
        assert!(text.contains("gpt-4"));
        assert!(text.contains("Thinking..."));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let text = draw(&mut TitleBar::new("openai/gpt-3.5-turbo", "Ready", false));
        assert!(text.contains("openai/gpt-3.5-turbo"));
        assert!(text.contains("| Ready"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let title_bar = TitleBar::new("gpt-4", "", false);
        assert_eq!(title_bar.text(), "AI Assistant (model: gpt-4)");
    }
}
