use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::inference::{Role, Turn};
use crate::tui::component::Component;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// User bubbles never take more than this share of the row.
const USER_MAX_WIDTH_NUM: u16 = 3;
const USER_MAX_WIDTH_DEN: u16 = 4;

const PENDING_LABEL: &str = "Thinking";
const PENDING_MAX_DOTS: usize = 3;

const USER_COLOR: Color = Color::Green;
const ASSISTANT_COLOR: Color = Color::Blue;

/// One row of the transcript as the list sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    Turn(&'a Turn),
    /// Placeholder for the reply in flight. Never stored in the conversation.
    Pending,
}

/// Text of the pending bubble for an animation frame: 1 to 3 dots.
pub fn pending_text(frame: usize) -> String {
    format!("{PENDING_LABEL}{}", ".".repeat(frame % PENDING_MAX_DOTS + 1))
}

/// A stateless component that renders one transcript entry as a bubble.
///
/// # Layout
///
/// - **User** turns: plain text, green, right-aligned, at most 3/4 of the width.
///   Narrow messages shrink the bubble to fit.
/// - **Assistant** turns: markdown, blue, left-aligned, full width.
/// - **Pending**: a small left-aligned "Thinking..." bubble.
///
/// `Message` is created fresh each frame; `MessageList` owns the cached heights.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub entry: Entry<'a>,
    /// Animation frame for the pending bubble
    pub frame: usize,
}

impl<'a> Message<'a> {
    pub fn new(entry: Entry<'a>, frame: usize) -> Self {
        Self { entry, frame }
    }

    /// Height this entry needs at the given row width.
    ///
    /// Counts rows of the same paragraph `render` draws: user text is
    /// pre-wrapped with `textwrap`, markdown wraps via `Paragraph::line_count`.
    pub fn calculate_height(entry: Entry<'_>, width: u16) -> u16 {
        let bubble_width = Self::bubble_width(entry, width);
        let content_width = bubble_width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding.
            return 1;
        }

        let lines = match entry {
            Entry::Pending => 1,
            Entry::Turn(turn) => body(turn, content_width).line_count(content_width).max(1),
        };
        (lines as u16).saturating_add(VERTICAL_OVERHEAD)
    }

    /// Width of the bubble (borders included) inside a row of `width` cells.
    pub fn bubble_width(entry: Entry<'_>, width: u16) -> u16 {
        match entry {
            Entry::Turn(turn) if turn.role() == Role::User => {
                let max = width.saturating_mul(USER_MAX_WIDTH_NUM) / USER_MAX_WIDTH_DEN;
                let natural = turn
                    .text()
                    .lines()
                    .map(UnicodeWidthStr::width)
                    .max()
                    .unwrap_or(0);
                let natural = u16::try_from(natural)
                    .unwrap_or(u16::MAX)
                    .saturating_add(HORIZONTAL_OVERHEAD)
                    .max(HORIZONTAL_OVERHEAD + 1);
                natural.min(max)
            }
            Entry::Turn(_) => width,
            Entry::Pending => {
                let widest = PENDING_LABEL.len() + PENDING_MAX_DOTS;
                (widest as u16 + HORIZONTAL_OVERHEAD).min(width)
            }
        }
    }

    /// Where the bubble sits inside the row `area`.
    fn bubble_area(&self, area: Rect) -> Rect {
        let width = Self::bubble_width(self.entry, area.width);
        let x = match self.entry {
            Entry::Turn(turn) if turn.role() == Role::User => {
                area.x + area.width.saturating_sub(width)
            }
            _ => area.x,
        };
        Rect::new(x, area.y, width, area.height)
    }
}

/// User text pre-wrapped to `width` columns, so the drawn rows are exactly
/// the measured rows.
fn wrap_plain(text: &str, width: u16) -> Vec<Line<'static>> {
    let options = textwrap::Options::new(width.max(1) as usize).break_words(true);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| Line::from(line.into_owned()))
        .collect()
}

/// Body paragraph for a stored turn (no block; borders are drawn separately).
fn body(turn: &Turn, content_width: u16) -> Paragraph<'static> {
    match turn.role() {
        Role::User => Paragraph::new(Text::from(wrap_plain(turn.text(), content_width)))
            .style(Style::default().fg(USER_COLOR)),
        _ => Paragraph::new(markdown::render(turn.text(), ASSISTANT_COLOR))
            .wrap(Wrap { trim: false }),
    }
}

fn bubble_block(title: &str, color: Color) -> Block<'_> {
    let border_style = Style::default().fg(color).add_modifier(Modifier::DIM);
    Block::bordered()
        .title(title)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title_style(border_style)
        .padding(Padding::horizontal(CONTENT_PAD_H))
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let bubble = self.bubble_area(area);
        let content_width = bubble.width.saturating_sub(HORIZONTAL_OVERHEAD);

        let (block, paragraph) = match self.entry {
            Entry::Turn(turn) if turn.role() == Role::User => {
                (bubble_block("you", USER_COLOR), body(turn, content_width))
            }
            Entry::Turn(turn) => (
                bubble_block("assistant", ASSISTANT_COLOR),
                body(turn, content_width),
            ),
            Entry::Pending => {
                let style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC);
                (
                    bubble_block("assistant", Color::DarkGray),
                    Paragraph::new(pending_text(self.frame)).style(style),
                )
            }
        };

        let inner_area = block.inner(bubble);
        block.render(bubble, buf);
        paragraph.render(inner_area, buf);
    }
}

/// `Message` is stateless; the trait impl delegates to [`Widget`].
impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
