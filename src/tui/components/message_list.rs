//! # MessageList Component
//!
//! Scrollable view of the visible transcript.
//!
//! ## Responsibilities
//!
//! - Project the conversation into display entries (system turn hidden,
//!   pending bubble appended while a request is in flight)
//! - Manage scrolling, including snap-to-bottom when the entry count changes
//! - Cache per-entry heights so only new rows are measured
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Conversation` (props).
//! Since `Component::render` takes `&mut self`, the layout cache and scroll
//! state are updated during the render pass, like a ratatui `StatefulWidget`.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::inference::Conversation;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Entry, Message};
use crate::tui::event::TuiEvent;

/// Display entries for the transcript, in order.
///
/// System turns are never shown. While `in_flight`, a trailing
/// [`Entry::Pending`] stands in for the reply.
pub fn visible_entries(conversation: &Conversation, in_flight: bool) -> Vec<Entry<'_>> {
    let mut entries: Vec<Entry<'_>> = conversation.visible().map(Entry::Turn).collect();
    if in_flight {
        entries.push(Entry::Pending);
    }
    entries
}

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, the view follows the bottom of the transcript
    pub stick_to_bottom: bool,
    /// Whether content exists below the viewport (drives the "↓ New" badge)
    pub has_unseen_content: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Entry count seen by the previous render
    last_entry_count: usize,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            has_unseen_content: false,
            viewport_height: 0,
            last_entry_count: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Jump to the last row and follow new content again.
    pub fn snap_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        let max_y = self.max_offset();
        self.scroll_state.set_offset(Position { x: 0, y: max_y });
    }

    /// Re-engage auto-scroll if the user has scrolled back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        if self.scroll_state.offset().y >= self.max_offset() {
            self.snap_to_bottom();
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub conversation: &'a Conversation,
    pub is_loading: bool,
    /// Animation frame for the pending bubble
    pub frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        conversation: &'a Conversation,
        is_loading: bool,
        frame: usize,
    ) -> Self {
        Self {
            state,
            conversation,
            is_loading,
            frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for the scrollbar
        let entries = visible_entries(self.conversation, self.is_loading);

        // 1. Measure only what the cache can't reuse
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(entries.len(), content_width);
        layout.heights.truncate(reusable);
        for entry in entries.iter().skip(reusable) {
            layout
                .heights
                .push(Message::calculate_height(*entry, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(&entries, content_width);

        let total_height = self.state.layout.total_height();
        self.state.viewport_height = area.height;

        // 2. New or removed entries always bring the view to the bottom
        if entries.len() != self.state.last_entry_count {
            self.state.last_entry_count = entries.len();
            self.state.stick_to_bottom = true;
        }
        if self.state.stick_to_bottom {
            self.state.snap_to_bottom();
        } else {
            self.state.clamp_scroll();
        }

        // 3. Render visible entries into a ScrollView
        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (i, top, height) in self.state.layout.rows(visible_range) {
            let row = Rect::new(0, top, content_width, height);
            scroll_view.render_widget(Message::new(entries[i], self.frame), row);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let current_offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_content = current_offset < self.state.max_offset();
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because `MessageList` is recreated each frame and can't hold scroll state.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.snap_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    entry_count: usize,
    content_width: u16,
    /// The pending bubble is replaced by a real turn, so its height is never reused.
    ends_with_pending: bool,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            entry_count: 0,
            content_width: 0,
            ends_with_pending: false,
        }
    }

    /// How many leading cached heights are still valid.
    ///
    /// Turns are immutable once appended, so everything but a trailing
    /// pending bubble survives as long as the width is unchanged.
    pub fn reusable_count(&self, entry_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || entry_count < self.entry_count {
            return 0;
        }
        let stable = if self.ends_with_pending {
            self.entry_count.saturating_sub(1)
        } else {
            self.entry_count
        };
        stable.min(self.heights.len())
    }

    pub fn update_metadata(&mut self, entries: &[Entry<'_>], content_width: u16) {
        self.entry_count = entries.len();
        self.content_width = content_width;
        self.ends_with_pending = matches!(entries.last(), Some(Entry::Pending));
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Y coordinate where entry `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        match index {
            0 => 0,
            i => self.prefix_heights.get(i - 1).copied().unwrap_or(0),
        }
    }

    /// `(index, top, height)` for each entry in `range`. Tops saturate at
    /// `u16::MAX`, matching the prefix heights.
    pub fn rows(&self, range: std::ops::Range<usize>) -> Vec<(usize, u16, u16)> {
        let mut top = self.top_of(range.start);
        range
            .filter_map(|i| {
                let height = *self.heights.get(i)?;
                let row = (i, top, height);
                top = top.saturating_add(height);
                Some(row)
            })
            .collect()
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{Role, Turn};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_list(
        terminal: &mut Terminal<TestBackend>,
        state: &mut MessageListState,
        conversation: &Conversation,
        is_loading: bool,
    ) -> String {
        terminal
            .draw(|f| {
                let mut list = MessageList::new(state, conversation, is_loading, 0);
                list.render(f, f.area());
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
    fn visible_entries_hide_system_and_add_pending() {
        let mut conv = Conversation::seeded(Some("secret prompt"), Some("Welcome"));
        conv.push_user("hi");

        let idle = visible_entries(&conv, false);
        assert_eq!(idle.len(), 2);
        assert!(
            idle.iter()
                .all(|e| matches!(e, Entry::Turn(t) if t.role() != Role::System))
        );

        let busy = visible_entries(&conv, true);
        assert_eq!(busy.len(), 3);
        assert_eq!(busy.last(), Some(&Entry::Pending));
    }

    #[test]
    fn system_turn_is_never_drawn() {
        let conv = Conversation::seeded(Some("secret prompt"), Some("Welcome"));
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let mut state = MessageListState::new();

        let text = render_list(&mut terminal, &mut state, &conv, false);
        assert!(text.contains("Welcome"));
        assert!(!text.contains("secret prompt"));
    }

    #[test]
    fn pending_bubble_only_while_in_flight() {
        let mut conv = Conversation::seeded(None, Some("Welcome"));
        conv.push_user("question");
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        let mut state = MessageListState::new();

        let busy = render_list(&mut terminal, &mut state, &conv, true);
        assert!(busy.contains("Thinking."));

        conv.push_assistant("answer");
        let idle = render_list(&mut terminal, &mut state, &conv, false);
        assert!(!idle.contains("Thinking"));
        assert!(idle.contains("answer"));
    }

    #[test]
    fn new_entry_snaps_to_bottom() {
        let mut conv = Conversation::new();
        for i in 0..10 {
            conv.push_user(format!("question {i}"));
            conv.push_assistant(format!("answer {i}"));
        }
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        let mut state = MessageListState::new();
        render_list(&mut terminal, &mut state, &conv, false);

        // User scrolls away from the bottom
        state.handle_event(&TuiEvent::ScrollPageUp);
        state.handle_event(&TuiEvent::ScrollUp);
        render_list(&mut terminal, &mut state, &conv, false);
        assert!(!state.stick_to_bottom);
        assert!(state.has_unseen_content);

        conv.push_user("latest");
        let text = render_list(&mut terminal, &mut state, &conv, true);
        assert!(state.stick_to_bottom);
        assert!(!state.has_unseen_content);
        assert_eq!(
            state.scroll_state.offset().y,
            state.layout.total_height().saturating_sub(10)
        );
        assert!(text.contains("Thinking"));
    }

    #[test]
    fn scroll_to_bottom_event_repins() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![5; 10];
        state.layout.rebuild_prefix_heights();
        state.viewport_height = 10;
        state.stick_to_bottom = false;

        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
        assert_eq!(state.scroll_state.offset().y, 40);
    }

    #[test]
    fn test_layout_cache_reusable() {
        let user = Turn::new(Role::User, "hi");
        let reply = Turn::new(Role::Assistant, "hello");

        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 3];
        cache.update_metadata(&[Entry::Turn(&user), Entry::Turn(&reply)], 80);

        // Same or more entries at the same width → cached heights kept
        assert_eq!(cache.reusable_count(2, 80), 2);
        assert_eq!(cache.reusable_count(3, 80), 2);
        // Width change → re-measure everything
        assert_eq!(cache.reusable_count(2, 40), 0);
        // Fewer entries → conversation replaced
        assert_eq!(cache.reusable_count(1, 80), 0);
    }

    #[test]
    fn pending_height_is_never_reused() {
        let user = Turn::new(Role::User, "hi");
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 3];
        cache.update_metadata(&[Entry::Turn(&user), Entry::Pending], 80);

        // Pending replaced by the reply: only the user row survives
        assert_eq!(cache.reusable_count(2, 80), 1);
    }

    #[test]
    fn rows_saturate_on_very_tall_transcripts() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![u16::MAX - 2, 5, 5];
        cache.rebuild_prefix_heights();

        let rows = cache.rows(0..3);
        assert_eq!(
            rows,
            vec![(0, 0, u16::MAX - 2), (1, u16::MAX - 2, 5), (2, u16::MAX, 5)]
        );
        assert_eq!(cache.total_height(), u16::MAX);
    }

    #[test]
    fn visible_range_covers_viewport() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![4; 10];
        cache.rebuild_prefix_heights();

        let range = cache.visible_range(20, 8);
        assert!(range.contains(&5));
        assert!(range.contains(&6));
        assert!(range.end <= 10);
        assert_eq!(cache.top_of(5), 20);
        assert_eq!(cache.total_height(), 40);
    }
}
