use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

const KEY_HINTS: &str = "Enter send · ↑/↓ PgUp/PgDn scroll · Ctrl+End latest · Esc quit";

/// Draws the whole chat screen: title, transcript, input and key hints.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, anim_frame: usize) {
    use Constraint::{Length, Min};
    let input_height = tui.input_box.height();
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height), Length(1)]);
    let [title_area, main_area, input_area, hint_area] = layout.areas(frame.area());

    // Transcript first: it decides whether there is unseen content
    MessageList::new(
        &mut tui.message_list,
        &app.conversation,
        app.is_loading,
        anim_frame,
    )
    .render(frame, main_area);

    TitleBar::new(
        &app.model_name,
        &app.status_message,
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);

    frame.render_widget(
        Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
        hint_area,
    );
}
