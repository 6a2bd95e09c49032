//! Pure editing helpers and dimensional constants for the single-line InputBox.
//!
//! These are stateless helpers with no dependency on InputBox or CursorState.
//! All positions are byte offsets that sit on a char boundary.

/// Longest message a user may type, in characters.
pub const MAX_INPUT_CHARS: usize = 180;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Offset from area edge to content (border + padding)
pub(super) const CONTENT_OFFSET: u16 = 2;
/// Border + one text row + border
pub(super) const INPUT_HEIGHT: u16 = 3;

/// Inner content width after subtracting border/padding overhead.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Makes pasted or typed text fit a one-line field: line breaks and tabs
/// become spaces, other control characters are dropped.
pub(super) fn flatten(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            // CRLF collapses to a single space
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' | '\t' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Inserts as much of `text` at `pos` as the character cap allows.
///
/// Returns the number of bytes inserted (0 when the buffer is full).
pub(super) fn insert_capped(buffer: &mut String, pos: usize, text: &str, max_chars: usize) -> usize {
    let room = max_chars.saturating_sub(buffer.chars().count());
    let end = text
        .char_indices()
        .nth(room)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let accepted = &text[..end];
    buffer.insert_str(pos, accepted);
    accepted.len()
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Previous word start, readline `backward-word` style: skip non-word
/// characters, then word characters.
pub(super) fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[..pos].char_indices().rev().peekable();

    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }

    let mut boundary = 0;
    while let Some(&(i, c)) = chars.peek() {
        if !is_word_char(c) {
            boundary = i + c.len_utf8();
            break;
        }
        boundary = i;
        chars.next();
    }
    boundary
}

/// Next word end, readline `forward-word` style.
pub(super) fn next_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[pos..].char_indices().peekable();

    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }
    while chars.peek().is_some_and(|&(_, c)| is_word_char(c)) {
        chars.next();
    }

    chars.peek().map_or(text.len(), |&(i, _)| pos + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_replaces_breaks_and_drops_controls() {
        assert_eq!(flatten("a\nb\r\nc\td"), "a b c d");
        assert_eq!(flatten("bell\u{7}!"), "bell!");
        assert_eq!(flatten("café 🔥"), "café 🔥");
    }

    #[test]
    fn insert_capped_stops_at_limit() {
        let mut buffer = "a".repeat(178);
        let inserted = insert_capped(&mut buffer, 178, "xyz", MAX_INPUT_CHARS);
        assert_eq!(inserted, 2);
        assert_eq!(buffer.chars().count(), MAX_INPUT_CHARS);
        assert!(buffer.ends_with("xy"));

        assert_eq!(insert_capped(&mut buffer, 0, "q", MAX_INPUT_CHARS), 0);
    }

    #[test]
    fn insert_capped_counts_chars_not_bytes() {
        let mut buffer = String::new();
        let inserted = insert_capped(&mut buffer, 0, "éé", 1);
        assert_eq!(inserted, 2);
        assert_eq!(buffer, "é");
    }

    #[test]
    fn char_boundaries_multibyte() {
        let s = "a🔥b";
        assert_eq!(next_char_boundary(s, 1), 5);
        assert_eq!(prev_char_boundary(s, 5), 1);
        assert_eq!(prev_char_boundary(s, 1), 0);
        assert_eq!(next_char_boundary(s, 5), 6);
    }

    #[test]
    fn word_boundaries() {
        assert_eq!(prev_word_boundary("hello world", 11), 6);
        assert_eq!(prev_word_boundary("hello   world", 8), 0);
        assert_eq!(prev_word_boundary("foo.bar", 7), 4);
        assert_eq!(next_word_boundary("hello world", 0), 5);
        assert_eq!(next_word_boundary("hello world", 5), 11);
        assert_eq!(next_word_boundary("hello_world test", 0), 11);
        assert_eq!(next_word_boundary("hello", 5), 5);
    }

    #[test]
    fn inner_width_saturates() {
        assert_eq!(inner_width(40), 36);
        assert_eq!(inner_width(3), 0);
    }
}
