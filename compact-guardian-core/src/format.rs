//! Text truncation helpers shared by the extractors and the renderer.

use std::borrow::Cow;

/// Keep at most `max_chars` characters of `text`.
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cut `text` to `max_chars` characters, appending "..." when anything was dropped.
pub fn ellipsize(text: &str, max_chars: usize) -> Cow<'_, str> {
    let kept = take_chars(text, max_chars);
    if kept.len() == text.len() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{}...", kept))
    }
}

/// Longest prefix of `text` that fits in `max_bytes` without splitting a character.
pub fn floor_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
