//! Small text helpers shared by the pipelines.

/// Cut `text` to at most `max_chars` characters (Unicode scalar values).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Length in characters, the unit every threshold is expressed in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
