//! Shared utilities for channel implementations.

/// Split a long message into chunks that respect a platform's size limit.
///
/// Slice boundaries are aligned to UTF-8 char boundaries so multi-byte
/// content (Cyrillic, emoji) never panics. Prefers splitting at newlines.
pub fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        // A single char wider than max_len: take it whole.
        if end == start {
            end = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .map(|i| start + i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }

    chunks
}
