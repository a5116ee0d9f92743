//! String utilities for the domain layer.

/// Cut a string to at most `max_chars` characters and append `...`.
///
/// Counts Unicode scalar values, not bytes, so multi-byte text is never
/// split inside a character. The ellipsis is always appended.
pub fn clip_with_ellipsis(s: &str, max_chars: usize) -> String {
    let clipped: String = s.chars().take(max_chars).collect();
    format!("{}...", clipped)
}

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
