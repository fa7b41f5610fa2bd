//! Text helpers shared by the scoring policy and diagnostics.

/// Normalize a learner or reference answer for literal comparison.
///
/// Trims surrounding whitespace and lowercases.
pub fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Truncate a string to a maximum byte length with ellipsis (UTF-8 safe)
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
