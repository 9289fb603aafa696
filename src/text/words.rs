//! Word boundaries over code-point slices.

/// Alphanumerics and `_` form words; everything else separates them.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Offset of the end of the next word at or after `from`.
///
/// Skips separators, then the word that follows. Returns `chars.len()` when
/// no word remains.
pub fn next_word_end(chars: &[char], from: usize) -> usize {
    let mut i = from.min(chars.len());
    while i < chars.len() && !is_word_char(chars[i]) {
        i += 1;
    }
    while i < chars.len() && is_word_char(chars[i]) {
        i += 1;
    }
    i
}

/// Offset of the start of the word before `from`.
///
/// Skips separators leftwards, then the word before them. Returns 0 when no
/// word precedes `from`.
pub fn previous_word_start(chars: &[char], from: usize) -> usize {
    let mut i = from.min(chars.len());
    while i > 0 && !is_word_char(chars[i - 1]) {
        i -= 1;
    }
    while i > 0 && is_word_char(chars[i - 1]) {
        i -= 1;
    }
    i
}

/// Boundaries of the word containing `at`, or an empty range at `at` when it
/// sits between separators.
pub fn word_range_at(chars: &[char], at: usize) -> (usize, usize) {
    let at = at.min(chars.len());
    let mut start = at;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = at;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    (start, end)
}
