//! Exact-match pattern construction for `--test-name-pattern`.

use super::patterns::REGEX_SPECIAL_CHARS;

/// Backslash-escape every regex metacharacter in `text`.
pub fn escape_for_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        if REGEX_SPECIAL_CHARS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Build a pattern matching exactly `name` and nothing else.
///
/// ```
/// use ntr_core::build_exact_pattern;
///
/// assert_eq!(build_exact_pattern("handles (complex) cases?"), r"^handles \(complex\) cases\?$");
/// assert_eq!(build_exact_pattern(""), "^$");
/// ```
pub fn build_exact_pattern(name: &str) -> String {
    format!("^{}$", escape_for_regex(name))
}
