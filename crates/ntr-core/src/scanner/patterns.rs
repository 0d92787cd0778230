//! Regex patterns and keywords for declaration detection.

/// Declaration keywords: case, item and group forms.
pub const DECLARATION_KEYWORDS: &[&str] = &["test", "it", "describe"];

/// Qualifiers that may follow a keyword after a dot.
pub const DECLARATION_QUALIFIERS: &[&str] = &["only", "skip"];

/// Characters escaped by [`super::escape_for_regex`].
pub const REGEX_SPECIAL_CHARS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// A declaration anchored at line start: keyword, optional qualifier, an
/// opening paren and a quoted first argument.
///
/// The `regex` crate has no backreferences, so each quote kind gets its own
/// alternative. Capture groups 1, 2 and 3 hold the single-quoted,
/// double-quoted and backtick-quoted literal respectively.
pub const DECLARATION_PATTERN: &str = concat!(
    r"^\s*(?:test|it|describe)(?:\.(?:skip|only))?\s*\(\s*",
    r"(?:'((?:\\.|[^'\n])+)'",
    r#"|"((?:\\.|[^"\n])+)""#,
    r"|`((?:\\.|[^`\n])+)`)",
);
