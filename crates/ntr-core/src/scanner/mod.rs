//! Line-oriented detection of `node:test` declarations.
//!
//! Recognizes `test(...)`, `it(...)` and `describe(...)` calls, optionally
//! qualified with `.only` or `.skip`, whose first argument is a quoted string
//! literal. This is pattern detection, not parsing: a declaration spanning
//! several lines is found only if the name starts on the keyword's line.

mod escape;
mod patterns;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use escape::{build_exact_pattern, escape_for_regex};
pub use patterns::{DECLARATION_KEYWORDS, DECLARATION_PATTERN, DECLARATION_QUALIFIERS};

static DECLARATION_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(DECLARATION_PATTERN).ok());

/// A test or group declaration found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDeclaration {
    /// 0-indexed line number.
    pub line: usize,
    /// Literal name as written in source, escapes left in place.
    pub name: String,
}

impl TestDeclaration {
    pub fn new(line: usize, name: impl Into<String>) -> Self {
        Self {
            line,
            name: name.into(),
        }
    }
}

/// Extract the declared name from a single line, if it declares a test.
pub fn scan_line(line: &str) -> Option<&str> {
    if line.is_empty() {
        return None;
    }

    let re = DECLARATION_RE.as_ref()?;
    let caps = re.captures(line)?;

    (1..=3)
        .find_map(|group| caps.get(group))
        .map(|m| m.as_str())
}

/// Find every declaration in `text`, in document order.
///
/// Lines are split on `\n` with an optional preceding `\r`.
pub fn scan_document(text: &str) -> Vec<TestDeclaration> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .filter_map(|(index, line)| scan_line(line).map(|name| TestDeclaration::new(index, name)))
        .collect()
}
