//! The command line sent to a session.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::RunnerConfig;
use crate::scanner::build_exact_pattern;

/// Quote `text` as a JSON string literal.
///
/// Guards against spaces and most shell metacharacters in paths and names.
/// It is not a full shell escaper: `$` and backticks survive inside the
/// double quotes of POSIX shells.
pub fn shell_quote(text: &str) -> String {
    Value::String(text.to_owned()).to_string()
}

/// One run of the test runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub file: PathBuf,
    pub test_name: Option<String>,
    pub watch: bool,
}

impl Invocation {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            test_name: None,
            watch: false,
        }
    }

    pub fn with_test_name(mut self, test_name: Option<impl Into<String>>) -> Self {
        self.test_name = test_name.map(Into::into);
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Tokens in order: program, test flag, watch flag, name filter, file.
    pub fn tokens(&self, runner: &RunnerConfig) -> Vec<String> {
        let mut tokens = vec![runner.program.clone(), runner.test_flag.clone()];

        if self.watch {
            tokens.push(runner.watch_flag.clone());
        }

        if let Some(name) = &self.test_name {
            tokens.push(runner.name_pattern_flag.clone());
            tokens.push(shell_quote(&build_exact_pattern(name)));
        }

        tokens.push(shell_quote(&path_text(&self.file)));
        tokens
    }

    /// The single line sent to the terminal.
    pub fn command_line(&self, runner: &RunnerConfig) -> String {
        self.tokens(runner).join(" ")
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_simple_strings() {
        assert_eq!(shell_quote("test"), r#""test""#);
    }

    #[test]
    fn test_escapes_special_characters() {
        assert_eq!(shell_quote(r#"test with "quotes""#), r#""test with \"quotes\"""#);
        assert_eq!(shell_quote("tab\there"), r#""tab\there""#);
        assert_eq!(shell_quote(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn test_handles_paths_with_spaces() {
        assert_eq!(shell_quote("/path/to/my test.js"), r#""/path/to/my test.js""#);
    }

    #[test]
    fn test_run_file() {
        let line = Invocation::new("/p/a.test.js").command_line(&RunnerConfig::default());
        assert_eq!(line, r#"node --test "/p/a.test.js""#);
    }

    #[test]
    fn test_run_single_in_watch_mode() {
        let invocation = Invocation::new("/p/a.test.js")
            .with_test_name(Some("adds numbers"))
            .with_watch(true);
        assert_eq!(
            invocation.command_line(&RunnerConfig::default()),
            r#"node --test --watch --test-name-pattern "^adds numbers$" "/p/a.test.js""#
        );
    }

    #[test]
    fn test_pattern_backslashes_are_json_escaped() {
        let invocation = Invocation::new("/p/a.test.js").with_test_name(Some("adds (1,2)"));
        assert_eq!(
            invocation.command_line(&RunnerConfig::default()),
            r#"node --test --test-name-pattern "^adds \\(1,2\\)$" "/p/a.test.js""#
        );
    }

    #[test]
    fn test_custom_runner() {
        let runner = RunnerConfig {
            program: "bun".to_string(),
            ..RunnerConfig::default()
        };
        let tokens = Invocation::new("a.test.ts").with_watch(true).tokens(&runner);
        assert_eq!(tokens, vec!["bun", "--test", "--watch", r#""a.test.ts""#]);
    }
}
