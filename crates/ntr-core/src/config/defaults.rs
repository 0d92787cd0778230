//! Default values for ntr configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Runner Defaults
// ============================================================================

/// Program that runs the tests.
pub const DEFAULT_RUNNER_PROGRAM: &str = "node";

/// Flag enabling the built-in test runner.
pub const DEFAULT_TEST_FLAG: &str = "--test";

/// Flag enabling watch mode.
pub const DEFAULT_WATCH_FLAG: &str = "--watch";

/// Flag filtering tests by name pattern.
pub const DEFAULT_NAME_PATTERN_FLAG: &str = "--test-name-pattern";

// ============================================================================
// Terminal Defaults
// ============================================================================

/// Base display name of a session terminal.
pub const DEFAULT_TERMINAL_NAME: &str = "Node Test Runner";

/// Shell hosting a session.
#[cfg(windows)]
pub const DEFAULT_SHELL: &str = "cmd";

/// Shell hosting a session.
#[cfg(not(windows))]
pub const DEFAULT_SHELL: &str = "sh";

// ============================================================================
// Document Defaults
// ============================================================================

/// File extensions treated as test documents (JavaScript and TypeScript,
/// including the React variants).
pub const DEFAULT_DOCUMENT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

/// Directories skipped during discovery, on top of ignore files.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "coverage"];

// ============================================================================
// File Locations
// ============================================================================

/// Project-local configuration file.
pub const PROJECT_CONFIG_FILE: &str = "ntr.toml";

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "ntr";

/// File name inside [`USER_CONFIG_DIR`].
pub const USER_CONFIG_FILE: &str = "config.toml";
