//! Configuration management for ntr.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `ntr.toml` file
//! 3. User config `~/.config/ntr/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Test runner invocation.
    pub runner: RunnerConfig,

    /// Session terminal settings.
    pub terminal: TerminalConfig,

    /// Which files count as test documents.
    pub documents: DocumentsConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./ntr.toml` (project local)
    /// 2. `~/.config/ntr/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(program) = std::env::var("NTR_RUNNER_PROGRAM") {
            self.runner.program = program;
        }
        if let Ok(name) = std::env::var("NTR_TERMINAL_NAME") {
            self.terminal.name = name;
        }
        if let Ok(shell) = std::env::var("NTR_TERMINAL_SHELL") {
            self.terminal.shell = shell;
        }
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// How the test runner is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Program token that starts the command line.
    pub program: String,

    /// Flag that selects test mode.
    pub test_flag: String,

    /// Flag appended in watch mode.
    pub watch_flag: String,

    /// Flag preceding the exact-match name pattern.
    pub name_pattern_flag: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_RUNNER_PROGRAM.to_string(),
            test_flag: DEFAULT_TEST_FLAG.to_string(),
            watch_flag: DEFAULT_WATCH_FLAG.to_string(),
            name_pattern_flag: DEFAULT_NAME_PATTERN_FLAG.to_string(),
        }
    }
}

/// Session terminal settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Base display name; the workspace folder name is appended when known.
    pub name: String,

    /// Shell executable for process-backed terminals.
    pub shell: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TERMINAL_NAME.to_string(),
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

impl TerminalConfig {
    /// Display name for a session, qualified by the workspace folder name.
    pub fn display_name(&self, folder_name: Option<&str>) -> String {
        match folder_name {
            Some(folder) => format!("{} ({})", self.name, folder),
            None => self.name.clone(),
        }
    }
}

/// Which files are scanned for declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// File extensions without the leading dot.
    pub extensions: Vec<String>,

    /// Directory names never descended into by discovery.
    pub exclude_dirs: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_DOCUMENT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DocumentsConfig {
    /// Whether the path has one of the configured extensions.
    pub fn is_supported(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }

    /// Whether a directory name is excluded from discovery.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }
}
