//! Interactive terminals provided by the host.
//!
//! A [`TerminalHost`] creates terminals; each [`Terminal`] accepts text,
//! can be brought to the foreground and disposed. Hosts report terminals
//! that close on their own by [`TerminalId`], so the session registry can
//! forget them.

mod error;
mod process;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

pub use error::TerminalError;
pub use process::{ProcessTerminal, ProcessTerminalHost};

/// Identity of a terminal, stable for its whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalId(pub u64);

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "terminal-{}", self.0)
    }
}

/// Options for a new terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalOptions {
    pub name: String,
    /// Working directory; `None` leaves it to the host.
    pub cwd: Option<PathBuf>,
}

impl TerminalOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Creates terminals.
#[async_trait]
pub trait TerminalHost: Send + Sync {
    type Terminal: Terminal;

    async fn create_terminal(&self, options: TerminalOptions) -> Result<Self::Terminal, TerminalError>;
}

/// A live interactive terminal.
#[async_trait]
pub trait Terminal: Send + Sync {
    fn id(&self) -> TerminalId;

    fn name(&self) -> &str;

    /// Send `text` as input, followed by a newline when `add_newline` is set.
    async fn send_text(&self, text: &str, add_newline: bool) -> Result<(), TerminalError>;

    /// Bring the terminal to the foreground.
    async fn show(&self, preserve_focus: bool) -> Result<(), TerminalError>;

    /// Tear the terminal down. Disposing a closed terminal is not an error.
    async fn dispose(&self) -> Result<(), TerminalError>;
}
