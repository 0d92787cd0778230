use thiserror::Error;

use super::TerminalId;

/// Errors raised by terminal hosts.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error on {id}: {source}")]
    Io {
        id: TerminalId,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is closed")]
    Closed(TerminalId),

    #[error("Terminal host error: {0}")]
    Host(String),
}

impl TerminalError {
    pub fn io(id: TerminalId, source: std::io::Error) -> Self {
        TerminalError::Io { id, source }
    }
}
