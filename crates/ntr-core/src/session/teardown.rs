//! Best-effort disposal of many sessions.

use crate::terminal::{Terminal, TerminalError, TerminalId};
use crate::workspace::WorkspaceKey;

/// A disposal that failed during teardown.
#[derive(Debug)]
pub struct TeardownFailure {
    pub key: WorkspaceKey,
    pub terminal: TerminalId,
    pub error: TerminalError,
}

/// Outcome of disposing a batch of sessions.
#[derive(Debug, Default)]
pub struct TeardownReport {
    /// Number of terminals disposed without error.
    pub disposed: usize,
    pub failures: Vec<TeardownFailure>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Dispose every terminal, collecting failures instead of stopping at the first.
pub async fn dispose_best_effort<'a, T, I>(terminals: I) -> TeardownReport
where
    T: Terminal + 'a,
    I: IntoIterator<Item = (&'a WorkspaceKey, &'a T)>,
{
    let mut report = TeardownReport::default();

    for (key, terminal) in terminals {
        match terminal.dispose().await {
            Ok(()) => report.disposed += 1,
            Err(error) => report.failures.push(TeardownFailure {
                key: key.clone(),
                terminal: terminal.id(),
                error,
            }),
        }
    }

    report
}
