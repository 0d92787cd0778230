//! Registry of live sessions, one per workspace.

mod teardown;

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::terminal::{Terminal, TerminalError, TerminalHost, TerminalId, TerminalOptions};
use crate::workspace::WorkspaceKey;

pub use teardown::{dispose_best_effort, TeardownFailure, TeardownReport};

/// A terminal bound to a workspace.
#[derive(Debug)]
pub struct Session<T> {
    pub key: WorkspaceKey,
    pub terminal: T,
    pub display_name: String,
    pub started_at: DateTime<Utc>,
}

impl<T: Terminal> Session<T> {
    pub fn terminal_id(&self) -> TerminalId {
        self.terminal.id()
    }

    /// Time since the session was created.
    pub fn age(&self) -> Duration {
        Utc::now() - self.started_at
    }
}

/// Maps workspace keys to their session.
///
/// Holds at most one session per key. Entries leave the registry on
/// [`remove`](Self::remove), on [`handle_terminal_closed`](Self::handle_terminal_closed)
/// and on [`dispose_all`](Self::dispose_all).
pub struct SessionRegistry<H: TerminalHost> {
    host: H,
    sessions: HashMap<WorkspaceKey, Session<H::Terminal>>,
}

impl<H: TerminalHost> SessionRegistry<H> {
    /// Creates an empty registry creating terminals through `host`.
    pub fn new(host: H) -> Self {
        Self {
            host,
            sessions: HashMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the session for `key`, creating it if there is none.
    ///
    /// An existing session is returned as is; its terminal is not probed.
    pub async fn get_or_create(
        &mut self,
        key: &WorkspaceKey,
        display_name: &str,
        cwd: Option<PathBuf>,
    ) -> Result<&Session<H::Terminal>, TerminalError> {
        if !self.sessions.contains_key(key) {
            let mut options = TerminalOptions::new(display_name);
            options.cwd = cwd;

            let terminal = self.host.create_terminal(options).await?;
            info!(key = %key, terminal = %terminal.id(), name = display_name, "created session");

            self.sessions.insert(
                key.clone(),
                Session {
                    key: key.clone(),
                    terminal,
                    display_name: display_name.to_string(),
                    started_at: Utc::now(),
                },
            );
        } else {
            debug!(key = %key, "reusing session");
        }

        self.sessions
            .get(key)
            .ok_or_else(|| TerminalError::Host(format!("session for {key} vanished")))
    }

    pub fn get(&self, key: &WorkspaceKey) -> Option<&Session<H::Terminal>> {
        self.sessions.get(key)
    }

    pub fn contains(&self, key: &WorkspaceKey) -> bool {
        self.sessions.contains_key(key)
    }

    /// Takes the session for `key` out of the registry without disposing it.
    pub fn remove(&mut self, key: &WorkspaceKey) -> Option<Session<H::Terminal>> {
        self.sessions.remove(key)
    }

    /// Forgets the session whose terminal closed outside our control.
    ///
    /// Returns the key that was released, or `None` when the terminal is not
    /// (or no longer) registered.
    pub fn handle_terminal_closed(&mut self, terminal: TerminalId) -> Option<WorkspaceKey> {
        let key = self
            .sessions
            .iter()
            .find(|(_, session)| session.terminal_id() == terminal)
            .map(|(key, _)| key.clone())?;

        let session = self.sessions.remove(&key)?;
        info!(
            key = %key,
            terminal = %terminal,
            age_secs = session.age().num_seconds(),
            "session terminal closed"
        );
        Some(key)
    }

    /// Disposes every session and empties the registry.
    ///
    /// Individual failures are logged and reported, never propagated.
    pub async fn dispose_all(&mut self) -> TeardownReport {
        let report = dispose_best_effort(self.sessions.iter().map(|(key, s)| (key, &s.terminal))).await;
        self.sessions.clear();

        for failure in &report.failures {
            warn!(
                key = %failure.key,
                terminal = %failure.terminal,
                error = %failure.error,
                "failed to dispose session terminal"
            );
        }

        report
    }

    /// Live sessions, in no particular order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session<H::Terminal>> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
