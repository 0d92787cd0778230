use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::invocation::Invocation;
use crate::session::{SessionRegistry, TeardownReport};
use crate::terminal::{Terminal, TerminalError, TerminalHost, TerminalId};
use crate::uri::{FileUri, UriError};
use crate::workspace::{WorkspaceKey, WorkspaceResolver};

/// Options for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Keep the runner alive and re-run on file changes.
    pub watch: bool,
}

impl RunOptions {
    pub fn watch() -> Self {
        Self { watch: true }
    }
}

/// Sends test runs to per-workspace sessions.
///
/// Owns the session registry; create one at start-up and call
/// [`dispose_all`](Self::dispose_all) at shutdown.
pub struct TestRunner<H: TerminalHost, W: WorkspaceResolver> {
    registry: SessionRegistry<H>,
    workspaces: W,
    config: Config,
}

impl<H: TerminalHost, W: WorkspaceResolver> TestRunner<H, W> {
    pub fn new(host: H, workspaces: W, config: Config) -> Self {
        Self {
            registry: SessionRegistry::new(host),
            workspaces,
            config,
        }
    }

    pub fn registry(&self) -> &SessionRegistry<H> {
        &self.registry
    }

    pub fn workspaces(&self) -> &W {
        &self.workspaces
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Key of the workspace owning `file`.
    pub fn resolve_workspace_key(&self, file: &FileUri) -> WorkspaceKey {
        self.workspaces.workspace_key(file)
    }

    /// Run `test_name` in `file`, or the whole file when no name is given.
    ///
    /// Reuses the workspace's session or creates one. The command is sent
    /// and the session shown; the run itself is not awaited.
    pub async fn run_test(
        &mut self,
        file: &FileUri,
        test_name: Option<&str>,
        options: RunOptions,
    ) -> Result<(), RunnerError> {
        let key = self.resolve_workspace_key(file);
        let folder = self.workspaces.workspace_folder(file);
        let display_name = self
            .config
            .terminal
            .display_name(folder.map(|f| f.name.as_str()));
        let cwd = folder.map(|f| f.uri.fs_path().to_path_buf());

        let command = Invocation::new(file.fs_path())
            .with_test_name(test_name)
            .with_watch(options.watch)
            .command_line(&self.config.runner);

        let session = self.registry.get_or_create(&key, &display_name, cwd).await?;
        debug!(key = %key, terminal = %session.terminal_id(), %command, "sending test run");

        session.terminal.send_text(&command, true).await?;
        session.terminal.show(true).await?;
        Ok(())
    }

    /// Stop the session of the workspace owning `file`.
    ///
    /// Returns `false` when there is nothing to stop.
    pub async fn stop_watch(&mut self, file: &FileUri) -> Result<bool, RunnerError> {
        let key = self.resolve_workspace_key(file);

        // Unregister first: disposing may report the closure right back.
        let Some(session) = self.registry.remove(&key) else {
            debug!(key = %key, "no session to stop");
            return Ok(false);
        };

        info!(
            key = %key,
            terminal = %session.terminal_id(),
            age_secs = session.age().num_seconds(),
            "stopping session"
        );
        if let Err(err) = session.terminal.dispose().await {
            warn!(key = %key, error = %err, "failed to dispose stopped session");
        }
        Ok(true)
    }

    /// Forget the session whose terminal closed on its own.
    pub fn handle_terminal_closed(&mut self, terminal: TerminalId) -> Option<WorkspaceKey> {
        self.registry.handle_terminal_closed(terminal)
    }

    /// Dispose every session. Never fails; see [`TeardownReport`].
    pub async fn dispose_all(&mut self) -> TeardownReport {
        self.registry.dispose_all().await
    }
}

/// Errors from dispatching a run.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Terminal error: {0}")]
    Terminal(#[from] TerminalError),

    #[error(transparent)]
    Uri(#[from] UriError),
}
