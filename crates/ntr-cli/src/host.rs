//! Hosting sessions as shell processes.
//!
//! Both modes own a [`TestRunner`] in a single event loop that also receives
//! the closure notifications of the shells, so the registry is only ever
//! touched from one place.

use std::path::PathBuf;
use std::str::FromStr;

use color_eyre::eyre::Result;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

use ntr_core::{
    execute_json, ActiveEditor, Config, Document, MessageSink, ProcessTerminalHost, RunOptions, RunTarget, Terminal,
    TerminalId, TestCommand, TestRunner, WorkspaceFolders,
};

use crate::console::{print_teardown, ConsoleMessages};

type ProcessRunner = TestRunner<ProcessTerminalHost, WorkspaceFolders>;

/// One line of input in session mode.
#[derive(Debug, Deserialize)]
struct Request {
    /// Command identifier, e.g. `node-test-runner.runTest`.
    command: String,
    /// Raw command argument, `{ "fileUri": ..., "testName": ... }`.
    #[serde(default)]
    args: Option<Value>,
    /// The focused editor, if any.
    #[serde(default)]
    editor: Option<EditorState>,
}

#[derive(Debug, Deserialize)]
struct EditorState {
    file: PathBuf,
    /// 0-based cursor line.
    #[serde(default)]
    line: usize,
}

impl EditorState {
    fn open(&self) -> Option<ActiveEditor> {
        match Document::open(&self.file) {
            Ok(document) => Some(ActiveEditor::new(document, self.line)),
            Err(err) => {
                warn!(file = %self.file.display(), error = %err, "cannot read editor document");
                None
            }
        }
    }
}

fn new_runner(config: Config, roots: Vec<PathBuf>) -> (ProcessRunner, UnboundedReceiver<TerminalId>) {
    let (host, closed_rx) = ProcessTerminalHost::new(config.terminal.shell.clone());
    let runner = TestRunner::new(host, WorkspaceFolders::from_paths(roots), config);
    (runner, closed_rx)
}

/// Run one target and wait until its session closes or Ctrl-C.
///
/// Without watch mode the shell is told to exit after the run, so the
/// session closes when the tests finish.
pub async fn run_once(config: Config, roots: Vec<PathBuf>, target: RunTarget, watch: bool) -> Result<()> {
    let (mut runner, mut closed_rx) = new_runner(config, roots);
    let options = if watch { RunOptions::watch() } else { RunOptions::default() };

    runner
        .run_test(&target.file, target.test_name.as_deref(), options)
        .await?;

    if !watch {
        let key = runner.resolve_workspace_key(&target.file);
        if let Some(session) = runner.registry().get(&key) {
            session.terminal.send_text("exit", true).await?;
        }
    }

    loop {
        tokio::select! {
            Some(id) = closed_rx.recv() => {
                if runner.handle_terminal_closed(id).is_some() && runner.registry().is_empty() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    print_teardown(&runner.dispose_all().await);
    Ok(())
}

/// Serve requests from stdin until EOF or Ctrl-C, then close every session.
pub async fn serve(config: Config, roots: Vec<PathBuf>) -> Result<()> {
    let (mut runner, mut closed_rx) = new_runner(config, roots);

    info!(workspaces = runner.workspaces().folders().len(), "session host ready");
    serve_requests(&mut runner, &mut closed_rx, BufReader::new(tokio::io::stdin())).await;

    let report = runner.dispose_all().await;
    info!(disposed = report.disposed, failed = report.failures.len(), "session host stopped");
    print_teardown(&report);
    Ok(())
}

/// Handle request lines from `input` until it ends, fails, or Ctrl-C.
///
/// A line that is not valid UTF-8 or JSON only loses its own request.
async fn serve_requests<R>(runner: &mut ProcessRunner, closed_rx: &mut UnboundedReceiver<TerminalId>, input: R)
where
    R: AsyncBufRead + Unpin,
{
    let messages = ConsoleMessages;
    let mut lines = input.split(b'\n');

    loop {
        tokio::select! {
            segment = lines.next_segment() => match segment {
                Ok(Some(bytes)) => handle_request(runner, &messages, &String::from_utf8_lossy(&bytes)).await,
                Ok(None) => break,
                Err(err) => {
                    error!(error = %err, "failed to read requests");
                    break;
                }
            },
            Some(id) = closed_rx.recv() => {
                runner.handle_terminal_closed(id);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }
}

async fn handle_request(runner: &mut ProcessRunner, messages: &ConsoleMessages, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "invalid request");
            return;
        }
    };

    let command = match TestCommand::from_str(&request.command) {
        Ok(command) => command,
        Err(err) => {
            warn!(error = %err, "rejected request");
            return;
        }
    };

    let editor = request.editor.as_ref().and_then(EditorState::open);
    debug!(%command, file = ?editor.as_ref().map(|e| e.document.uri().to_string()), "executing");

    if let Err(err) = execute_json(command, runner, &editor, messages, request.args.as_ref()).await {
        error!(%command, error = %err, "command failed");
        messages.show_error(&err.to_string());
    }
}
