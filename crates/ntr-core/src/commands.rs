//! The commands exposed to the editor and their handlers.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::editor::{EditorContext, MessageSink};
use crate::resolver::{resolve_document_uri, resolve_run_target, CommandArgs};
use crate::runner::{RunOptions, RunnerError, TestRunner};
use crate::terminal::TerminalHost;
use crate::workspace::WorkspaceResolver;

pub const RUN_COMMAND: &str = "node-test-runner.runTest";
pub const RUN_WATCH_COMMAND: &str = "node-test-runner.runTestWatch";
pub const RUN_ALL_COMMAND: &str = "node-test-runner.runFile";
pub const RUN_ALL_WATCH_COMMAND: &str = "node-test-runner.runFileWatch";
pub const STOP_COMMAND: &str = "node-test-runner.stopWatch";

pub const NO_FILE_TO_RUN: &str = "Open a test file to run.";
pub const NO_TEST_TO_RUN: &str = "Select a Node.js test definition to run.";
pub const NO_FILE_TO_STOP: &str = "Open a test file to stop the watch process.";
pub const NOTHING_TO_STOP: &str = "No active Node Test Runner watch process found.";

/// What a run command covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunScope {
    /// The declaration at or above the cursor.
    Single,
    /// Every declaration in the file.
    File,
}

/// A command the editor can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestCommand {
    RunTest,
    RunTestWatch,
    RunFile,
    RunFileWatch,
    StopWatch,
}

impl TestCommand {
    pub const ALL: [TestCommand; 5] = [
        Self::RunTest,
        Self::RunTestWatch,
        Self::RunFile,
        Self::RunFileWatch,
        Self::StopWatch,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::RunTest => RUN_COMMAND,
            Self::RunTestWatch => RUN_WATCH_COMMAND,
            Self::RunFile => RUN_ALL_COMMAND,
            Self::RunFileWatch => RUN_ALL_WATCH_COMMAND,
            Self::StopWatch => STOP_COMMAND,
        }
    }

    /// Scope and options of a run command; `None` for stop.
    pub fn run_mode(self) -> Option<(RunScope, RunOptions)> {
        match self {
            Self::RunTest => Some((RunScope::Single, RunOptions::default())),
            Self::RunTestWatch => Some((RunScope::Single, RunOptions::watch())),
            Self::RunFile => Some((RunScope::File, RunOptions::default())),
            Self::RunFileWatch => Some((RunScope::File, RunOptions::watch())),
            Self::StopWatch => None,
        }
    }
}

impl fmt::Display for TestCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Unknown command identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for TestCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.id() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// Handle a run command.
///
/// A missing target is reported through `messages` and is not an error.
pub async fn run_command_handler<H, W>(
    runner: &mut TestRunner<H, W>,
    editor: &impl EditorContext,
    messages: &impl MessageSink,
    args: &CommandArgs,
    scope: RunScope,
    options: RunOptions,
) -> Result<(), RunnerError>
where
    H: TerminalHost,
    W: WorkspaceResolver,
{
    match scope {
        RunScope::File => {
            let Some(file) = resolve_document_uri(args, editor) else {
                messages.show_error(NO_FILE_TO_RUN);
                return Ok(());
            };
            runner.run_test(&file, None, options).await
        }
        RunScope::Single => {
            let Some(target) = resolve_run_target(args, editor) else {
                messages.show_error(NO_TEST_TO_RUN);
                return Ok(());
            };
            runner
                .run_test(&target.file, target.test_name.as_deref(), options)
                .await
        }
    }
}

/// Handle the stop command.
pub async fn stop_command_handler<H, W>(
    runner: &mut TestRunner<H, W>,
    editor: &impl EditorContext,
    messages: &impl MessageSink,
    args: &CommandArgs,
) -> Result<(), RunnerError>
where
    H: TerminalHost,
    W: WorkspaceResolver,
{
    let Some(file) = resolve_document_uri(args, editor) else {
        messages.show_error(NO_FILE_TO_STOP);
        return Ok(());
    };

    if !runner.stop_watch(&file).await? {
        messages.show_info(NOTHING_TO_STOP);
    }
    Ok(())
}

/// Dispatch `command` with already-typed arguments.
pub async fn execute<H, W>(
    command: TestCommand,
    runner: &mut TestRunner<H, W>,
    editor: &impl EditorContext,
    messages: &impl MessageSink,
    args: &CommandArgs,
) -> Result<(), RunnerError>
where
    H: TerminalHost,
    W: WorkspaceResolver,
{
    match command.run_mode() {
        Some((scope, options)) => run_command_handler(runner, editor, messages, args, scope, options).await,
        None => stop_command_handler(runner, editor, messages, args).await,
    }
}

/// Dispatch `command` with raw JSON arguments.
///
/// An argument whose `fileUri` cannot be converted fails the invocation.
pub async fn execute_json<H, W>(
    command: TestCommand,
    runner: &mut TestRunner<H, W>,
    editor: &impl EditorContext,
    messages: &impl MessageSink,
    args: Option<&Value>,
) -> Result<(), RunnerError>
where
    H: TerminalHost,
    W: WorkspaceResolver,
{
    let args = CommandArgs::from_json(args)?;
    execute(command, runner, editor, messages, &args).await
}
