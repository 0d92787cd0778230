mod support;

use ntr_core::commands::{NOTHING_TO_STOP, NO_FILE_TO_RUN, NO_FILE_TO_STOP, NO_TEST_TO_RUN};
use ntr_core::{
    execute, execute_json, ActiveEditor, CommandArgs, Config, Document, FileUri, RunnerError, TestCommand,
    TestRunner, UriError, WorkspaceFolders,
};
use serde_json::json;
use support::{RecordingHost, RecordingMessages};

const DOCUMENT: &str = "import {describe, it} from 'node:test';\n\
\n\
describe('math', () => {\n\
  it('adds', () => {\n\
    assert.equal(1 + 1, 2);\n\
  });\n\
});\n";

fn setup() -> (TestRunner<RecordingHost, WorkspaceFolders>, RecordingHost, RecordingMessages) {
    let host = RecordingHost::new();
    let runner = TestRunner::new(host.clone(), WorkspaceFolders::from_paths(["/p"]), Config::default());
    (runner, host, RecordingMessages::default())
}

fn editor_at(line: usize) -> ActiveEditor {
    ActiveEditor::new(Document::new(FileUri::file("/p/math.test.js"), DOCUMENT), line)
}

#[tokio::test]
async fn test_run_test_uses_declaration_above_cursor() {
    let (mut runner, host, messages) = setup();

    execute(TestCommand::RunTest, &mut runner, &editor_at(4), &messages, &CommandArgs::None)
        .await
        .unwrap();

    assert_eq!(
        host.sent(),
        vec![r#"node --test --test-name-pattern "^adds$" "/p/math.test.js""#]
    );
    assert!(messages.errors.borrow().is_empty());
}

#[tokio::test]
async fn test_run_test_watch_from_explicit_args() {
    let (mut runner, host, messages) = setup();
    let args = CommandArgs::FileAndTest {
        file: FileUri::file("/p/other.test.js"),
        test_name: "math".to_string(),
    };

    execute(TestCommand::RunTestWatch, &mut runner, &(), &messages, &args)
        .await
        .unwrap();

    assert_eq!(
        host.sent(),
        vec![r#"node --test --watch --test-name-pattern "^math$" "/p/other.test.js""#]
    );
}

#[tokio::test]
async fn test_run_test_without_declaration_reports_error() {
    let (mut runner, host, messages) = setup();

    execute(TestCommand::RunTest, &mut runner, &editor_at(1), &messages, &CommandArgs::None)
        .await
        .unwrap();

    assert_eq!(*messages.errors.borrow(), vec![NO_TEST_TO_RUN]);
    assert!(host.created().is_empty());
    assert!(runner.registry().is_empty());
}

#[tokio::test]
async fn test_run_test_without_editor_reports_error() {
    let (mut runner, _host, messages) = setup();

    execute(TestCommand::RunTest, &mut runner, &(), &messages, &CommandArgs::None)
        .await
        .unwrap();

    assert_eq!(*messages.errors.borrow(), vec![NO_TEST_TO_RUN]);
}

#[tokio::test]
async fn test_run_file_uses_active_document() {
    let (mut runner, host, messages) = setup();

    execute(TestCommand::RunFileWatch, &mut runner, &editor_at(4), &messages, &CommandArgs::None)
        .await
        .unwrap();

    assert_eq!(host.sent(), vec![r#"node --test --watch "/p/math.test.js""#]);
}

#[tokio::test]
async fn test_run_file_ignores_test_name() {
    let (mut runner, host, messages) = setup();
    let args = CommandArgs::FileAndTest {
        file: FileUri::file("/p/a.test.js"),
        test_name: "ignored".to_string(),
    };

    execute(TestCommand::RunFile, &mut runner, &(), &messages, &args).await.unwrap();

    assert_eq!(host.sent(), vec![r#"node --test "/p/a.test.js""#]);
}

#[tokio::test]
async fn test_run_file_without_file_reports_error() {
    let (mut runner, host, messages) = setup();

    execute(TestCommand::RunFile, &mut runner, &(), &messages, &CommandArgs::None)
        .await
        .unwrap();

    assert_eq!(*messages.errors.borrow(), vec![NO_FILE_TO_RUN]);
    assert!(host.created().is_empty());
}

#[tokio::test]
async fn test_stop_reports_nothing_to_stop() {
    let (mut runner, _host, messages) = setup();

    execute(TestCommand::StopWatch, &mut runner, &editor_at(0), &messages, &CommandArgs::None)
        .await
        .unwrap();

    assert_eq!(*messages.infos.borrow(), vec![NOTHING_TO_STOP]);
    assert!(messages.errors.borrow().is_empty());
}

#[tokio::test]
async fn test_stop_without_file_reports_error() {
    let (mut runner, _host, messages) = setup();

    execute(TestCommand::StopWatch, &mut runner, &(), &messages, &CommandArgs::None)
        .await
        .unwrap();

    assert_eq!(*messages.errors.borrow(), vec![NO_FILE_TO_STOP]);
}

#[tokio::test]
async fn test_watch_then_stop() {
    let (mut runner, host, messages) = setup();
    let args = CommandArgs::FileOnly {
        file: FileUri::file("/p/math.test.js"),
    };

    execute(TestCommand::RunFileWatch, &mut runner, &(), &messages, &args).await.unwrap();
    execute(TestCommand::StopWatch, &mut runner, &(), &messages, &args).await.unwrap();

    assert_eq!(host.disposed().len(), 1);
    assert!(messages.infos.borrow().is_empty());
    assert!(runner.registry().is_empty());
}

#[tokio::test]
async fn test_json_arguments() {
    let (mut runner, host, messages) = setup();
    let args = json!({ "fileUri": { "path": "/p/a.test.js" }, "testName": "adds" });

    execute_json(TestCommand::RunTest, &mut runner, &(), &messages, Some(&args))
        .await
        .unwrap();

    assert_eq!(
        host.sent(),
        vec![r#"node --test --test-name-pattern "^adds$" "/p/a.test.js""#]
    );
}

#[tokio::test]
async fn test_unconvertible_argument_fails_the_invocation() {
    let (mut runner, host, messages) = setup();
    let args = json!({ "fileUri": 7 });

    let result = execute_json(TestCommand::RunFile, &mut runner, &editor_at(0), &messages, Some(&args)).await;

    assert!(matches!(result, Err(RunnerError::Uri(UriError::Unconvertible))));
    assert!(host.created().is_empty());
    assert!(messages.errors.borrow().is_empty());
}
