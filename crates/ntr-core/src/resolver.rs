//! Turning command arguments and editor state into run targets.

use serde_json::Value;

use crate::editor::EditorContext;
use crate::scanner::scan_line;
use crate::uri::{FileUri, UriError};

/// Arguments a command was invoked with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommandArgs {
    /// Fall back on the active editor.
    #[default]
    None,
    FileOnly {
        file: FileUri,
    },
    FileAndTest {
        file: FileUri,
        test_name: String,
    },
}

impl CommandArgs {
    /// Read `{ "fileUri": ..., "testName": ... }`.
    ///
    /// A missing or empty `fileUri` falls back to [`CommandArgs::None`]; an
    /// empty or non-string `testName` is ignored. A `fileUri` that cannot be
    /// converted is an error.
    pub fn from_json(value: Option<&Value>) -> Result<Self, UriError> {
        let Some(Value::Object(fields)) = value else {
            return Ok(Self::None);
        };

        let file = match fields.get("fileUri") {
            Some(file) if is_truthy(file) => FileUri::normalize(file)?,
            _ => return Ok(Self::None),
        };

        match fields.get("testName") {
            Some(Value::String(name)) if !name.is_empty() => Ok(Self::FileAndTest {
                file,
                test_name: name.clone(),
            }),
            _ => Ok(Self::FileOnly { file }),
        }
    }

    pub fn file(&self) -> Option<&FileUri> {
        match self {
            Self::None => None,
            Self::FileOnly { file } | Self::FileAndTest { file, .. } => Some(file),
        }
    }

    /// Back to the JSON shape accepted by [`CommandArgs::from_json`].
    pub fn to_json(&self) -> Value {
        match self {
            Self::None => Value::Null,
            Self::FileOnly { file } => serde_json::json!({ "fileUri": file.to_string() }),
            Self::FileAndTest { file, test_name } => {
                serde_json::json!({ "fileUri": file.to_string(), "testName": test_name })
            }
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// What to run: a whole file, or one declaration in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTarget {
    pub file: FileUri,
    pub test_name: Option<String>,
}

/// The file a command applies to.
pub fn resolve_document_uri(args: &CommandArgs, editor: &impl EditorContext) -> Option<FileUri> {
    if let Some(file) = args.file() {
        return Some(file.clone());
    }

    editor.active_editor().map(|e| e.document.uri().clone())
}

/// The declaration a single-test command applies to.
///
/// Without an explicit file and test name, walks up from the cursor to the
/// first line that declares a test.
pub fn resolve_run_target(args: &CommandArgs, editor: &impl EditorContext) -> Option<RunTarget> {
    if let CommandArgs::FileAndTest { file, test_name } = args {
        return Some(RunTarget {
            file: file.clone(),
            test_name: Some(test_name.clone()),
        });
    }

    let active = editor.active_editor()?;
    let document = &active.document;
    let lines: Vec<&str> = document.lines().take(active.cursor_line.saturating_add(1)).collect();

    let name = lines.into_iter().rev().find_map(scan_line)?;
    Some(RunTarget {
        file: document.uri().clone(),
        test_name: Some(name.to_string()),
    })
}
