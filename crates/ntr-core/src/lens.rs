//! Code lenses offered above test declarations.

use serde::Serialize;
use serde_json::Value;

use crate::commands::TestCommand;
use crate::config::DocumentsConfig;
use crate::editor::Document;
use crate::resolver::CommandArgs;
use crate::scanner::scan_document;

/// An actionable annotation shown above a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeLens {
    pub line: usize,
    pub title: &'static str,
    pub tooltip: &'static str,
    pub command: &'static str,
    pub arguments: Vec<Value>,
}

impl CodeLens {
    fn new(line: usize, title: &'static str, tooltip: &'static str, command: TestCommand, args: &CommandArgs) -> Self {
        Self {
            line,
            title,
            tooltip,
            command: command.id(),
            arguments: vec![args.to_json()],
        }
    }
}

/// Lenses for a document: file-wide actions on the first line, then one
/// set per declaration. Unsupported documents and documents without
/// declarations get none.
pub fn provide_code_lenses(document: &Document, documents: &DocumentsConfig) -> Vec<CodeLens> {
    if !documents.is_supported(document.uri().fs_path()) {
        return Vec::new();
    }

    let tests = scan_document(document.text());
    if tests.is_empty() {
        return Vec::new();
    }

    let file = document.uri().clone();
    let whole_file = CommandArgs::FileOnly { file: file.clone() };

    let mut lenses = vec![
        CodeLens::new(0, "Run All", "Run every test in this file", TestCommand::RunFile, &whole_file),
        CodeLens::new(
            0,
            "--watch",
            "Run every test in this file (watch mode)",
            TestCommand::RunFileWatch,
            &whole_file,
        ),
        CodeLens::new(0, "Stop", "Stop the watch process", TestCommand::StopWatch, &whole_file),
    ];

    for test in tests {
        let target = CommandArgs::FileAndTest {
            file: file.clone(),
            test_name: test.name,
        };
        lenses.extend([
            CodeLens::new(test.line, "Run", "Run this test with node --test", TestCommand::RunTest, &target),
            CodeLens::new(test.line, "--watch", "Run this test in watch mode", TestCommand::RunTestWatch, &target),
            CodeLens::new(test.line, "Stop", "Stop the watch process", TestCommand::StopWatch, &whole_file),
        ]);
    }

    lenses
}
