//! What the host editor exposes: the active document, the cursor and a
//! place to show messages.

use std::path::Path;

use crate::uri::FileUri;

/// A document's text split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    uri: FileUri,
    text: String,
}

impl Document {
    pub fn new(uri: FileUri, text: impl Into<String>) -> Self {
        Self {
            uri,
            text: text.into(),
        }
    }

    /// Read a document from disk.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(FileUri::file(path), text))
    }

    pub fn uri(&self) -> &FileUri {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text of a 0-indexed line without its terminator.
    pub fn line_at(&self, line: usize) -> Option<&str> {
        self.lines().nth(line)
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Lines without their terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }
}

/// The focused editor: a document and the cursor's line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEditor {
    pub document: Document,
    pub cursor_line: usize,
}

impl ActiveEditor {
    pub fn new(document: Document, cursor_line: usize) -> Self {
        Self {
            document,
            cursor_line,
        }
    }
}

/// Source of the editor state commands fall back on.
pub trait EditorContext {
    fn active_editor(&self) -> Option<&ActiveEditor>;
}

/// No editor open.
impl EditorContext for () {
    fn active_editor(&self) -> Option<&ActiveEditor> {
        None
    }
}

impl EditorContext for Option<ActiveEditor> {
    fn active_editor(&self) -> Option<&ActiveEditor> {
        self.as_ref()
    }
}

impl EditorContext for ActiveEditor {
    fn active_editor(&self) -> Option<&ActiveEditor> {
        Some(self)
    }
}

/// Short messages for the user.
pub trait MessageSink {
    fn show_error(&self, message: &str);

    fn show_info(&self, message: &str);
}
