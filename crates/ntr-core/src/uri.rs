//! File identifiers and normalization of loosely-typed command arguments.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const FILE_SCHEME_PREFIX: &str = "file://";

/// Raised when a command argument cannot identify a file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    #[error("Cannot convert value to Uri")]
    Unconvertible,
}

/// A `file` scheme identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct FileUri {
    path: PathBuf,
}

impl FileUri {
    /// Identifier for a filesystem path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse either a `file://` URI string or a bare path.
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix(FILE_SCHEME_PREFIX) {
            Some(path) => Self::file(path),
            None => Self::file(text),
        }
    }

    /// Convert a command argument into a file identifier.
    ///
    /// Accepts a string (path or `file://` URI) or an object carrying a
    /// string `path` field, the shape editors use when serializing URIs.
    pub fn normalize(value: &Value) -> Result<Self, UriError> {
        match value {
            Value::String(text) => Ok(Self::parse(text)),
            Value::Object(fields) => match fields.get("path") {
                Some(Value::String(path)) if !path.is_empty() => Ok(Self::file(path)),
                _ => Err(UriError::Unconvertible),
            },
            _ => Err(UriError::Unconvertible),
        }
    }

    pub fn scheme(&self) -> &'static str {
        "file"
    }

    /// Filesystem path of the file.
    pub fn fs_path(&self) -> &Path {
        &self.path
    }

    /// Path component of the URI, always with forward slashes.
    pub fn path(&self) -> String {
        let path = self.path.to_string_lossy().replace('\\', "/");
        if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        }
    }
}

impl fmt::Display for FileUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme(), self.path())
    }
}

impl From<FileUri> for String {
    fn from(uri: FileUri) -> Self {
        uri.to_string()
    }
}

impl From<String> for FileUri {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}
