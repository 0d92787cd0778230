//! Finding test files under a directory.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::DocumentsConfig;
use crate::scanner::{scan_document, TestDeclaration};

/// Errors during discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

impl DiscoveryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DiscoveryError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Declarations found in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDeclarations {
    pub path: PathBuf,
    pub declarations: Vec<TestDeclaration>,
}

/// Scan a single file.
pub fn scan_file(path: impl AsRef<Path>) -> Result<FileDeclarations, DiscoveryError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| DiscoveryError::io(path, e))?;
    Ok(FileDeclarations {
        path: path.to_path_buf(),
        declarations: scan_document(&text),
    })
}

/// Every supported file under `root` that declares at least one test,
/// sorted by path. `root` may also be a single file, which is scanned
/// regardless of its extension.
pub fn discover(root: impl AsRef<Path>, documents: &DocumentsConfig) -> Result<Vec<FileDeclarations>, DiscoveryError> {
    let root = root.as_ref();
    if root.is_file() {
        return Ok(vec![scan_file(root)?]);
    }

    let exclude = documents.clone();
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && entry.depth() > 0 && exclude.is_excluded_dir(&entry.file_name().to_string_lossy()))
        })
        .build();

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type().is_some_and(|t| t.is_file()) || !documents.is_supported(path) {
            continue;
        }

        let file = scan_file(path)?;
        if file.declarations.is_empty() {
            continue;
        }

        debug!(path = %path.display(), count = file.declarations.len(), "found declarations");
        found.push(file);
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(found)
}
