//! Workspace roots and the keys that route files to sessions.

use std::fmt;
use std::path::PathBuf;

use crate::uri::FileUri;

/// A known workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub name: String,
    pub uri: FileUri,
}

impl WorkspaceFolder {
    pub fn new(name: impl Into<String>, uri: FileUri) -> Self {
        Self {
            name: name.into(),
            uri,
        }
    }

    /// Folder named after the last component of `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self::new(name, FileUri::file(path))
    }

    /// Whether `file` lives under this root.
    pub fn contains(&self, file: &FileUri) -> bool {
        file.fs_path().starts_with(self.uri.fs_path())
    }
}

/// Identity of the workspace owning a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceKey(String);

impl WorkspaceKey {
    /// Key shared by every file outside a known root.
    pub const ROOTLESS: &'static str = "root";

    pub fn for_folder(folder: Option<&WorkspaceFolder>) -> Self {
        match folder {
            Some(folder) => Self(folder.uri.to_string()),
            None => Self(Self::ROOTLESS.to_string()),
        }
    }

    pub fn rootless() -> Self {
        Self::for_folder(None)
    }

    pub fn is_rootless(&self) -> bool {
        self.0 == Self::ROOTLESS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Looks up the workspace root owning a file.
pub trait WorkspaceResolver {
    fn workspace_folder(&self, file: &FileUri) -> Option<&WorkspaceFolder>;

    fn workspace_key(&self, file: &FileUri) -> WorkspaceKey {
        WorkspaceKey::for_folder(self.workspace_folder(file))
    }
}

/// A fixed set of workspace roots.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceFolders {
    folders: Vec<WorkspaceFolder>,
}

impl WorkspaceFolders {
    pub fn new(folders: Vec<WorkspaceFolder>) -> Self {
        Self { folders }
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::new(paths.into_iter().map(WorkspaceFolder::from_path).collect())
    }

    pub fn folders(&self) -> &[WorkspaceFolder] {
        &self.folders
    }
}

impl WorkspaceResolver for WorkspaceFolders {
    /// The innermost root containing `file`.
    fn workspace_folder(&self, file: &FileUri) -> Option<&WorkspaceFolder> {
        self.folders
            .iter()
            .filter(|folder| folder.contains(file))
            .max_by_key(|folder| folder.uri.fs_path().components().count())
    }
}
