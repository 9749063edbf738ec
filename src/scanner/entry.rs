use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A regular file discovered by the walker.
///
/// This is a snapshot taken at scan time; the file may change or vanish
/// afterwards and nothing here is refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,

    /// Apparent size in bytes
    pub size: u64,

    /// Last modification time, when the platform reports one
    pub modified: Option<SystemTime>,
}

impl FileRecord {
    pub fn new(path: PathBuf, size: u64, modified: Option<SystemTime>) -> Self {
        Self {
            path,
            size,
            modified,
        }
    }

    /// Lowercased extension including the leading dot, e.g. `".txt"`.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.path)
    }
}

/// Lowercased extension of `path` including the leading dot.
///
/// Dot-files such as `.bashrc` have no extension.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}
