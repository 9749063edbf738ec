//! Selection-by-index operations that front ends drive.
//!
//! Indices are zero-based positions in the slices the caller was shown.
//! Every selection is validated before anything moves, and batch operations
//! keep going past per-file failures so the caller can report all of them.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::{DuplicateSet, LargeFile};
use crate::error::{Result, SweeperError};
use crate::scanner::FileRecord;

use super::store::{TrashEntry, TrashFailure, TrashStore};

/// Result of moving several files to the trash.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrashBatch {
    pub moved: Vec<TrashEntry>,
    pub failed: Vec<TrashFailure>,
}

impl TrashBatch {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn push(&mut self, store: &mut TrashStore, path: &Path) {
        match store.move_to_trash(path) {
            Ok(entry) => self.moved.push(entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to move to trash");
                self.failed.push(TrashFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Result of recovering several trash entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecoveryBatch {
    pub recovered: Vec<PathBuf>,
    pub failed: Vec<TrashFailure>,
}

impl RecoveryBatch {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Move a single file to the trash.
pub fn trash_file(store: &mut TrashStore, path: &Path) -> Result<TrashEntry> {
    store.move_to_trash(path)
}

/// Trash every member of `sets[group]` except those at `keep`.
///
/// An empty `keep` trashes the whole group.
pub fn trash_group(
    store: &mut TrashStore,
    sets: &[DuplicateSet],
    group: usize,
    keep: &[usize],
) -> Result<TrashBatch> {
    let set = sets.get(group).ok_or_else(|| {
        SweeperError::InvalidSelection(format!(
            "group {} does not exist ({} groups)",
            group + 1,
            sets.len()
        ))
    })?;
    check_indices(keep, set.len(), "member")?;

    let mut batch = TrashBatch::default();
    for (i, path) in set.paths.iter().enumerate() {
        if !keep.contains(&i) {
            batch.push(store, path);
        }
    }
    Ok(batch)
}

/// Trash the large files at `indices`.
pub fn trash_large(
    store: &mut TrashStore,
    files: &[LargeFile],
    indices: &[usize],
) -> Result<TrashBatch> {
    check_indices(indices, files.len(), "large file")?;

    let mut batch = TrashBatch::default();
    for &i in dedup(indices).iter() {
        batch.push(store, &files[i].path);
    }
    Ok(batch)
}

/// Trash every record whose extension matches `extension` (case-insensitive,
/// leading dot optional).
pub fn trash_by_extension(
    store: &mut TrashStore,
    records: &[FileRecord],
    extension: &str,
) -> Result<TrashBatch> {
    let wanted = normalize_extension(extension)?;

    let mut batch = TrashBatch::default();
    for record in records {
        if record.extension().as_deref() == Some(wanted.as_str()) {
            batch.push(store, &record.path);
        }
    }
    Ok(batch)
}

/// Recover the listed entries at `indices`, optionally into `destination`.
pub fn recover_selected(
    store: &mut TrashStore,
    entries: &[TrashEntry],
    indices: &[usize],
    destination: Option<&Path>,
) -> Result<RecoveryBatch> {
    check_indices(indices, entries.len(), "trash entry")?;

    let mut batch = RecoveryBatch::default();
    for &i in dedup(indices).iter() {
        let entry = &entries[i];
        match store.recover(&entry.trash_path, destination) {
            Ok(path) => batch.recovered.push(path),
            Err(e) => {
                tracing::warn!(path = %entry.trash_path.display(), error = %e, "Failed to recover");
                batch.failed.push(TrashFailure {
                    path: entry.trash_path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    Ok(batch)
}

fn normalize_extension(extension: &str) -> Result<String> {
    let bare = extension.trim().trim_start_matches('.');
    if bare.is_empty() || bare.contains('/') {
        return Err(SweeperError::InvalidSelection(format!(
            "'{}' is not a file extension",
            extension
        )));
    }
    Ok(format!(".{}", bare.to_lowercase()))
}

fn check_indices(indices: &[usize], len: usize, what: &str) -> Result<()> {
    match indices.iter().find(|&&i| i >= len) {
        Some(i) => Err(SweeperError::InvalidSelection(format!(
            "{} {} does not exist ({} available)",
            what,
            i + 1,
            len
        ))),
        None => Ok(()),
    }
}

fn dedup(indices: &[usize]) -> Vec<usize> {
    let mut unique = Vec::with_capacity(indices.len());
    for &i in indices {
        if !unique.contains(&i) {
            unique.push(i);
        }
    }
    unique
}
