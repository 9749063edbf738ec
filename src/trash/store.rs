//! Reversible deletion through a flat trash directory.
//!
//! The directory itself is the only durable state: entry metadata is always
//! re-read from the filesystem. A moved file's mtime is stamped at move time,
//! so the mtime of anything in the trash is the moment it was trashed.
//!
//! Every rename into or out of the trash refuses to replace an existing
//! name (`renameat2` with `RENAME_NOREPLACE`), so concurrent movers can
//! never overwrite each other's entries.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use nix::errno::Errno;
use nix::fcntl::{renameat2, RenameFlags};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SweeperError};

/// Directory name used when none is configured.
pub const DEFAULT_TRASH_DIR_NAME: &str = "Trash";

/// Days a file stays in the trash before a sweep may remove it.
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

const SECS_PER_DAY: u64 = 24 * 60 * 60;
const MAX_SUFFIX: u32 = 10_000;

/// What to do when the trash already holds a file with the incoming name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Store as `name (1).ext`, `name (2).ext`, ...
    #[default]
    Suffix,
    /// Fail with [`SweeperError::Collision`]
    Reject,
}

/// A file sitting in the trash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrashEntry {
    /// Where the file will be recovered to by default
    pub original_path: PathBuf,
    /// Where the file lives now
    pub trash_path: PathBuf,
    /// When it was trashed (its mtime)
    pub moved_at: Option<SystemTime>,
}

impl TrashEntry {
    pub fn name(&self) -> String {
        self.trash_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Time spent in the trash as of `now`; `None` if unknown or in the future
    pub fn age(&self, now: SystemTime) -> Option<Duration> {
        self.moved_at.and_then(|t| now.duration_since(t).ok())
    }
}

/// A path an operation could not handle, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrashFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of one expiry sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<TrashFailure>,
}

impl SweepReport {
    /// Number of entries permanently deleted
    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// Trash directory with move / list / recover / expire operations.
#[derive(Debug, Clone)]
pub struct TrashStore {
    dir: PathBuf,
    restore_root: PathBuf,
    collision: CollisionPolicy,
    /// Origins of entries trashed through this store, keyed by trash path
    origins: HashMap<PathBuf, Origin>,
}

/// Where an entry came from and its mtime before the trash stamped it
#[derive(Debug, Clone)]
struct Origin {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl TrashStore {
    /// Use `dir` as the trash. Entries of unknown origin recover into its parent.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let restore_root = dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            dir,
            restore_root,
            collision: CollisionPolicy::default(),
            origins: HashMap::new(),
        }
    }

    /// Trash directory named `dir_name` directly under `root`.
    pub fn under(root: &Path, dir_name: &str) -> Self {
        Self::new(root.join(dir_name))
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn restore_root(&self) -> &Path {
        &self.restore_root
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision
    }

    /// Move a regular file into the trash under its basename.
    ///
    /// The move is a single rename; on any failure the file stays where it was.
    pub fn move_to_trash(&mut self, path: &Path) -> Result<TrashEntry> {
        let metadata = fs::symlink_metadata(path).map_err(|e| SweeperError::from_io(path, e))?;
        if !metadata.is_file() {
            return Err(SweeperError::InvalidPath(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let source = path.canonicalize().map_err(|e| SweeperError::from_io(path, e))?;
        let file_name = source
            .file_name()
            .ok_or_else(|| SweeperError::InvalidPath(source.display().to_string()))?
            .to_os_string();

        fs::create_dir_all(&self.dir).map_err(|e| SweeperError::from_io(&self.dir, e))?;
        let trash_dir = self
            .dir
            .canonicalize()
            .map_err(|e| SweeperError::from_io(&self.dir, e))?;
        if source.parent() == Some(trash_dir.as_path()) {
            return Err(SweeperError::InvalidPath(format!(
                "{} is already in the trash",
                source.display()
            )));
        }

        let target = self.claim_target(&source, &file_name)?;
        stamp_now(&target);

        tracing::info!(from = %source.display(), to = %target.display(), "Moved to trash");

        self.origins.insert(
            target.clone(),
            Origin {
                path: source.clone(),
                modified: metadata.modified().ok(),
            },
        );
        Ok(TrashEntry {
            original_path: source,
            trash_path: target,
            moved_at: Some(SystemTime::now()),
        })
    }

    /// Regular files directly inside the trash, sorted by name.
    ///
    /// The numbering of this list is only stable for a single call.
    pub fn list(&self) -> Result<Vec<TrashEntry>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SweeperError::from_io(&self.dir, e)),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| SweeperError::from_io(&self.dir, e))?;
            let trash_path = self.dir.join(entry.file_name());

            let metadata = match fs::symlink_metadata(&trash_path) {
                Ok(m) => m,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(SweeperError::from_io(&trash_path, e)),
            };
            if !metadata.is_file() {
                continue;
            }

            entries.push(TrashEntry {
                original_path: self.original_of(&trash_path),
                moved_at: metadata.modified().ok(),
                trash_path,
            });
        }

        entries.sort_by(|a, b| a.trash_path.cmp(&b.trash_path));
        Ok(entries)
    }

    /// Move a trash entry back out.
    ///
    /// `trashed` may be the entry's path or just its file name. Without a
    /// destination the file returns to its original path, or to the restore
    /// root when the original directory is gone. A destination that is an
    /// existing directory receives the file under its trash name.
    ///
    /// Entries trashed through this store get their pre-trash mtime back.
    /// Entries of unknown origin keep the mtime stamped when they were trashed.
    /// An occupied target is never replaced.
    pub fn recover(&mut self, trashed: &Path, destination: Option<&Path>) -> Result<PathBuf> {
        let name = trashed
            .file_name()
            .ok_or_else(|| SweeperError::InvalidPath(trashed.display().to_string()))?;
        let trash_path = self.dir.join(name);

        let metadata =
            fs::symlink_metadata(&trash_path).map_err(|e| SweeperError::from_io(&trash_path, e))?;
        if !metadata.is_file() {
            return Err(SweeperError::InvalidPath(format!(
                "{} is not a trash entry",
                trash_path.display()
            )));
        }

        let target = match destination {
            Some(dest) if dest.is_dir() => dest.join(name),
            Some(dest) => dest.to_path_buf(),
            None => {
                let original = self.original_of(&trash_path);
                match original.parent() {
                    Some(parent) if parent.is_dir() => original,
                    _ => {
                        tracing::warn!(
                            original = %original.display(),
                            "Original directory is gone, recovering into restore root"
                        );
                        self.restore_root.join(name)
                    }
                }
            }
        };

        match rename_noreplace(&trash_path, &target) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(SweeperError::DestinationConflict(target));
            }
            Err(e) => return Err(SweeperError::from_io(&trash_path, e)),
        }

        if let Some(Origin {
            modified: Some(modified),
            ..
        }) = self.origins.remove(&trash_path)
        {
            restore_mtime(&target, modified);
        }

        tracing::info!(from = %trash_path.display(), to = %target.display(), "Recovered from trash");
        Ok(target)
    }

    /// Permanently delete entries trashed at least `retention_days` ago.
    pub fn sweep_expired(&self, retention_days: u64) -> Result<SweepReport> {
        self.sweep_expired_at(SystemTime::now(), retention_days)
    }

    /// [`TrashStore::sweep_expired`] with an explicit clock.
    pub fn sweep_expired_at(&self, now: SystemTime, retention_days: u64) -> Result<SweepReport> {
        let retention = Duration::from_secs(retention_days.saturating_mul(SECS_PER_DAY));
        let mut report = SweepReport::default();

        for entry in self.list()? {
            let path = entry.trash_path;

            // Re-check right before deleting; another process may have recovered it.
            let metadata = match fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Entry vanished before sweep");
                    continue;
                }
                Err(e) => {
                    report.failed.push(TrashFailure {
                        path,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let Ok(modified) = metadata.modified() else {
                continue;
            };
            let Ok(age) = now.duration_since(modified) else {
                continue;
            };
            if age < retention {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), days = age.as_secs() / SECS_PER_DAY, "Expired from trash");
                    report.removed.push(path);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Entry vanished during sweep");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to expire entry");
                    report.failed.push(TrashFailure {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    fn original_of(&self, trash_path: &Path) -> PathBuf {
        self.origins.get(trash_path).map(|o| o.path.clone()).unwrap_or_else(|| {
            let name = trash_path.file_name().unwrap_or_default();
            self.restore_root.join(name)
        })
    }

    /// Rename `source` into the trash under the first free name the policy allows.
    fn claim_target(&self, source: &Path, file_name: &OsStr) -> Result<PathBuf> {
        let first = self.dir.join(file_name);

        for n in 0..=MAX_SUFFIX {
            let target = if n == 0 {
                first.clone()
            } else {
                self.dir.join(suffixed_name(file_name, n))
            };

            match rename_noreplace(source, &target) {
                Ok(()) => {
                    if n > 0 {
                        tracing::debug!(target = %target.display(), "Trash name taken, used suffix");
                    }
                    return Ok(target);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if self.collision == CollisionPolicy::Reject {
                        return Err(SweeperError::Collision(first));
                    }
                }
                Err(e) => return Err(SweeperError::from_io(source, e)),
            }
        }

        Err(SweeperError::Collision(first))
    }
}

/// `stem (n).ext`, or `stem (n)` without an extension
fn suffixed_name(file_name: &OsStr, n: u32) -> OsString {
    let name = Path::new(file_name);
    let mut suffixed = OsString::from(name.file_stem().unwrap_or(file_name));
    suffixed.push(format!(" ({})", n));
    if let Some(ext) = name.extension() {
        suffixed.push(".");
        suffixed.push(ext);
    }
    suffixed
}

/// Rename that fails with `AlreadyExists` instead of replacing `to`.
///
/// Filesystems without `RENAME_NOREPLACE` support fall back to
/// hard link + unlink, which is equally exclusive.
fn rename_noreplace(from: &Path, to: &Path) -> io::Result<()> {
    match renameat2(None, from, None, to, RenameFlags::RENAME_NOREPLACE) {
        Ok(()) => Ok(()),
        Err(Errno::EINVAL) | Err(Errno::ENOSYS) => {
            fs::hard_link(from, to)?;
            if let Err(e) = fs::remove_file(from) {
                // Leave exactly one copy behind
                let _ = fs::remove_file(to);
                return Err(e);
            }
            Ok(())
        }
        Err(errno) => Err(io::Error::from(errno)),
    }
}

fn restore_mtime(path: &Path, modified: SystemTime) {
    let result = File::open(path).and_then(|file| file.set_modified(modified));
    if let Err(e) = result {
        tracing::warn!(path = %path.display(), error = %e, "Could not restore modification time");
    }
}

fn stamp_now(path: &Path) {
    let result = File::open(path).and_then(|file| file.set_modified(SystemTime::now()));
    if let Err(e) = result {
        tracing::warn!(path = %path.display(), error = %e, "Could not stamp trash time; expiry will use the old mtime");
    }
}
