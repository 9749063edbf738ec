use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Result, SweeperError};

use super::entry::FileRecord;
use super::options::ScanOptions;

type EntryFilter = Box<dyn FnMut(&walkdir::DirEntry) -> bool + Send>;

/// Everything one walk produced: the files it found and the paths it could not read.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkOutcome {
    pub records: Vec<FileRecord>,
    pub inaccessible: Vec<PathBuf>,
}

impl WalkOutcome {
    /// Append another outcome, keeping each inaccessible path once.
    pub fn merge(&mut self, other: WalkOutcome) {
        self.records.extend(other.records);
        for path in other.inaccessible {
            push_unique(&mut self.inaccessible, path);
        }
    }
}

/// Lazy iterator over the regular files below a root.
///
/// Entries or whole subtrees that cannot be read are skipped and remembered
/// in [`Walker::inaccessible`]; the walk itself never fails once started.
/// Every call to [`Walker::new`] walks the tree from scratch.
pub struct Walker {
    inner: walkdir::FilterEntry<walkdir::IntoIter, EntryFilter>,
    inaccessible: Vec<PathBuf>,
}

impl Walker {
    /// Start a walk at `root`. Fails only when the root itself cannot be resolved.
    pub fn new(root: &Path, options: &ScanOptions) -> Result<Self> {
        let root = canonical_root(root)?;
        Ok(Self::from_canonical(root, options))
    }

    fn from_canonical(root: PathBuf, options: &ScanOptions) -> Self {
        let mut walker = WalkDir::new(&root)
            .follow_links(options.follow_symlinks)
            .same_file_system(options.one_file_system);

        if let Some(depth) = options.max_depth {
            // walkdir max_depth: 0 = only root, 1 = root + children, same as ours
            walker = walker.max_depth(depth);
        }

        let filter_options = options.clone();
        let filter_root = root.clone();
        let filter: EntryFilter = Box::new(move |entry: &walkdir::DirEntry| {
            filter_options.admits(entry.path(), &filter_root)
        });

        Self {
            inner: walker.into_iter().filter_entry(filter),
            inaccessible: Vec::new(),
        }
    }

    /// Paths recorded as unreadable so far, each listed once
    pub fn inaccessible(&self) -> &[PathBuf] {
        &self.inaccessible
    }

    /// Drain the walk into a [`WalkOutcome`].
    pub fn into_outcome(mut self) -> WalkOutcome {
        let records: Vec<FileRecord> = self.by_ref().collect();
        WalkOutcome {
            records,
            inaccessible: self.inaccessible,
        }
    }

    fn record_error(&mut self, err: walkdir::Error) {
        match err.path() {
            Some(path) => {
                tracing::warn!(path = %path.display(), error = %err, "Skipping inaccessible path");
                push_unique(&mut self.inaccessible, path.to_path_buf());
            }
            None => tracing::warn!(error = %err, "Walk error without a path"),
        }
    }
}

impl Iterator for Walker {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.record_error(err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    let modified = metadata.modified().ok();
                    return Some(FileRecord::new(entry.into_path(), metadata.len(), modified));
                }
                Err(err) => self.record_error(err),
            }
        }
    }
}

/// Walk `root` with one worker per top-level subdirectory.
///
/// Each worker runs its own [`Walker`] and returns a local outcome; the
/// outcomes are merged once all workers are done, in directory order.
pub fn walk_parallel(root: &Path, options: &ScanOptions) -> Result<WalkOutcome> {
    let root = canonical_root(root)?;

    if options.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()
            .map_err(|e| SweeperError::Io {
                path: root.clone(),
                source: io::Error::new(io::ErrorKind::Other, e),
            })?;
        Ok(pool.install(|| fan_out(&root, options)))
    } else {
        Ok(fan_out(&root, options))
    }
}

fn fan_out(root: &Path, options: &ScanOptions) -> WalkOutcome {
    use rayon::prelude::*;

    let metadata = match fs::metadata(root) {
        Ok(m) => m,
        Err(e) => return unreadable(root, &e),
    };

    if !metadata.is_dir() {
        return Walker::from_canonical(root.to_path_buf(), options).into_outcome();
    }

    let child_depth = match options.max_depth {
        Some(0) => return WalkOutcome::default(),
        Some(depth) => Some(depth - 1),
        None => None,
    };

    let read_dir = match fs::read_dir(root) {
        Ok(rd) => rd,
        Err(e) => return unreadable(root, &e),
    };

    let root_dev = metadata.dev();
    let mut top = WalkOutcome::default();
    let mut subtrees = Vec::new();

    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %root.display(), error = %e, "Failed to read directory entry");
                push_unique(&mut top.inaccessible, root.to_path_buf());
                continue;
            }
        };

        let path = entry.path();
        if !options.admits(&path, root) {
            continue;
        }

        let metadata = match top_level_metadata(&entry, options.follow_symlinks) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping inaccessible path");
                push_unique(&mut top.inaccessible, path);
                continue;
            }
        };

        if metadata.is_dir() {
            if options.one_file_system && metadata.dev() != root_dev {
                continue;
            }
            subtrees.push(path);
        } else if metadata.is_file() {
            let modified = metadata.modified().ok();
            top.records.push(FileRecord::new(path, metadata.len(), modified));
        }
    }

    let mut subtree_options = options.clone();
    subtree_options.max_depth = child_depth;

    let partials: Vec<WalkOutcome> = subtrees
        .into_par_iter()
        .map(|dir| Walker::from_canonical(dir, &subtree_options).into_outcome())
        .collect();

    partials.into_iter().fold(top, |mut acc, part| {
        acc.merge(part);
        acc
    })
}

fn top_level_metadata(entry: &fs::DirEntry, follow_symlinks: bool) -> io::Result<fs::Metadata> {
    let metadata = entry.metadata()?;
    if metadata.file_type().is_symlink() && follow_symlinks {
        fs::metadata(entry.path())
    } else {
        Ok(metadata)
    }
}

fn unreadable(path: &Path, err: &io::Error) -> WalkOutcome {
    tracing::warn!(path = %path.display(), error = %err, "Skipping inaccessible path");
    WalkOutcome {
        records: Vec::new(),
        inaccessible: vec![path.to_path_buf()],
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf> {
    root.canonicalize()
        .map_err(|e| SweeperError::from_io(root, e))
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}
