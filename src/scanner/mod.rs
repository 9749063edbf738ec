//! Directory traversal that tolerates unreadable entries and subtrees.

mod entry;
mod options;
mod walker;

pub use entry::{extension_of, FileRecord};
pub use options::{ScanOptions, LINUX_VIRTUAL_FS_PATHS};
pub use walker::{walk_parallel, WalkOutcome, Walker};

use std::path::Path;

use crate::error::Result;

/// Walk `root` sequentially or with the parallel fan-out, collecting the outcome.
pub fn walk(root: &Path, options: &ScanOptions, parallel: bool) -> Result<WalkOutcome> {
    if parallel {
        walk_parallel(root, options)
    } else {
        Ok(Walker::new(root, options)?.into_outcome())
    }
}
