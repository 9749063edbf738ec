use std::path::{Path, PathBuf};

/// Configuration options for directory walks.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Maximum depth to recurse (None = unlimited)
    pub max_depth: Option<usize>,

    /// Include hidden files/directories (starting with .)
    pub include_hidden: bool,

    /// Stay on the same filesystem (don't cross mount points)
    pub one_file_system: bool,

    /// Number of parallel threads (0 = auto)
    pub threads: usize,

    /// Directories pruned from the walk, compared against absolute paths
    pub skip_dirs: Vec<PathBuf>,

    /// Follow symbolic links
    pub follow_symlinks: bool,
}

/// Linux virtual filesystem paths that should be excluded by default.
/// These can report incorrect/huge sizes and cause scanning issues.
pub const LINUX_VIRTUAL_FS_PATHS: &[&str] = &["/proc", "/dev", "/sys", "/run"];

impl ScanOptions {
    /// Create a new ScanOptions that walks everything, hidden files included
    pub fn new() -> Self {
        Self {
            include_hidden: true,
            ..Self::default()
        }
    }

    /// Set maximum recursion depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set whether to include hidden files
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Set whether to stay on the same filesystem
    pub fn with_one_file_system(mut self, enabled: bool) -> Self {
        self.one_file_system = enabled;
        self
    }

    /// Set number of parallel threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Prune a directory (and everything below it) from the walk
    pub fn with_skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip_dirs.push(dir.into());
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Whether a walk started at `root` should descend into / report `path`.
    ///
    /// The root itself is always admitted. Virtual filesystems are only pruned
    /// below a root that lies outside them, so `/run/media/<drive>` or
    /// `/dev/shm/<dir>` can be scanned directly.
    pub(crate) fn admits(&self, path: &Path, root: &Path) -> bool {
        if path == root {
            return true;
        }

        let in_virtual_fs = LINUX_VIRTUAL_FS_PATHS
            .iter()
            .any(|vfs| path.starts_with(vfs) && !root.starts_with(vfs));
        if in_virtual_fs {
            return false;
        }

        if self.skip_dirs.iter().any(|skip| path.starts_with(skip)) {
            return false;
        }

        if !self.include_hidden {
            if let Some(name) = path.file_name() {
                if name.to_string_lossy().starts_with('.') {
                    return false;
                }
            }
        }

        true
    }
}
