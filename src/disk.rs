//! Filesystem capacity for a path.

use std::path::{Path, PathBuf};

use nix::sys::statvfs::statvfs;
use serde::Serialize;

use crate::error::{Result, SweeperError};

/// Capacity of the filesystem holding a path
#[derive(Debug, Clone, Serialize)]
pub struct DiskSpace {
    pub path: PathBuf,

    /// Total capacity in bytes
    pub total: u64,

    /// Free bytes, including blocks reserved for root
    pub free: u64,

    /// Bytes available to unprivileged users
    pub available: u64,

    /// Used bytes (total - free)
    pub used: u64,
}

impl DiskSpace {
    /// Usage percentage of the space unprivileged users can touch
    pub fn percent_used(&self) -> f64 {
        let usable_total = self.used + self.available;
        if usable_total > 0 {
            self.used as f64 / usable_total as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Query capacity for the filesystem containing `path`
pub fn space(path: &Path) -> Result<DiskSpace> {
    let stat = statvfs(path).map_err(|errno| {
        SweeperError::from_io(path, std::io::Error::from(errno))
    })?;

    let block_size = stat.fragment_size() as u64;
    let total = stat.blocks() as u64 * block_size;
    let free = stat.blocks_free() as u64 * block_size;
    let available = stat.blocks_available() as u64 * block_size;

    Ok(DiskSpace {
        path: path.to_path_buf(),
        total,
        free,
        available,
        used: total.saturating_sub(free),
    })
}
