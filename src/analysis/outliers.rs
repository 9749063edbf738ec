//! Statistical size outliers: files larger than one standard deviation above the mean.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Result, SweeperError};
use crate::scanner::FileRecord;

/// Mean and population standard deviation of one scan's file sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierThreshold {
    pub mean: f64,
    pub stddev: f64,
}

impl OutlierThreshold {
    /// Compute over `sizes`. Fails with [`SweeperError::EmptyPopulation`] when empty.
    pub fn compute(sizes: &[u64]) -> Result<Self> {
        if sizes.is_empty() {
            return Err(SweeperError::EmptyPopulation);
        }

        let n = sizes.len() as f64;
        let mean = sizes.iter().map(|&s| s as f64).sum::<f64>() / n;
        let variance = sizes
            .iter()
            .map(|&s| {
                let diff = s as f64 - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;

        Ok(Self {
            mean,
            stddev: variance.sqrt(),
        })
    }

    /// Sizes strictly above this are large
    pub fn cutoff(&self) -> f64 {
        self.mean + self.stddev
    }

    pub fn is_large(&self, size: u64) -> bool {
        size as f64 > self.cutoff()
    }
}

/// A file above the cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargeFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Files strictly above the cutoff, largest first (ties by path).
pub fn find_large<'a>(
    records: impl IntoIterator<Item = &'a FileRecord>,
    threshold: &OutlierThreshold,
) -> Vec<LargeFile> {
    let mut large: Vec<LargeFile> = records
        .into_iter()
        .filter(|record| threshold.is_large(record.size))
        .map(|record| LargeFile {
            path: record.path.clone(),
            size: record.size,
        })
        .collect();

    large.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    large
}
