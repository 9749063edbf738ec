//! Analyses over a walk: duplicate candidates, size outliers and space usage.

mod category;
pub mod duplicates;
pub mod outliers;
pub mod usage;

pub use category::FileCategory;
pub use duplicates::{
    build_size_index, confirm_by_content, filter_duplicates, DuplicateSet, SizeGroup, SizeIndex,
};
pub use outliers::{find_large, LargeFile, OutlierThreshold};
pub use usage::{
    aggregate, aggregate_by_category, CategoryReport, CategoryUsage, ExtensionUsage, UsageReport,
    NO_EXTENSION,
};

use std::path::PathBuf;

use serde::Serialize;

use crate::error::SweeperError;
use crate::scanner::WalkOutcome;

/// Large-file half of a scan report.
#[derive(Debug, Clone, Serialize)]
pub struct LargeFiles {
    pub threshold: OutlierThreshold,
    pub files: Vec<LargeFile>,
}

/// Every analysis computed from a single walk.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub file_count: usize,
    pub total_bytes: u64,
    pub duplicates: Vec<DuplicateSet>,
    /// Absent when the walk found no files
    pub large: Option<LargeFiles>,
    pub usage: ExtensionUsage,
    pub inaccessible: Vec<PathBuf>,
}

impl ScanReport {
    pub fn build(outcome: WalkOutcome, verify_content: bool) -> Self {
        let records = &outcome.records;

        let mut duplicates = filter_duplicates(build_size_index(records));
        if verify_content {
            duplicates = confirm_by_content(duplicates);
        }

        let sizes: Vec<u64> = records.iter().map(|r| r.size).collect();
        let large = match OutlierThreshold::compute(&sizes) {
            Ok(threshold) => Some(LargeFiles {
                files: find_large(records, &threshold),
                threshold,
            }),
            Err(SweeperError::EmptyPopulation) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Outlier detection failed");
                None
            }
        };

        Self {
            file_count: records.len(),
            total_bytes: sizes.iter().fold(0u64, |acc, size| acc.saturating_add(*size)),
            duplicates,
            large,
            usage: ExtensionUsage::from_records(records),
            inaccessible: outcome.inaccessible,
        }
    }
}
