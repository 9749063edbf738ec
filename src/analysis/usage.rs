//! Space utilization broken down by extension or by category.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::scanner::{walk_parallel, FileRecord, ScanOptions, Walker};

use super::category::FileCategory;

/// Key used for files without an extension.
pub const NO_EXTENSION: &str = "(none)";

/// Total bytes per lowercased extension (with leading dot).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtensionUsage {
    totals: BTreeMap<String, u64>,
}

impl ExtensionUsage {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FileRecord>) -> Self {
        let mut usage = Self::default();
        for record in records {
            usage.add(record);
        }
        usage
    }

    pub fn add(&mut self, record: &FileRecord) {
        let key = record
            .extension()
            .unwrap_or_else(|| NO_EXTENSION.to_string());
        let total = self.totals.entry(key).or_default();
        *total = total.saturating_add(record.size);
    }

    pub fn get(&self, extension: &str) -> Option<u64> {
        self.totals.get(extension).copied()
    }

    pub fn total(&self) -> u64 {
        self.totals
            .values()
            .fold(0u64, |acc, size| acc.saturating_add(*size))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Entries largest first, ties by extension
    pub fn sorted_by_size(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .totals
            .iter()
            .map(|(ext, size)| (ext.as_str(), *size))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Total bytes per requested category. Uncategorized files are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryUsage {
    totals: BTreeMap<FileCategory, u64>,
}

impl CategoryUsage {
    /// Start with a zero total for every requested category.
    pub fn new(categories: &[FileCategory]) -> Self {
        Self {
            totals: categories.iter().map(|c| (*c, 0)).collect(),
        }
    }

    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a FileRecord>,
        categories: &[FileCategory],
    ) -> Self {
        let mut usage = Self::new(categories);
        for record in records {
            usage.add(record);
        }
        usage
    }

    pub fn add(&mut self, record: &FileRecord) {
        if let Some(category) = FileCategory::of_path(&record.path) {
            if let Some(total) = self.totals.get_mut(&category) {
                *total = total.saturating_add(record.size);
            }
        }
    }

    pub fn get(&self, category: FileCategory) -> Option<u64> {
        self.totals.get(&category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileCategory, u64)> + '_ {
        self.totals.iter().map(|(c, s)| (*c, *s))
    }
}

/// Extension breakdown for one root, plus what could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub root: PathBuf,
    pub usage: ExtensionUsage,
    pub inaccessible: Vec<PathBuf>,
}

/// Category breakdown for one root, plus what could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub root: PathBuf,
    pub usage: CategoryUsage,
    pub inaccessible: Vec<PathBuf>,
}

/// Walk `root` and total bytes per extension.
pub fn aggregate(root: &Path, options: &ScanOptions, parallel: bool) -> Result<UsageReport> {
    if parallel {
        let outcome = walk_parallel(root, options)?;
        return Ok(UsageReport {
            root: root.to_path_buf(),
            usage: ExtensionUsage::from_records(&outcome.records),
            inaccessible: outcome.inaccessible,
        });
    }

    let mut walker = Walker::new(root, options)?;
    let mut usage = ExtensionUsage::default();
    for record in walker.by_ref() {
        usage.add(&record);
    }
    Ok(UsageReport {
        root: root.to_path_buf(),
        usage,
        inaccessible: walker.inaccessible().to_vec(),
    })
}

/// Walk `root` and total bytes for files in the requested categories.
pub fn aggregate_by_category(
    root: &Path,
    categories: &[FileCategory],
    options: &ScanOptions,
    parallel: bool,
) -> Result<CategoryReport> {
    let mut usage = CategoryUsage::new(categories);

    let inaccessible = if parallel {
        let outcome = walk_parallel(root, options)?;
        outcome.records.iter().for_each(|record| usage.add(record));
        outcome.inaccessible
    } else {
        let mut walker = Walker::new(root, options)?;
        for record in walker.by_ref() {
            usage.add(&record);
        }
        walker.inaccessible().to_vec()
    };

    Ok(CategoryReport {
        root: root.to_path_buf(),
        usage,
        inaccessible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record(path: &str, size: u64) -> FileRecord {
        FileRecord::new(PathBuf::from(path), size, None)
    }

    #[test]
    fn test_extensions_merge_case_insensitively() {
        let records = vec![
            record("/a.TXT", 100),
            record("/b.txt", 50),
            record("/c.jpg", 10),
        ];

        let usage = ExtensionUsage::from_records(&records);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage.get(".txt"), Some(150));
        assert_eq!(usage.get(".jpg"), Some(10));
        assert_eq!(usage.total(), 160);
    }

    #[test]
    fn test_files_without_extension_use_sentinel() {
        let records = vec![record("/Makefile", 7), record("/.profile", 3)];
        let usage = ExtensionUsage::from_records(&records);
        assert_eq!(usage.get(NO_EXTENSION), Some(10));
    }

    #[test]
    fn test_sorted_by_size() {
        let records = vec![
            record("/a.rs", 5),
            record("/b.md", 50),
            record("/c.toml", 5),
        ];
        let usage = ExtensionUsage::from_records(&records);
        assert_eq!(
            usage.sorted_by_size(),
            vec![(".md", 50), (".rs", 5), (".toml", 5)]
        );
    }

    #[test]
    fn test_category_usage_ignores_unrequested_and_unknown() {
        let records = vec![
            record("/clip.MP4", 1000),
            record("/photo.png", 200),
            record("/song.mp3", 300),
            record("/lib.so", 999),
        ];

        let usage =
            CategoryUsage::from_records(&records, &[FileCategory::Video, FileCategory::Image]);
        assert_eq!(usage.get(FileCategory::Video), Some(1000));
        assert_eq!(usage.get(FileCategory::Image), Some(200));
        assert_eq!(usage.get(FileCategory::Audio), None);
        assert_eq!(usage.iter().count(), 2);
    }

    #[test]
    fn test_aggregate_walks_tree() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("a.TXT"), vec![0u8; 100]).unwrap();
        fs::write(dir.path().join("docs/b.txt"), vec![0u8; 50]).unwrap();
        fs::write(dir.path().join("docs/c.jpg"), vec![0u8; 10]).unwrap();

        for parallel in [false, true] {
            let report = aggregate(dir.path(), &ScanOptions::new(), parallel).unwrap();
            assert_eq!(report.usage.get(".txt"), Some(150));
            assert_eq!(report.usage.get(".jpg"), Some(10));
            assert!(report.inaccessible.is_empty());
        }
    }

    #[test]
    fn test_aggregate_by_category_walks_tree() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("movie.mkv"), vec![0u8; 64]).unwrap();
        fs::write(dir.path().join("notes.pdf"), vec![0u8; 16]).unwrap();
        fs::write(dir.path().join("blob.bin"), vec![0u8; 512]).unwrap();

        let report = aggregate_by_category(
            dir.path(),
            &[FileCategory::Video, FileCategory::Document],
            &ScanOptions::new(),
            false,
        )
        .unwrap();

        assert_eq!(report.usage.get(FileCategory::Video), Some(64));
        assert_eq!(report.usage.get(FileCategory::Document), Some(16));
    }
}
