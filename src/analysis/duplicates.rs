//! Duplicate candidates grouped by file size.
//!
//! Grouping is by exact byte count only. Two files of equal size but different
//! content land in the same [`DuplicateSet`]; a set therefore promises equal
//! sizes, never equal content. [`confirm_by_content`] is an opt-in pass that
//! narrows sets down to byte-identical files.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::scanner::FileRecord;

const COMPARE_CHUNK: usize = 64 * 1024;

/// Paths sharing one exact size, deduplicated and sorted lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeGroup {
    pub size: u64,
    pub paths: Vec<PathBuf>,
}

/// A size group with at least two distinct members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSet {
    pub size: u64,
    pub paths: Vec<PathBuf>,
}

impl DuplicateSet {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false; a set holds at least two members.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Bytes reclaimed by keeping a single copy
    pub fn wasted_bytes(&self) -> u64 {
        self.size
            .saturating_mul((self.paths.len() as u64).saturating_sub(1))
    }
}

/// Index of file paths keyed by size. Zero-byte files are never indexed.
#[derive(Debug, Clone, Default)]
pub struct SizeIndex {
    groups: BTreeMap<u64, BTreeSet<PathBuf>>,
}

impl SizeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<'a>(records: impl IntoIterator<Item = &'a FileRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    pub fn insert(&mut self, record: &FileRecord) {
        if record.size == 0 {
            return;
        }
        self.groups
            .entry(record.size)
            .or_default()
            .insert(record.path.clone());
    }

    /// Fold a fragment built elsewhere (e.g. by another worker) into this index.
    pub fn merge(&mut self, other: SizeIndex) {
        for (size, paths) in other.groups {
            self.groups.entry(size).or_default().extend(paths);
        }
    }

    /// Number of distinct sizes
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of indexed paths across all groups
    pub fn file_count(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    /// Groups in ascending size order
    pub fn into_groups(self) -> Vec<SizeGroup> {
        self.groups
            .into_iter()
            .map(|(size, paths)| SizeGroup {
                size,
                paths: paths.into_iter().collect(),
            })
            .collect()
    }
}

/// Group records by exact size, skipping empty files.
pub fn build_size_index<'a>(records: impl IntoIterator<Item = &'a FileRecord>) -> Vec<SizeGroup> {
    SizeIndex::build(records).into_groups()
}

/// Keep groups with two or more paths, largest reclaimable space first.
pub fn filter_duplicates(groups: Vec<SizeGroup>) -> Vec<DuplicateSet> {
    let mut sets: Vec<DuplicateSet> = groups
        .into_iter()
        .filter(|group| group.paths.len() >= 2)
        .map(|group| DuplicateSet {
            size: group.size,
            paths: group.paths,
        })
        .collect();
    sort_sets(&mut sets);
    sets
}

/// Split each set into classes of byte-identical files.
///
/// Members that cannot be opened are dropped. Only classes with two or more
/// members survive.
pub fn confirm_by_content(sets: Vec<DuplicateSet>) -> Vec<DuplicateSet> {
    let mut confirmed: Vec<DuplicateSet> = sets
        .into_par_iter()
        .flat_map_iter(|set| {
            let size = set.size;
            partition_identical(set.paths)
                .into_iter()
                .filter(|class| class.len() >= 2)
                .map(move |paths| DuplicateSet { size, paths })
        })
        .collect();
    sort_sets(&mut confirmed);
    confirmed
}

fn partition_identical(paths: Vec<PathBuf>) -> Vec<Vec<PathBuf>> {
    let mut classes: Vec<Vec<PathBuf>> = Vec::new();

    'paths: for path in paths {
        if let Err(e) = File::open(&path) {
            tracing::warn!(path = %path.display(), error = %e, "Dropping unreadable duplicate candidate");
            continue;
        }

        for class in classes.iter_mut() {
            match files_equal(&class[0], &path) {
                Ok(true) => {
                    class.push(path);
                    continue 'paths;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        left = %class[0].display(),
                        right = %path.display(),
                        error = %e,
                        "Content comparison failed"
                    );
                }
            }
        }

        classes.push(vec![path]);
    }

    classes
}

/// Compare two files byte for byte.
pub fn files_equal(a: &Path, b: &Path) -> io::Result<bool> {
    let mut left = BufReader::new(File::open(a)?);
    let mut right = BufReader::new(File::open(b)?);
    let mut left_buf = vec![0u8; COMPARE_CHUNK];
    let mut right_buf = vec![0u8; COMPARE_CHUNK];

    loop {
        let n = fill(&mut left, &mut left_buf)?;
        let m = fill(&mut right, &mut right_buf)?;
        if n != m || left_buf[..n] != right_buf[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Read until `buf` is full or EOF.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn sort_sets(sets: &mut [DuplicateSet]) {
    sets.sort_by(|a, b| {
        b.wasted_bytes()
            .cmp(&a.wasted_bytes())
            .then(b.size.cmp(&a.size))
            .then_with(|| a.paths.cmp(&b.paths))
    });
}
