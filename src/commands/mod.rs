//! Subcommand implementations: translate arguments and configuration into
//! call-time parameters, run the core, print the results.

pub mod dupes;
pub mod large;
pub mod purge;
pub mod scan;
pub mod space;
pub mod trash;
pub mod usage;

use std::path::{Path, PathBuf};
use std::time::Duration;

use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::WalkArgs;
use crate::config::Config;
use crate::error::{Result, SweeperError};
use crate::scanner::{self, ScanOptions, WalkOutcome};
use crate::trash::{TrashBatch, TrashFailure, TrashStore};

/// Exit code used when some, but not all, files of a batch were handled
pub const PARTIAL_FAILURE_EXIT: i32 = 5;

/// Resolved inputs for a walk: canonical root, options and the trash beneath it.
pub struct WalkPlan {
    pub root: PathBuf,
    pub options: ScanOptions,
    pub parallel: bool,
    pub store: TrashStore,
    pub json: bool,
}

impl WalkPlan {
    pub fn new(args: &WalkArgs, config: &Config) -> Result<Self> {
        let root = args
            .path
            .canonicalize()
            .map_err(|e| SweeperError::from_io(&args.path, e))?;
        let store = open_store(&root, config);

        let mut options = config
            .scan
            .to_options()
            .with_skip_dir(store.dir().to_path_buf());
        if args.no_hidden {
            options = options.with_hidden(false);
        }
        if args.one_file_system {
            options = options.with_one_file_system(true);
        }
        if args.follow_symlinks {
            options = options.with_follow_symlinks(true);
        }
        if let Some(depth) = args.max_depth {
            options = options.with_max_depth(depth);
        }
        if let Some(jobs) = args.jobs {
            options = options.with_threads(jobs);
        }

        Ok(Self {
            root,
            options,
            parallel: config.scan.parallel && !args.sequential,
            store,
            json: args.json,
        })
    }

    /// Walk the root behind a spinner (hidden for JSON output)
    pub fn walk(&self) -> Result<WalkOutcome> {
        let spinner = spinner(!self.json, format!("Scanning {}", self.root.display()));
        let outcome = scanner::walk(&self.root, &self.options, self.parallel);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let outcome = outcome?;
        tracing::info!(
            root = %self.root.display(),
            files = outcome.records.len(),
            inaccessible = outcome.inaccessible.len(),
            "Walk finished"
        );
        Ok(outcome)
    }
}

/// Trash store for `root` as configured
pub fn open_store(root: &Path, config: &Config) -> TrashStore {
    TrashStore::under(root, &config.trash.dir_name).with_collision_policy(config.trash.collision)
}

/// Spinner on stderr; indicatif hides it when stderr is not a terminal
pub fn spinner(enabled: bool, message: String) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

pub fn human(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Convert 1-based selections from the command line into 0-based indices
pub fn zero_based(numbers: &[usize]) -> Result<Vec<usize>> {
    numbers
        .iter()
        .map(|&n| {
            n.checked_sub(1)
                .ok_or_else(|| SweeperError::InvalidSelection("numbers start at 1".into()))
        })
        .collect()
}

pub fn print_inaccessible(paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    println!();
    println!("Inaccessible ({}):", paths.len());
    for path in paths {
        println!("  {}", path.display());
    }
}

pub fn print_failures(failures: &[TrashFailure]) {
    for failure in failures {
        eprintln!("  Error: {}: {}", failure.path.display(), failure.error);
    }
}

/// Print what a batch moved; exits with the partial-failure code if anything failed
pub fn report_batch(batch: &TrashBatch, store: &TrashStore) {
    for entry in &batch.moved {
        println!(
            "Moved to trash: {} -> {}",
            entry.original_path.display(),
            entry.trash_path.display()
        );
    }
    println!(
        "{} file{} moved to {}",
        batch.moved.len(),
        if batch.moved.len() == 1 { "" } else { "s" },
        store.dir().display()
    );

    if !batch.is_complete() {
        print_failures(&batch.failed);
        std::process::exit(PARTIAL_FAILURE_EXIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_based() {
        assert_eq!(zero_based(&[1, 3]).unwrap(), vec![0, 2]);
        assert!(zero_based(&[0]).is_err());
    }

    #[test]
    fn test_walk_plan_skips_trash_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let args = WalkArgs {
            path: tmp.path().to_path_buf(),
            no_hidden: true,
            one_file_system: false,
            follow_symlinks: false,
            max_depth: Some(3),
            jobs: None,
            sequential: true,
            json: true,
        };

        let plan = WalkPlan::new(&args, &Config::default()).unwrap();
        let root = tmp.path().canonicalize().unwrap();
        assert_eq!(plan.root, root);
        assert_eq!(plan.store.dir(), root.join("Trash"));
        assert!(plan.options.skip_dirs.contains(&root.join("Trash")));
        assert!(!plan.options.include_hidden);
        assert_eq!(plan.options.max_depth, Some(3));
        assert!(!plan.parallel);
    }
}
