use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::analysis::FileCategory;

/// Dupe Sweeper - find duplicate and oversized files and delete them safely through a recoverable trash
#[derive(Parser, Debug)]
#[command(name = "dupe-sweeper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full report: duplicates, large files, space by extension
    Scan(ScanArgs),

    /// List files grouped by identical size and optionally trash copies
    Dupes(DupesArgs),

    /// Find statistically large files and optionally trash them
    Large(LargeArgs),

    /// Break down space usage by extension or category
    Usage(UsageArgs),

    /// Move every file with a given extension to the trash
    PurgeExt(PurgeExtArgs),

    /// List, recover or expire trashed files
    Trash(TrashArgs),

    /// Show filesystem capacity
    Space(SpaceArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that walks a tree
#[derive(Args, Debug, Clone)]
pub struct WalkArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Skip hidden files and directories
    #[arg(long)]
    pub no_hidden: bool,

    /// Don't cross filesystem boundaries
    #[arg(short = 'x', long)]
    pub one_file_system: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub follow_symlinks: bool,

    /// Maximum recursion depth
    #[arg(short = 'd', long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Parallel walk threads
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Walk on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub walk: WalkArgs,

    /// Confirm duplicate groups by comparing file contents
    #[arg(long)]
    pub verify: bool,
}

#[derive(Args, Debug)]
pub struct DupesArgs {
    #[command(flatten)]
    pub walk: WalkArgs,

    /// Confirm duplicate groups by comparing file contents
    #[arg(long)]
    pub verify: bool,

    /// Move the members of this group (as numbered in the listing) to the trash
    #[arg(long, value_name = "GROUP")]
    pub trash: Option<usize>,

    /// Members of the group to keep (comma-separated numbers)
    #[arg(long, value_delimiter = ',', value_name = "N", requires = "trash")]
    pub keep: Vec<usize>,
}

#[derive(Args, Debug)]
pub struct LargeArgs {
    #[command(flatten)]
    pub walk: WalkArgs,

    /// Move these large files (comma-separated numbers) to the trash
    #[arg(long, value_delimiter = ',', value_name = "N")]
    pub trash: Vec<usize>,
}

#[derive(Args, Debug)]
pub struct UsageArgs {
    #[command(flatten)]
    pub walk: WalkArgs,

    /// Total by file category instead of by extension
    #[arg(long)]
    pub by_category: bool,

    /// Categories to total (comma-separated; defaults to the configured set)
    #[arg(long, value_enum, value_delimiter = ',', value_name = "CATEGORY", requires = "by_category")]
    pub category: Vec<FileCategory>,
}

#[derive(Args, Debug)]
pub struct PurgeExtArgs {
    /// Extension to trash, e.g. "tmp" or ".log"
    pub extension: String,

    #[command(flatten)]
    pub walk: WalkArgs,
}

#[derive(Args, Debug)]
pub struct TrashArgs {
    #[command(subcommand)]
    pub action: TrashAction,
}

#[derive(Subcommand, Debug)]
pub enum TrashAction {
    /// List trashed files
    List(TrashLocation),

    /// Recover trashed files by their listing numbers
    Recover(TrashRecoverArgs),

    /// Permanently delete files trashed longer than the retention period
    Sweep(TrashSweepArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TrashLocation {
    /// Directory holding the trash
    #[arg(short, long, default_value = ".", value_name = "PATH")]
    pub root: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TrashRecoverArgs {
    #[command(flatten)]
    pub location: TrashLocation,

    /// Entry numbers as shown by `trash list` (comma-separated)
    #[arg(required = true, value_delimiter = ',', value_name = "N")]
    pub entries: Vec<usize>,

    /// Recover into this path instead of the original location
    #[arg(long, value_name = "DEST")]
    pub to: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TrashSweepArgs {
    #[command(flatten)]
    pub location: TrashLocation,

    /// Retention in days (defaults to the configured value)
    #[arg(long, value_name = "DAYS")]
    pub days: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SpaceArgs {
    /// Paths whose filesystems to report
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
