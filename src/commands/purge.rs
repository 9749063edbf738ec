//! Purge-ext command implementation

use anyhow::Result;

use crate::cli::PurgeExtArgs;
use crate::config::Config;
use crate::trash::trash_by_extension;

use super::{report_batch, WalkPlan, PARTIAL_FAILURE_EXIT};

/// Run the purge-ext command
pub fn run(args: PurgeExtArgs, config: &Config) -> Result<()> {
    let mut plan = WalkPlan::new(&args.walk, config)?;

    tracing::info!(
        path = %plan.root.display(),
        extension = %args.extension,
        "Trashing files by extension"
    );

    let outcome = plan.walk()?;
    let batch = trash_by_extension(&mut plan.store, &outcome.records, &args.extension)?;

    if plan.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        if !batch.is_complete() {
            std::process::exit(PARTIAL_FAILURE_EXIT);
        }
        return Ok(());
    }

    if batch.moved.is_empty() && batch.failed.is_empty() {
        println!("No files with extension '{}' found.", args.extension);
        return Ok(());
    }

    report_batch(&batch, &plan.store);
    Ok(())
}
