//! Large command implementation

use anyhow::Result;
use serde_json::json;

use crate::analysis::{find_large, OutlierThreshold};
use crate::cli::LargeArgs;
use crate::config::Config;
use crate::error::SweeperError;
use crate::trash::trash_large;

use super::{human, print_inaccessible, report_batch, zero_based, WalkPlan, PARTIAL_FAILURE_EXIT};

/// Run the large command
pub fn run(args: LargeArgs, config: &Config) -> Result<()> {
    let mut plan = WalkPlan::new(&args.walk, config)?;
    let outcome = plan.walk()?;

    let sizes: Vec<u64> = outcome.records.iter().map(|r| r.size).collect();
    let threshold = match OutlierThreshold::compute(&sizes) {
        Ok(threshold) => threshold,
        Err(SweeperError::EmptyPopulation) => {
            if plan.json {
                println!("{}", json!({ "threshold": null, "files": [] }));
            } else {
                println!("No files found in {}.", plan.root.display());
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let files = find_large(&outcome.records, &threshold);

    if args.trash.is_empty() {
        if plan.json {
            let value = json!({
                "threshold": threshold,
                "cutoff": threshold.cutoff(),
                "files": files,
                "inaccessible": outcome.inaccessible,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("Mean file size:     {}", human(threshold.mean as u64));
            println!("Standard deviation: {}", human(threshold.stddev as u64));
            println!();
            if files.is_empty() {
                println!("No file is larger than {}.", human(threshold.cutoff() as u64));
            }
            for (i, file) in files.iter().enumerate() {
                println!("{:>3}. {:>10}  {}", i + 1, human(file.size), file.path.display());
            }
            print_inaccessible(&outcome.inaccessible);
        }
        return Ok(());
    }

    let indices = zero_based(&args.trash)?;
    let batch = trash_large(&mut plan.store, &files, &indices)?;

    if plan.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        if !batch.is_complete() {
            std::process::exit(PARTIAL_FAILURE_EXIT);
        }
    } else {
        report_batch(&batch, &plan.store);
    }

    Ok(())
}
