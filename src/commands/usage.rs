//! Usage command implementation

use anyhow::Result;

use crate::analysis::{aggregate, aggregate_by_category};
use crate::cli::UsageArgs;
use crate::config::Config;

use super::{human, print_inaccessible, spinner, WalkPlan};

/// Run the usage command
pub fn run(args: UsageArgs, config: &Config) -> Result<()> {
    let plan = WalkPlan::new(&args.walk, config)?;
    let progress = spinner(!plan.json, format!("Scanning {}", plan.root.display()));

    if args.by_category {
        let categories = if args.category.is_empty() {
            config.usage.categories.clone()
        } else {
            args.category
        };

        let report = aggregate_by_category(&plan.root, &categories, &plan.options, plan.parallel);
        if let Some(progress) = progress {
            progress.finish_and_clear();
        }
        let report = report?;

        if plan.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Space by category under {}:", plan.root.display());
        for (category, size) in report.usage.iter() {
            println!("  {:<10} {:>10}", category, human(size));
        }
        print_inaccessible(&report.inaccessible);
        return Ok(());
    }

    let report = aggregate(&plan.root, &plan.options, plan.parallel);
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }
    let report = report?;

    if plan.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.usage.is_empty() {
        println!("No files found in {}.", plan.root.display());
        return Ok(());
    }

    println!("Space by extension under {}:", plan.root.display());
    for (ext, size) in report.usage.sorted_by_size() {
        println!("  {:<12} {:>10}", ext, human(size));
    }
    println!("  {:<12} {:>10}", "total", human(report.usage.total()));
    print_inaccessible(&report.inaccessible);

    Ok(())
}
