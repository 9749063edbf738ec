//! Scan command implementation

use anyhow::Result;

use crate::analysis::{DuplicateSet, ScanReport};
use crate::cli::ScanArgs;
use crate::config::Config;

use super::{human, print_inaccessible, WalkPlan};

/// Largest extensions shown in the text report
const TOP_EXTENSIONS: usize = 10;

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config) -> Result<()> {
    let plan = WalkPlan::new(&args.walk, config)?;
    let verify = args.verify || config.duplicates.verify_content;

    tracing::info!(path = %plan.root.display(), verify, "Scanning directory");

    let outcome = plan.walk()?;
    let report = ScanReport::build(outcome, verify);

    if plan.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Scanned {} files ({}) under {}",
        report.file_count,
        human(report.total_bytes),
        plan.root.display()
    );

    println!();
    print_duplicates(&report.duplicates, verify);

    println!();
    match &report.large {
        Some(large) => {
            println!(
                "Large files (> {} = mean {} + stddev {}): {}",
                human(large.threshold.cutoff() as u64),
                human(large.threshold.mean as u64),
                human(large.threshold.stddev as u64),
                large.files.len()
            );
            for (i, file) in large.files.iter().enumerate() {
                println!("  {:>3}. {:>10}  {}", i + 1, human(file.size), file.path.display());
            }
        }
        None => println!("No files found."),
    }

    if !report.usage.is_empty() {
        println!();
        println!("Space by extension:");
        let entries = report.usage.sorted_by_size();
        for (ext, size) in entries.iter().take(TOP_EXTENSIONS) {
            println!("  {:<12} {:>10}", ext, human(*size));
        }
        if entries.len() > TOP_EXTENSIONS {
            println!("  ... {} more extensions", entries.len() - TOP_EXTENSIONS);
        }
    }

    print_inaccessible(&report.inaccessible);

    Ok(())
}

/// Numbered duplicate listing shared with the dupes command
pub fn print_duplicates(sets: &[DuplicateSet], verified: bool) {
    let basis = if verified {
        "identical content"
    } else {
        "identical size, content not compared"
    };

    if sets.is_empty() {
        println!("No duplicate groups ({}).", basis);
        return;
    }

    let wasted = sets
        .iter()
        .map(DuplicateSet::wasted_bytes)
        .fold(0u64, u64::saturating_add);
    println!(
        "Duplicate groups ({}): {}, {} reclaimable",
        basis,
        sets.len(),
        human(wasted)
    );

    for (i, set) in sets.iter().enumerate() {
        println!(
            "  Group {} ({} each, {} files)",
            i + 1,
            human(set.size),
            set.len()
        );
        for (j, path) in set.paths.iter().enumerate() {
            println!("    {}. {}", j + 1, path.display());
        }
    }
}
