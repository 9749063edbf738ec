//! Trash command implementation: list, recover and sweep

use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::{TrashAction, TrashArgs, TrashLocation, TrashRecoverArgs, TrashSweepArgs};
use crate::config::Config;
use crate::trash::{recover_selected, TrashStore};

use super::{open_store, print_failures, zero_based, PARTIAL_FAILURE_EXIT};

const SECS_PER_DAY: u64 = 86_400;

/// Run the trash command
pub fn run(args: TrashArgs, config: &Config) -> Result<()> {
    match args.action {
        TrashAction::List(location) => list(&location, config),
        TrashAction::Recover(args) => recover(args, config),
        TrashAction::Sweep(args) => sweep(args, config),
    }
}

fn store_for(location: &TrashLocation, config: &Config) -> Result<TrashStore> {
    let root = location
        .root
        .canonicalize()
        .with_context(|| format!("Cannot resolve {}", location.root.display()))?;
    Ok(open_store(&root, config))
}

fn list(location: &TrashLocation, config: &Config) -> Result<()> {
    let store = store_for(location, config)?;
    let entries = store.list()?;

    if location.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Trash at {} is empty.", store.dir().display());
        return Ok(());
    }

    let now = SystemTime::now();
    println!("Trash at {} ({} entries):", store.dir().display(), entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let age = entry
            .age(now)
            .map(|age| format!("{}d", age.as_secs() / SECS_PER_DAY))
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  {:>3}. {:<30} {:>4}  {}",
            i + 1,
            entry.name(),
            age,
            entry.original_path.display()
        );
    }

    Ok(())
}

fn recover(args: TrashRecoverArgs, config: &Config) -> Result<()> {
    let mut store = store_for(&args.location, config)?;
    let entries = store.list()?;
    let indices = zero_based(&args.entries)?;

    let batch = recover_selected(&mut store, &entries, &indices, args.to.as_deref())?;

    if args.location.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        for path in &batch.recovered {
            println!("Recovered: {}", path.display());
        }
        print_failures(&batch.failed);
    }

    if !batch.is_complete() {
        std::process::exit(PARTIAL_FAILURE_EXIT);
    }
    Ok(())
}

fn sweep(args: TrashSweepArgs, config: &Config) -> Result<()> {
    let store = store_for(&args.location, config)?;
    let days = args.days.unwrap_or(config.trash.retention_days);
    if days == 0 {
        anyhow::bail!("Retention must be at least one day");
    }

    tracing::info!(
        dir = %store.dir().display(),
        retention = ?Duration::from_secs(days.saturating_mul(SECS_PER_DAY)),
        "Sweeping trash"
    );
    let report = store.sweep_expired(days)?;

    if args.location.json {
        let value = json!({
            "retention_days": days,
            "removed": report.removed,
            "failed": report.failed,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for path in &report.removed {
            println!("Deleted: {}", path.display());
        }
        println!(
            "{} expired file{} deleted (retention {} days)",
            report.count(),
            if report.count() == 1 { "" } else { "s" },
            days
        );
        print_failures(&report.failed);
    }

    if !report.failed.is_empty() {
        std::process::exit(PARTIAL_FAILURE_EXIT);
    }
    Ok(())
}
