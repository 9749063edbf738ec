//! Space command implementation

use anyhow::{Context, Result};

use crate::cli::SpaceArgs;
use crate::disk;

use super::human;

/// Run the space command
pub fn run(args: SpaceArgs) -> Result<()> {
    let spaces = args
        .paths
        .iter()
        .map(|path| {
            disk::space(path).with_context(|| format!("Failed to query {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&spaces)?);
        return Ok(());
    }

    for space in &spaces {
        println!("{}", space.path.display());
        println!("  Total:     {:>10}", human(space.total));
        println!("  Used:      {:>10} ({:.1}%)", human(space.used), space.percent_used());
        println!("  Available: {:>10}", human(space.available));
    }

    Ok(())
}
