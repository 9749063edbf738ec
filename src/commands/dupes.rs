//! Dupes command implementation

use anyhow::Result;
use serde_json::json;

use crate::analysis::{build_size_index, confirm_by_content, filter_duplicates};
use crate::cli::DupesArgs;
use crate::config::Config;
use crate::trash::trash_group;

use super::scan::print_duplicates;
use super::{print_inaccessible, report_batch, zero_based, WalkPlan, PARTIAL_FAILURE_EXIT};

/// Run the dupes command
pub fn run(args: DupesArgs, config: &Config) -> Result<()> {
    let mut plan = WalkPlan::new(&args.walk, config)?;
    let verify = args.verify || config.duplicates.verify_content;

    let outcome = plan.walk()?;
    let mut sets = filter_duplicates(build_size_index(&outcome.records));
    if verify {
        sets = confirm_by_content(sets);
    }

    let Some(group) = args.trash else {
        if plan.json {
            let value = json!({
                "verified": verify,
                "groups": sets,
                "inaccessible": outcome.inaccessible,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            print_duplicates(&sets, verify);
            print_inaccessible(&outcome.inaccessible);
        }
        return Ok(());
    };

    let group = zero_based(&[group])?[0];
    let keep = zero_based(&args.keep)?;
    let batch = trash_group(&mut plan.store, &sets, group, &keep)?;

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
