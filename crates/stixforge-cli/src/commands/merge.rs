//! The merge command: reconcile several bundle files into one.

use crate::cli::MergeArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;
use stixforge_domain::StixBundle;
use stixforge_extractor::merge_bundles;

/// Merge bundle files in precedence order and emit the result.
pub fn execute_merge(args: MergeArgs, formatter: &Formatter) -> Result<()> {
    let mut bundles = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let contents = fs::read_to_string(path)?;
        let bundle: StixBundle = serde_json::from_str(&contents).map_err(|e| {
            CliError::InvalidInput(format!("{} is not a STIX bundle: {}", path.display(), e))
        })?;
        bundles.push(bundle);
    }

    let merged = merge_bundles(&bundles);
    let rendered = serde_json::to_string_pretty(&merged)?;

    match &args.output {
        Some(output) => {
            fs::write(output, rendered)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "merged {} bundles into {} ({} objects)",
                    bundles.len(),
                    output.display(),
                    merged.object_count()
                ))
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
