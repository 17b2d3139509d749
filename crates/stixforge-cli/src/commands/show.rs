//! The show command: summarize a bundle file.

use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;
use stixforge_domain::StixBundle;

/// Print a type summary for a stored bundle.
pub fn execute_show(args: ShowArgs, formatter: &Formatter) -> Result<()> {
    let contents = fs::read_to_string(&args.path)?;
    let bundle: StixBundle = serde_json::from_str(&contents).map_err(|e| {
        CliError::InvalidInput(format!(
            "{} is not a STIX bundle: {}",
            args.path.display(),
            e
        ))
    })?;

    println!("{}", formatter.format_bundle_summary(&bundle));
    Ok(())
}
