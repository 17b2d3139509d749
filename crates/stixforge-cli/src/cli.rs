//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stixforge CLI - Extract STIX threat-intelligence bundles from documents.
#[derive(Debug, Parser)]
#[command(name = "stixforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Data directory (blobs and document records)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a document and extract a STIX bundle from it
    Extract(ExtractArgs),

    /// Merge bundle files into one, deduplicating by object id
    Merge(MergeArgs),

    /// Summarize a bundle file
    Show(ShowArgs),

    /// List ingested documents
    Documents,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Document to extract from (pdf, docx, txt, or json)
    pub path: PathBuf,

    /// Declared MIME type (guessed from the extension when omitted)
    #[arg(short, long)]
    pub mime: Option<String>,

    /// User scope for storage keys
    #[arg(short, long, default_value = "local")]
    pub user: String,

    /// Print the resulting bundle as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the merge command.
#[derive(Debug, Parser)]
pub struct MergeArgs {
    /// Bundle files to merge, in precedence order
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Write the merged bundle here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Bundle file to summarize
    pub path: PathBuf,
}
