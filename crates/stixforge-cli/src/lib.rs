//! Stixforge CLI - command-line interface for the STIX extraction pipeline.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod jobs;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use jobs::InMemoryJobTracker;
pub use output::Formatter;
