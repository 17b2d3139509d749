//! Stixforge CLI - extract STIX threat-intelligence bundles from documents.

use clap::Parser;
use stixforge_cli::{commands, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> stixforge_cli::Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save().ok();
        cfg
    });

    let formatter = Formatter::new(!cli.no_color);
    let data_dir = config.resolve_data_dir(cli.data_dir)?;

    match cli.command {
        Command::Extract(args) => {
            commands::execute_extract(args, &config, data_dir, &formatter).await?;
        }
        Command::Merge(args) => {
            commands::execute_merge(args, &formatter)?;
        }
        Command::Show(args) => {
            commands::execute_show(args, &formatter)?;
        }
        Command::Documents => {
            commands::execute_documents(data_dir, &formatter)?;
        }
    }

    Ok(())
}
