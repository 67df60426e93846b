mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let output = match &cli.command {
        Command::Magnet(command) => commands::magnet(command)?,
        Command::ContractId(args) => commands::contract_id(args)?,
        Command::Id(command) => commands::id(command)?,
        Command::Trackers { text } => commands::trackers(text)?,
        Command::Config(command) => commands::config(command)?,
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize output")?;

    println!("{}", rendered);
    Ok(())
}
