//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use magnetdex_core::IdFormat;

#[derive(Parser, Debug)]
#[command(name = "magnetdex", version, about = "Torrent metadata toolkit")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "debug")
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse or build magnet links
    #[command(subcommand)]
    Magnet(MagnetCommand),

    /// Derive a data-contract id from its owner and entropy
    ContractId(ContractIdArgs),

    /// Parse or format typed identifiers (IMDb, Open Library works)
    #[command(subcommand)]
    Id(IdCommand),

    /// Normalize a tracker list (newline or comma separated)
    Trackers {
        /// Raw tracker text
        text: String,
    },

    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum MagnetCommand {
    /// Extract info hash, name and trackers from a magnet URI
    Parse {
        uri: String,
    },
    /// Build a magnet URI from its parts
    Build(MagnetBuildArgs),
}

#[derive(Args, Debug)]
pub struct MagnetBuildArgs {
    /// Info hash, 40 hex characters
    #[arg(long)]
    pub hash: String,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Tracker URL, may be repeated
    #[arg(long = "tracker", short = 't')]
    pub trackers: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ContractIdArgs {
    /// Owner identity, base-58
    #[arg(long)]
    pub owner: String,

    /// 32 bytes of entropy, hex encoded
    #[arg(long)]
    pub entropy: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdFormatArg {
    Imdb,
    OpenlibraryWork,
}

impl From<IdFormatArg> for IdFormat {
    fn from(arg: IdFormatArg) -> Self {
        match arg {
            IdFormatArg::Imdb => IdFormat::Imdb,
            IdFormatArg::OpenlibraryWork => IdFormat::OpenlibraryWork,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum IdCommand {
    /// Parse user text into a numeric id
    Parse {
        #[arg(long, value_enum)]
        format: IdFormatArg,
        text: String,
    },
    /// Format a numeric id in its canonical form
    Format {
        #[arg(long, value_enum)]
        format: IdFormatArg,
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Load and validate a configuration file, printing it with secrets hidden
    Check {
        /// Config file path; falls back to MAGNETDEX_CONFIG, then config.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
