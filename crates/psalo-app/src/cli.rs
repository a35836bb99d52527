use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use psalo_types::SearchMode;

#[derive(Parser, Debug)]
#[command(name = "psalo", version, about = "Offline dictionary search and lookup")]
pub struct Cli {
    /// JSON config file; defaults to the user's config dir
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Use this store file instead of the resolved location
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
    /// Without a subcommand an interactive console starts
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List words matching a query
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = Mode::StartsWith)]
        mode: Mode,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size; defaults to the configured one
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show every dictionary entry for a word
    Word { word: String },
    /// Report whether the store still needs downloading
    Status,
    /// Print where the store lives
    Path,
    /// Download the store if it is missing
    Fetch,
    /// Open the store's folder in the file browser
    Open,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    StartsWith,
    Contains,
}

impl From<Mode> for SearchMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::StartsWith => SearchMode::StartsWith,
            Mode::Contains => SearchMode::Contains,
        }
    }
}
