pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Headlines, news search and a saved-articles list", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/newsdesk/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Saved articles database
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Treat the network as unreachable
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show top headlines
    Headlines {
        /// Region code, e.g. "us" or "gb"
        #[arg(long)]
        country: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Save the result with this number
        #[arg(long)]
        save: Option<usize>,
    },
    /// Search all articles
    Search {
        /// Search keywords
        term: String,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Save the result with this number
        #[arg(long)]
        save: Option<usize>,
    },
    /// Search interactively, one query per line
    Prompt,
    /// List saved articles
    Saved,
    /// Remove a saved article
    Remove {
        /// URL of the saved article
        url: String,
    },
}
