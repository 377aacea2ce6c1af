use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Debug, Parser)]
#[command(name = "manual")]
#[command(version)]
#[command(about = "Collects knowledge-base articles and compiles them into one HTML manual", long_about = None)]
pub struct Cli {
    /// Configuration file (RON)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Store file, overriding `store_path` from the configuration
    #[arg(long, value_name = "FILE", global = true)]
    pub store: Option<PathBuf>,

    /// More log output; repeat for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture the article at URL with its matching source
    Capture {
        url: String,
        /// Read the page from a saved file instead of fetching it
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,
    },
    /// Capture every article linked from a source's index page, or only the
    /// pages given with --url
    Harvest {
        /// Source name, as shown by `sources list`
        profile: String,
        /// Page to capture instead of discovering links; repeatable
        #[arg(long = "url", value_name = "URL")]
        urls: Vec<String>,
    },
    /// Build the manual from all stored articles
    Generate {
        /// Also write the manual to FILE
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Write the last generated manual to disk
    Download {
        #[arg(long, value_name = "FILE", default_value = manual_engine::MANUAL_FILENAME)]
        out: PathBuf,
    },
    /// Remove all stored articles
    Clear,
    /// List stored articles
    Articles,
    /// Inspect or change the source configuration
    #[command(subcommand)]
    Sources(SourcesCommand),
    /// Show the activity log, newest first
    Logs {
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SourcesCommand {
    /// Show the active source configuration
    List,
    /// Print the built-in sources as JSON
    Defaults,
    /// Replace the sources with a JSON array read from FILE
    Import { file: PathBuf },
    /// Restore the built-in sources
    Reset,
}
