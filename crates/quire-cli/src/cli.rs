use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "quire",
    about = "Quire — keep a post cache in sync with a content repository",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Sync config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a content directory into an in-memory repository and reconcile it
    Check(CheckArgs),
    /// Print the effective sync configuration
    Config,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Content directory laid out like the repository
    pub dir: PathBuf,
    /// Author recorded for posts seeded from the directory
    #[arg(long, default_value = "quire")]
    pub author: String,
}
