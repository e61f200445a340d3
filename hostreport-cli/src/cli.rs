//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::Parser;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Polls every configured host and writes the monthly server report
#[derive(Parser)]
#[command(name = "hostreport")]
#[command(author, version, about = "Monthly server performance and hardware report")]
pub struct Cli {
    /// Path to the host inventory
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Directory for the report (overrides `[report] output_dir`)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
