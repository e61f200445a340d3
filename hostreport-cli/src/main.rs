//! `hostreport` - monthly server report generator
//!
//! Polls every host in the inventory over SSH, scrapes the database
//! table-space page, and writes one xlsx workbook.

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::Cli;
use hostreport_core::tracing::{TracingConfig, TracingLevel, init_tracing};

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        TracingLevel::Error
    } else {
        TracingLevel::from_verbosity(cli.verbose)
    };
    if let Err(e) = init_tracing(&TracingConfig::new().with_level(level)) {
        eprintln!("Warning: {e}");
    }

    let options = commands::RunOptions {
        config: cli.config,
        output_dir: cli.output_dir,
        quiet: cli.quiet,
    };

    if let Err(e) = commands::cmd_run(&options) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
