//! Command handlers for the CLI.

mod run;

pub use run::{RunOptions, cmd_run};
