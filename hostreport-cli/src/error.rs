//! CLI error types and exit codes.

use hostreport_core::error::{ConfigError, ExportError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// Config unreadable, export failed, or the runtime could not start
    pub const GENERAL_ERROR: i32 = 1;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The config file is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The workbook could not be written
    #[error("Export error: {0}")]
    Export(String),

    /// The async runtime could not be created
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ExportError> for CliError {
    fn from(err: ExportError) -> Self {
        Self::Export(err.to_string())
    }
}

impl CliError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Export(_) | Self::Runtime(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
