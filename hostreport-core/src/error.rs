//! Error types for `hostreport`
//!
//! Each stage of a run owns a narrow error enum. [`ReportError`] groups them
//! into the run-level taxonomy that callers match on to decide whether a
//! failure aborts the run (only an unreadable config does) or degrades a
//! single host, the table-space sheet, or the export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the host inventory
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The config file exists but could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Unreadable {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A host section lacks one of the required keys
    #[error("Section '{section}' is missing required key '{key}'")]
    SectionIncomplete {
        /// Section (host display) name
        section: String,
        /// The missing key
        key: &'static str,
    },

    /// A top-level entry is not a table
    #[error("Entry '{0}' is not a section")]
    NotASection(String),

    /// The `[report]` section has invalid values
    #[error("Invalid report settings: {0}")]
    InvalidSettings(String),
}

/// Errors raised by a remote command transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The local ssh client could not be started
    #[error("Failed to spawn SSH process: {0}")]
    Spawn(String),

    /// The remote command did not finish in time
    #[error("SSH command timed out after {0}s")]
    Timeout(u64),

    /// The session ended without producing any output
    #[error("SSH command produced no output (exit {status}): {stderr}")]
    NoOutput {
        /// Exit status as reported by the ssh client
        status: String,
        /// Trimmed stderr of the ssh client
        stderr: String,
    },
}

/// Errors raised while scraping the table-space page
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP request failed or returned an error status
    #[error("Request failed: {0}")]
    Request(String),

    /// The page contains no `<table>`
    #[error("No table found in page")]
    NoTable,

    /// A pivot column is missing from the header
    #[error("Column '{0}' not found in table header")]
    MissingColumn(String),

    /// The same site/scheme pair appears twice
    #[error("Duplicate entry for site '{site}' and scheme '{scheme}'")]
    DuplicateEntry {
        /// Site (row) name
        site: String,
        /// Scheme (column) name
        scheme: String,
    },
}

/// Errors raised while writing the report workbook
#[derive(Debug, Error)]
pub enum ExportError {
    /// The xlsx writer rejected the workbook
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// IO error while preparing the output location
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run-level error taxonomy
#[derive(Debug, Error)]
pub enum ReportError {
    /// The config file is missing or cannot be parsed; aborts the run
    #[error("Config unreadable: {0}")]
    ConfigUnreadable(ConfigError),

    /// A host section was skipped
    #[error("Section incomplete: {0}")]
    SectionIncomplete(ConfigError),

    /// A host could not be polled
    #[error("Host '{host}' unreachable: {source}")]
    HostUnreachable {
        /// Host display name
        host: String,
        /// Transport failure
        #[source]
        source: TransportError,
    },

    /// The table-space scrape failed
    #[error("Table-space scrape failed: {0}")]
    ScrapeFailed(#[from] ScrapeError),

    /// The workbook could not be written
    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),
}

impl From<ConfigError> for ReportError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::SectionIncomplete { .. } | ConfigError::NotASection(_) => {
                Self::SectionIncomplete(err)
            }
            ConfigError::NotFound(_)
            | ConfigError::Unreadable { .. }
            | ConfigError::Parse(_)
            | ConfigError::InvalidSettings(_) => Self::ConfigUnreadable(err),
        }
    }
}

/// Result type for config loading
pub type ConfigResult<T> = Result<T, ConfigError>;
