//! `hostreport` Core Library
//!
//! Polls a fleet of hosts over SSH, extracts disk, memory, CPU, model, and
//! hardware-health metrics from the captured command output, and assembles
//! them with a scraped database table-space matrix into one workbook.
//!
//! # Crate Structure
//!
//! - [`config`] - Host inventory and run settings (`config.toml`)
//! - [`monitoring`] - SSH transport, sequential poller, metric extraction
//! - [`report`] - Table assembly, table-space scraping, xlsx export
//! - [`error`] - Per-stage error enums and the run-level [`ReportError`]
//! - [`tracing`] - Subscriber setup and span names

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod monitoring;
pub mod report;
pub mod tracing;

pub use config::{HostCredential, HostInventory, ReportSettings, TableSpaceSettings};
pub use error::{
    ConfigError, ConfigResult, ExportError, ReportError, ScrapeError, TransportError,
};
pub use monitoring::{
    CommandTransport, HardwareHealth, HostMetrics, MetricRecord, MetricsParser, PollSettings,
    RawCapture, SshTransport, extract_all, poll_hosts,
};
pub use report::{
    ExportOutcome, ReportBook, Sheet, TableSpaceMatrix, assemble, export_workbook,
    scrape_table_space,
};
pub use crate::tracing::{TracingConfig, TracingLevel, TracingOutput, init_tracing};
