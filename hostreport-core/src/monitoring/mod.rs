//! Remote host monitoring
//!
//! Runs one composite diagnostic command per host over SSH and extracts
//! disk, memory, CPU, model, and hardware-health metrics from its output.
//!
//! Parsing is pure and never fails: anything that cannot be found stays
//! absent in the resulting [`MetricRecord`].

mod health;
mod metrics;
mod parser;
mod poller;
mod settings;
pub mod ssh_exec;

pub use health::{
    KERNEL_DISK_ALARM, SensorReading, evaluate_health, evaluate_region, sensor_readings,
};
pub use metrics::{DiskUsage, HardwareHealth, MetricRecord, RawCapture, format_percent};
pub use parser::{DIAGNOSTIC_COMMAND, END_MARKER, HEALTH_MARKER, MetricsParser};
pub use poller::{HostMetrics, extract_all, poll_host, poll_hosts};
pub use settings::PollSettings;
pub use ssh_exec::{CommandOutput, CommandTransport, SshTransport};
