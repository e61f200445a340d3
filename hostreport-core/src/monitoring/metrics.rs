//! Data models for extracted host metrics
//!
//! Every metric is optional: a field whose source line was not found in the
//! captured text stays `None`, so a missing reading is never confused with a
//! genuine zero further down the pipeline.

use std::fmt;

use serde::Serialize;

/// Hardware health outcome derived from the health section of a capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HardwareHealth {
    /// No anomaly and at least one sensor reported `ok`
    Healthy,
    /// Nothing was captured from the host
    Unreachable,
    /// No anomaly, but no sensor reported `ok` either (tooling likely absent)
    UnknownNoData,
    /// One or more anomalies, in the order they were found
    Degraded(Vec<String>),
}

impl fmt::Display for HardwareHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unreachable => write!(f, "unreachable"),
            Self::UnknownNoData => write!(f, "unknown-no-sensor-data"),
            Self::Degraded(reasons) => write!(f, "degraded: {}", reasons.join("; ")),
        }
    }
}

/// Raw output captured from one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture {
    /// Host display name (config section name)
    pub name: String,
    /// Address the capture was taken from
    pub address: String,
    /// Captured stdout; empty when the host could not be polled
    pub text: String,
}

impl RawCapture {
    /// Creates a capture that records a polling failure
    #[must_use]
    pub fn failed(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            text: String::new(),
        }
    }

    /// Returns `true` when nothing usable was captured
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Normalized metrics for one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRecord {
    /// Manufacturer and product name; empty when neither is known
    pub model: String,
    /// Total disk space (GB)
    pub disk_total_gb: Option<u64>,
    /// Used disk space (GB)
    pub disk_used_gb: Option<u64>,
    /// Disk usage as reported by `df`, e.g. `"53%"`
    pub disk_usage_pct: Option<String>,
    /// Total memory (MB)
    pub mem_total_mb: Option<u64>,
    /// Used memory excluding buffers and cache (MB)
    pub mem_used_mb: Option<u64>,
    /// Memory usage, one decimal place, e.g. `"37.5%"`
    pub mem_usage_pct: Option<String>,
    /// CPU usage (100 - idle), one decimal place
    pub cpu_usage_pct: Option<String>,
    /// Hardware health outcome
    pub hardware_health: HardwareHealth,
}

impl MetricRecord {
    /// Record for a host that produced no output
    #[must_use]
    pub const fn unreachable() -> Self {
        Self {
            model: String::new(),
            disk_total_gb: None,
            disk_used_gb: None,
            disk_usage_pct: None,
            mem_total_mb: None,
            mem_used_mb: None,
            mem_usage_pct: None,
            cpu_usage_pct: None,
            hardware_health: HardwareHealth::Unreachable,
        }
    }
}

/// Disk summary line from `df --total`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    /// Total size (GB)
    pub total_gb: u64,
    /// Used size (GB)
    pub used_gb: u64,
    /// Usage token including the `%` sign
    pub percent: String,
}

/// Formats a percentage with one decimal place and a trailing `%`
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}
