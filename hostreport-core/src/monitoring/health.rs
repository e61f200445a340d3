//! Hardware health classification
//!
//! The health section of a capture holds `ipmitool sdr` output (one
//! `name | reading | status` line per sensor) followed by any kernel log
//! lines mentioning disk faults. Resolution order:
//!
//! 1. any anomaly -> [`HardwareHealth::Degraded`]
//! 2. no sensor reported `ok` -> [`HardwareHealth::UnknownNoData`]
//! 3. otherwise -> [`HardwareHealth::Healthy`]

use super::metrics::HardwareHealth;
use super::parser::{END_MARKER, HEALTH_MARKER, section_until};

/// Anomaly label appended when the kernel log reports disk faults
pub const KERNEL_DISK_ALARM: &str = "kernel:disk-alarm";

/// Sensor statuses that are not anomalies (compared case-insensitively)
const NON_ANOMALY_STATUSES: [&str; 3] = ["ok", "ns", "not readable"];

/// Kernel log fragments that indicate a disk fault (lowercase)
const DISK_FAULT_KEYWORDS: [&str; 3] = ["i/o error", "disk error", "failed"];

/// One pipe-delimited sensor line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading<'a> {
    /// Sensor name (first field)
    pub name: &'a str,
    /// Sensor status (third field)
    pub status: &'a str,
}

impl SensorReading<'_> {
    fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }

    fn is_anomaly(&self) -> bool {
        !NON_ANOMALY_STATUSES
            .iter()
            .any(|s| self.status.eq_ignore_ascii_case(s))
    }
}

/// Parses the sensor lines of a health region.
///
/// Lines with fewer than three `|`-separated fields, or with a blank status,
/// are not sensor lines.
pub fn sensor_readings(region: &str) -> impl Iterator<Item = SensorReading<'_>> {
    region.lines().filter_map(|line| {
        let mut fields = line.split('|').map(str::trim);
        let name = fields.next()?;
        let _reading = fields.next()?;
        let status = fields.next()?;
        if status.is_empty() {
            return None;
        }
        Some(SensorReading { name, status })
    })
}

/// Classifies a capture's hardware health.
///
/// When the health marker is missing the host is reported healthy; a
/// truncated capture is indistinguishable from a clean one here.
#[must_use]
pub fn evaluate_health(output: &str) -> HardwareHealth {
    section_until(output, HEALTH_MARKER, END_MARKER)
        .map_or(HardwareHealth::Healthy, evaluate_region)
}

/// Classifies the text of a health region
#[must_use]
pub fn evaluate_region(region: &str) -> HardwareHealth {
    let mut anomalies = Vec::new();
    let mut any_ok = false;

    for reading in sensor_readings(region) {
        if reading.is_ok() {
            any_ok = true;
        } else if reading.is_anomaly() {
            anomalies.push(format!("{}:{}", reading.name, reading.status));
        }
    }

    let lowered = region.to_lowercase();
    if DISK_FAULT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        anomalies.push(KERNEL_DISK_ALARM.to_string());
    }

    if !anomalies.is_empty() {
        HardwareHealth::Degraded(anomalies)
    } else if !any_ok {
        HardwareHealth::UnknownNoData
    } else {
        HardwareHealth::Healthy
    }
}
