//! Report assembly
//!
//! Reshapes per-host metrics into the performance and hardware tables and
//! lays out every table as a [`Sheet`]. Hosts keep config order; nothing is
//! filtered, sorted, or aggregated, so an unreachable host still shows up
//! as a row in both tables.

use super::export::{Cell, Sheet};
use super::table_space::TableSpaceMatrix;
use crate::monitoring::{HardwareHealth, HostMetrics};

/// Name of the performance sheet
pub const PERFORMANCE_SHEET: &str = "Performance";
/// Name of the hardware health sheet
pub const HARDWARE_SHEET: &str = "Hardware Health";
/// Name of the table-space sheet
pub const TABLE_SPACE_SHEET: &str = "Table Space";

const PERFORMANCE_HEADER: [&str; 10] = [
    "Host",
    "Address",
    "Model",
    "Disk Total (GB)",
    "Disk Used (GB)",
    "Disk Usage",
    "Memory Total (MB)",
    "Memory Used (MB)",
    "Memory Usage",
    "CPU Usage",
];

const HARDWARE_HEADER: [&str; 4] = ["Host", "Address", "Model", "Hardware Health"];

/// One row of the performance table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceRow {
    /// Host display name
    pub name: String,
    /// Host address
    pub address: String,
    /// Vendor and product, empty when unknown
    pub model: String,
    /// Total disk in GB
    pub disk_total_gb: Option<u64>,
    /// Used disk in GB
    pub disk_used_gb: Option<u64>,
    /// Disk usage, e.g. `42%`
    pub disk_usage_pct: Option<String>,
    /// Total memory in MB
    pub mem_total_mb: Option<u64>,
    /// Used memory in MB
    pub mem_used_mb: Option<u64>,
    /// Memory usage, e.g. `28.4%`
    pub mem_usage_pct: Option<String>,
    /// CPU usage, e.g. `3.3%`
    pub cpu_usage_pct: Option<String>,
}

impl From<&HostMetrics> for PerformanceRow {
    fn from(m: &HostMetrics) -> Self {
        let r = &m.record;
        Self {
            name: m.name.clone(),
            address: m.address.clone(),
            model: r.model.clone(),
            disk_total_gb: r.disk_total_gb,
            disk_used_gb: r.disk_used_gb,
            disk_usage_pct: r.disk_usage_pct.clone(),
            mem_total_mb: r.mem_total_mb,
            mem_used_mb: r.mem_used_mb,
            mem_usage_pct: r.mem_usage_pct.clone(),
            cpu_usage_pct: r.cpu_usage_pct.clone(),
        }
    }
}

impl PerformanceRow {
    fn into_cells(self) -> Vec<Cell> {
        vec![
            Cell::text(self.name),
            Cell::text(self.address),
            Cell::text(self.model),
            self.disk_total_gb.into(),
            self.disk_used_gb.into(),
            self.disk_usage_pct.into(),
            self.mem_total_mb.into(),
            self.mem_used_mb.into(),
            self.mem_usage_pct.into(),
            self.cpu_usage_pct.into(),
        ]
    }
}

/// One row of the hardware table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareRow {
    /// Host display name
    pub name: String,
    /// Host address
    pub address: String,
    /// Vendor and product, empty when unknown
    pub model: String,
    /// Health classification
    pub health: HardwareHealth,
}

impl From<&HostMetrics> for HardwareRow {
    fn from(m: &HostMetrics) -> Self {
        Self {
            name: m.name.clone(),
            address: m.address.clone(),
            model: m.record.model.clone(),
            health: m.record.hardware_health.clone(),
        }
    }
}

/// All tables of one report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportBook {
    /// Performance rows, config order
    pub performance: Vec<PerformanceRow>,
    /// Hardware rows, config order
    pub hardware: Vec<HardwareRow>,
    /// Table-space matrix
    pub table_space: TableSpaceMatrix,
}

/// Builds the report tables from extracted metrics and the scraped matrix
#[must_use]
pub fn assemble(metrics: &[HostMetrics], table_space: TableSpaceMatrix) -> ReportBook {
    ReportBook {
        performance: metrics.iter().map(PerformanceRow::from).collect(),
        hardware: metrics.iter().map(HardwareRow::from).collect(),
        table_space,
    }
}

impl ReportBook {
    /// Lays the tables out as sheets, in workbook order.
    ///
    /// A table-space matrix without scheme columns becomes a sheet with no
    /// rows, which the exporter omits.
    #[must_use]
    pub fn into_sheets(self) -> Vec<Sheet> {
        let performance = Sheet::new(
            PERFORMANCE_SHEET,
            header(&PERFORMANCE_HEADER),
            self.performance
                .into_iter()
                .map(PerformanceRow::into_cells)
                .collect(),
        );

        let hardware = Sheet::new(
            HARDWARE_SHEET,
            header(&HARDWARE_HEADER),
            self.hardware
                .into_iter()
                .map(|row| {
                    vec![
                        Cell::text(row.name),
                        Cell::text(row.address),
                        Cell::text(row.model),
                        Cell::text(row.health.to_string()),
                    ]
                })
                .collect(),
        );

        let matrix = self.table_space;
        let table_space = if matrix.is_empty() {
            Sheet::new(TABLE_SPACE_SHEET, Vec::new(), Vec::new())
        } else {
            let mut columns = vec!["Site".to_string()];
            columns.extend(matrix.schemes.iter().cloned());
            let rows = matrix
                .rows
                .into_iter()
                .map(|row| {
                    let mut cells = vec![Cell::text(row.site)];
                    cells.extend(row.values.into_iter().map(Cell::from));
                    cells
                })
                .collect();
            Sheet::new(TABLE_SPACE_SHEET, columns, rows)
        };

        vec![performance, hardware, table_space]
    }
}

fn header(titles: &[&str]) -> Vec<String> {
    titles.iter().map(ToString::to_string).collect()
}
