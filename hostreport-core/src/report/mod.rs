//! Report assembly, table-space scraping, and workbook export

mod assembler;
mod export;
mod table_space;

pub use assembler::{
    HARDWARE_SHEET, HardwareRow, PERFORMANCE_SHEET, PerformanceRow, ReportBook, TABLE_SPACE_SHEET,
    assemble,
};
pub use export::{Cell, ExportOutcome, Sheet, export_workbook};
pub use table_space::{TableSpaceMatrix, TableSpaceRow, parse_table_space, scrape_table_space};
