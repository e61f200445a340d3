//! Workbook export
//!
//! Writes named sheets into a single `.xlsx` file with `rust_xlsxwriter`.
//! Sheets without data are left out, and when nothing is left no file is
//! written at all.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};

use crate::error::ExportError;
use crate::tracing::span_names;

/// One worksheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Blank cell
    Empty,
    /// String cell
    Text(String),
    /// Numeric cell
    Number(f64),
}

impl Cell {
    /// Text cell, or [`Cell::Empty`] for an empty string
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }
}

impl From<Option<u64>> for Cell {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Empty, |n| Self::Number(n as f64))
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Empty, Self::text)
    }
}

/// A named table ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Worksheet name
    pub name: String,
    /// Column titles (bold first row)
    pub header: Vec<String>,
    /// Data rows
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates a sheet from a header and rows
    #[must_use]
    pub fn new(name: impl Into<String>, header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            header,
            rows,
        }
    }

    /// A sheet with no rows has nothing to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What [`export_workbook`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The workbook was written
    Written {
        /// File path
        path: PathBuf,
        /// Names of the sheets written, in order
        sheets: Vec<String>,
    },
    /// Every sheet was empty; no file was created
    Skipped,
}

/// Writes the non-empty sheets to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the output directory cannot be created and
/// [`ExportError::Xlsx`] if a sheet name is invalid or the file cannot be
/// saved.
pub fn export_workbook(path: &Path, sheets: &[Sheet]) -> Result<ExportOutcome, ExportError> {
    let _span = crate::trace_operation!(
        span_names::REPORT_EXPORT,
        path = %path.display()
    )
    .entered();

    let sheets: Vec<&Sheet> = sheets
        .iter()
        .filter(|sheet| {
            if sheet.is_empty() {
                tracing::info!(sheet = %sheet.name, "Omitting empty sheet");
            }
            !sheet.is_empty()
        })
        .collect();

    if sheets.is_empty() {
        tracing::warn!("All sheets are empty; no workbook written");
        return Ok(ExportOutcome::Skipped);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in &sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, title) in (0u16..).zip(&sheet.header) {
            worksheet.write_string_with_format(0, col, title, &bold)?;
        }
        for (row, cells) in (1u32..).zip(&sheet.rows) {
            for (col, cell) in (0u16..).zip(cells) {
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        worksheet.write_string(row, col, s)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(row, col, *n)?;
                    }
                }
            }
        }
        worksheet.autofit();
    }

    workbook.save(path)?;

    let names: Vec<String> = sheets.iter().map(|s| s.name.clone()).collect();
    tracing::info!(sheets = ?names, "Workbook written");
    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        sheets: names,
    })
}
