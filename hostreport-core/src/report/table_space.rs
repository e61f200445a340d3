//! Database table-space matrix
//!
//! Fetches an HTML page holding one row per (site, scheme) pair and pivots
//! it into a site-by-scheme matrix of used percentages. Rows always follow
//! the configured site list, so a site missing from the page is an empty
//! row rather than a dropped one.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use tracing::Instrument;

use crate::config::TableSpaceSettings;
use crate::error::{ReportError, ScrapeError};
use crate::tracing::span_names;

/// One site row of the matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpaceRow {
    /// Site name
    pub site: String,
    /// Used percentage per scheme, aligned with [`TableSpaceMatrix::schemes`]
    pub values: Vec<Option<String>>,
}

/// Site-by-scheme table-space usage
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSpaceMatrix {
    /// Scheme names, sorted
    pub schemes: Vec<String>,
    /// One row per canonical site, in canonical order
    pub rows: Vec<TableSpaceRow>,
}

impl TableSpaceMatrix {
    /// A matrix with the canonical rows and no scheme columns
    #[must_use]
    pub fn empty(sites: &[String]) -> Self {
        Self {
            schemes: Vec::new(),
            rows: sites
                .iter()
                .map(|site| TableSpaceRow {
                    site: site.clone(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    /// True when there is nothing to put in a sheet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty() || self.rows.is_empty()
    }

    /// Value for a site and scheme, if present
    #[must_use]
    pub fn get(&self, site: &str, scheme: &str) -> Option<&str> {
        let col = self.schemes.iter().position(|s| s == scheme)?;
        self.rows
            .iter()
            .find(|r| r.site == site)?
            .values
            .get(col)?
            .as_deref()
    }
}

/// Fetches and pivots the configured page.
///
/// Never fails: without a configured URL, or on any request or parse
/// failure, the matrix is empty and a log line says why.
pub async fn scrape_table_space(settings: &TableSpaceSettings) -> TableSpaceMatrix {
    let Some(url) = settings.url.as_deref() else {
        tracing::info!("No table-space URL configured; skipping scrape");
        return TableSpaceMatrix::empty(&settings.sites);
    };

    let span = crate::trace_operation!(span_names::TABLE_SPACE_SCRAPE, url = %url);
    let result = async {
        let page = fetch_page(url, settings).await?;
        parse_table_space(&page, settings)
    }
    .instrument(span)
    .await;

    match result {
        Ok(matrix) => {
            tracing::info!(
                schemes = matrix.schemes.len(),
                sites = matrix.rows.len(),
                "Table-space matrix built"
            );
            matrix
        }
        Err(source) => {
            let err = ReportError::ScrapeFailed(source);
            tracing::warn!(error = %err, "Table-space sheet will be empty");
            TableSpaceMatrix::empty(&settings.sites)
        }
    }
}

async fn fetch_page(url: &str, settings: &TableSpaceSettings) -> Result<String, ScrapeError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
        .build()
        .map_err(|e| ScrapeError::Request(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| ScrapeError::Request(e.to_string()))?;

    // a charset in Content-Type wins over the configured one
    response
        .text_with_charset(&settings.encoding)
        .await
        .map_err(|e| ScrapeError::Request(e.to_string()))
}

/// Parses and pivots the first table of an HTML page.
///
/// The header is the last row made only of `th` cells; the rows after it
/// are data rows whose first cell names the site. The final data row is a
/// summary and is dropped.
///
/// # Errors
///
/// Returns [`ScrapeError::NoTable`] when the page has no table,
/// [`ScrapeError::MissingColumn`] when a pivot column is absent from the
/// header, and [`ScrapeError::DuplicateEntry`] when a site lists the same
/// scheme twice.
pub fn parse_table_space(
    html: &str,
    settings: &TableSpaceSettings,
) -> Result<TableSpaceMatrix, ScrapeError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").expect("table is a valid selector");
    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ScrapeError::NoTable)?;

    let grid = expand_grid(table);
    let header_idx = grid
        .iter()
        .take_while(|row| row.all_header)
        .count()
        .saturating_sub(1);
    let header = grid.get(header_idx).ok_or(ScrapeError::NoTable)?;

    let column = |name: &str| {
        header
            .cells
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ScrapeError::MissingColumn(name.to_string()))
    };
    let scheme_col = column(&settings.scheme_column)?;
    let value_col = column(&settings.value_column)?;

    let mut data: Vec<&GridRow> = grid[header_idx + 1..]
        .iter()
        .filter(|row| !row.all_header)
        .collect();
    data.pop();

    let mut schemes = BTreeSet::new();
    let mut entries: HashMap<(&str, &str), Option<String>> = HashMap::new();

    for row in data {
        let (Some(site), Some(scheme)) = (row.cells.first(), row.cells.get(scheme_col)) else {
            continue;
        };
        if site.is_empty() || scheme.is_empty() {
            tracing::debug!(cells = ?row.cells, "Skipping table-space row without site or scheme");
            continue;
        }
        let value = row.cells.get(value_col).filter(|v| !v.is_empty()).cloned();
        if entries.insert((site.as_str(), scheme.as_str()), value).is_some() {
            return Err(ScrapeError::DuplicateEntry {
                site: site.clone(),
                scheme: scheme.clone(),
            });
        }
        schemes.insert(scheme.as_str());
    }

    let schemes: Vec<String> = schemes.into_iter().map(ToString::to_string).collect();
    let rows = settings
        .sites
        .iter()
        .map(|site| TableSpaceRow {
            site: site.clone(),
            values: schemes
                .iter()
                .map(|scheme| {
                    entries
                        .get(&(site.as_str(), scheme.as_str()))
                        .cloned()
                        .flatten()
                })
                .collect(),
        })
        .collect();

    Ok(TableSpaceMatrix { schemes, rows })
}

/// A table row with `rowspan`/`colspan` expanded
#[derive(Debug)]
struct GridRow {
    cells: Vec<String>,
    all_header: bool,
}

fn expand_grid(table: ElementRef<'_>) -> Vec<GridRow> {
    let row_selector = Selector::parse("tr").expect("tr is a valid selector");
    // (text, rows still covered) per column, carried down by rowspan
    let mut carried: Vec<Option<(String, usize)>> = Vec::new();
    let mut grid = Vec::new();

    for tr in table.select(&row_selector) {
        let own: Vec<ElementRef<'_>> = tr
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "th" | "td"))
            .collect();
        if own.is_empty() {
            continue;
        }
        let all_header = own.iter().all(|e| e.value().name() == "th");

        let mut cells = Vec::new();
        let mut own_cells = own.into_iter();
        loop {
            let col = cells.len();
            if let Some(Some((text, remaining))) = carried.get_mut(col) {
                cells.push(text.clone());
                *remaining -= 1;
                if *remaining == 0 {
                    carried[col] = None;
                }
                continue;
            }
            let Some(cell) = own_cells.next() else {
                // spans reaching past this row's own cells
                if carried.iter().skip(col).any(Option::is_some) {
                    cells.push(String::new());
                    continue;
                }
                break;
            };
            let text = cell_text(cell);
            let colspan = span_attr(cell, "colspan", MAX_COLSPAN);
            let rowspan = span_attr(cell, "rowspan", MAX_ROWSPAN);
            for _ in 0..colspan {
                let col = cells.len();
                if rowspan > 1 {
                    if carried.len() <= col {
                        carried.resize(col + 1, None);
                    }
                    carried[col] = Some((text.clone(), rowspan - 1));
                }
                cells.push(text.clone());
            }
        }

        grid.push(GridRow { cells, all_header });
    }
    grid
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Largest `colspan` HTML honours
const MAX_COLSPAN: usize = 1000;
/// Largest `rowspan` HTML honours
const MAX_ROWSPAN: usize = 65534;

fn span_attr(cell: ElementRef<'_>, name: &str, max: usize) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}
