//! Full report run: load, poll, scrape, assemble, export.

use std::path::PathBuf;

use hostreport_core::config::{HostInventory, expand_path};
use hostreport_core::monitoring::{HostMetrics, SshTransport, extract_all, poll_hosts};
use hostreport_core::report::{ExportOutcome, assemble, export_workbook, scrape_table_space};

use crate::error::CliError;

/// Options for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Inventory file
    pub config: PathBuf,
    /// Output directory override
    pub output_dir: Option<PathBuf>,
    /// Suppress progress lines
    pub quiet: bool,
}

/// Runs the whole pipeline once.
///
/// Unreachable hosts and a failed scrape only degrade the report. The run
/// fails when the config cannot be loaded (before any network activity)
/// or when the workbook cannot be written (after everything else is done).
pub fn cmd_run(options: &RunOptions) -> Result<ExportOutcome, CliError> {
    let config_path = expand_path(&options.config.to_string_lossy());
    let mut inventory = HostInventory::load(&config_path)?;

    if let Some(dir) = &options.output_dir {
        inventory.settings.output_dir = dir.to_string_lossy().into_owned();
    }
    let progress = Progress {
        quiet: options.quiet,
    };

    for reason in &inventory.skipped {
        progress.line(&format!("Skipped: {reason}"));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(format!("Failed to create async runtime: {e}")))?;

    let settings = &inventory.settings;

    progress.line(&format!("Polling {} hosts...", inventory.hosts.len()));
    let transport = SshTransport::new(settings.poll.clone());
    let captures = runtime.block_on(poll_hosts(&transport, &inventory.hosts));
    let metrics = extract_all(&captures);
    for host in &metrics {
        progress.line(&host_summary(host));
    }

    if settings.table_space.url.is_some() {
        progress.line("Scraping table space...");
    }
    let matrix = runtime.block_on(scrape_table_space(&settings.table_space));

    let path = settings.report_path(&chrono::Local::now());
    progress.line(&format!("Writing {}...", path.display()));
    let sheets = assemble(&metrics, matrix).into_sheets();
    let outcome = export_workbook(&path, &sheets)?;

    match &outcome {
        ExportOutcome::Written { path, sheets } => {
            progress.line(&format!(
                "Report written to {} ({})",
                path.display(),
                sheets.join(", ")
            ));
        }
        ExportOutcome::Skipped => progress.line("Nothing to report; no file written"),
    }
    Ok(outcome)
}

/// Progress lines on stdout, silenced by `--quiet`
struct Progress {
    quiet: bool,
}

impl Progress {
    fn line(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }
}

/// One line per host: name, address, and the headline figures
fn host_summary(host: &HostMetrics) -> String {
    let r = &host.record;
    let pct = |v: &Option<String>| v.as_deref().unwrap_or("-").to_string();
    format!(
        "  {} ({}): disk {}, mem {}, cpu {}, {}",
        host.name,
        host.address,
        pct(&r.disk_usage_pct),
        pct(&r.mem_usage_pct),
        pct(&r.cpu_usage_pct),
        r.hardware_health
    )
}
