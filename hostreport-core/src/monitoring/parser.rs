//! Parser for the diagnostic command output
//!
//! [`DIAGNOSTIC_COMMAND`] prints `df`, `free`, `top`, `dmidecode` and
//! `ipmitool` output between marker lines. Hosts differ in which of those
//! tools exist and which variant of each is installed, so every metric is
//! read through an ordered chain of patterns where the first one that yields
//! a value wins. A missing tool simply leaves its metric empty.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::health::evaluate_health;
use super::metrics::{DiskUsage, MetricRecord, format_percent};

/// Marker preceding the health section
pub const HEALTH_MARKER: &str = "---HEALTH---";

/// Marker closing the capture
pub const END_MARKER: &str = "---END---";

/// Shell command that collects every section in a single invocation.
///
/// Each tool is guarded inline so a missing binary produces an empty
/// section instead of aborting the command. The locale is pinned to `C`
/// so `df` prints `total` and `free` prints `Mem:` whatever `LANG` the
/// SSH client forwards.
pub const DIAGNOSTIC_COMMAND: &str = concat!(
    "export LC_ALL=C;",
    "echo '---DISK---';",
    "if [ -x /usr/local/bin/df ]; then DF=/usr/local/bin/df; else DF=df; fi;",
    "$DF -h --block-size=1G --total 2>/dev/null | grep '^total';",
    "echo '---MEM---';",
    "free -m 2>/dev/null;",
    "echo '---CPU---';",
    "top -bn1 2>/dev/null | grep -iE '^%?cpu' | head -1;",
    "echo '---MODEL---';",
    "if dmidecode -t system >/dev/null 2>&1; then ",
    "dmidecode -t system 2>/dev/null | grep -E 'Manufacturer:|Product Name:'; ",
    "else ",
    "echo \"Manufacturer: $(cat /sys/class/dmi/id/sys_vendor 2>/dev/null)\"; ",
    "echo \"Product Name: $(cat /sys/class/dmi/id/product_name 2>/dev/null)\"; ",
    "fi;",
    "echo '---HEALTH---';",
    "if command -v ipmitool >/dev/null 2>&1; then ipmitool sdr 2>/dev/null; fi;",
    "dmesg 2>/dev/null | grep -E 'sd[a-z]|nvme|ata[0-9]|blk_|md[0-9]' ",
    "| grep -iE 'i/o error|disk error|failed' | tail -n 5;",
    "echo '---END---'",
);

/// Model values that firmware or the OS fill in when nothing real is known
const MODEL_PLACEHOLDERS: [&str; 4] = [
    "empty",
    "unknown",
    "to be filled by o.e.m.",
    "system product name",
];

static DISK_TOTAL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*total[ \t]+(\d+)G?[ \t]+(\d+)G?[ \t]+\d+G?[ \t]+(\d{1,3}(?:\.\d+)?%)")
        .expect("DISK_TOTAL_LINE_RE is a valid regex pattern")
});

static MEM_TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Mem:[ \t]+(\d+)").expect("MEM_TOTAL_RE is a valid regex pattern")
});

static MEM_EFFECTIVE_USED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*-/\+[ \t]*buffers/cache:[ \t]+(\d+)")
        .expect("MEM_EFFECTIVE_USED_RE is a valid regex pattern")
});

static MEM_SIX_COLUMN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Mem:[ \t]+(\d+)[ \t]+(\d+)[ \t]+(\d+)[ \t]+(\d+)[ \t]+(\d+)[ \t]+(\d+)")
        .expect("MEM_SIX_COLUMN_RE is a valid regex pattern")
});

static CPU_IDLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)[ \t]*%?[ \t]*id(?:le)?\b")
        .expect("CPU_IDLE_RE is a valid regex pattern")
});

static MANUFACTURER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*Manufacturer:[ \t]*(.*)$")
        .expect("MANUFACTURER_RE is a valid regex pattern")
});

static PRODUCT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*Product Name:[ \t]*(.*)$")
        .expect("PRODUCT_NAME_RE is a valid regex pattern")
});

/// One way of reading a metric: a pattern and what to do with its captures.
struct Strategy<T> {
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
    extract: fn(&Captures<'_>) -> Option<T>,
}

impl<T> Strategy<T> {
    fn apply(&self, output: &str) -> Option<T> {
        self.pattern
            .captures(output)
            .and_then(|caps| (self.extract)(&caps))
    }
}

/// Runs a chain in order and returns the first value produced
fn first_match<T>(output: &str, chain: &[Strategy<T>]) -> Option<T> {
    chain.iter().find_map(|strategy| {
        let value = strategy.apply(output);
        if value.is_some() {
            tracing::trace!(strategy = strategy.name, "Pattern matched");
        }
        value
    })
}

fn capture_u64<const N: usize>(caps: &Captures<'_>) -> Option<u64> {
    caps.get(N)?.as_str().parse().ok()
}

fn capture_f64<const N: usize>(caps: &Captures<'_>) -> Option<f64> {
    caps.get(N)?.as_str().parse().ok()
}

fn disk_from_summary(caps: &Captures<'_>) -> Option<DiskUsage> {
    Some(DiskUsage {
        total_gb: capture_u64::<1>(caps)?,
        used_gb: capture_u64::<2>(caps)?,
        percent: caps.get(3)?.as_str().to_string(),
    })
}

/// `Mem: total used free shared buffers cache`
///
/// Buffers and cache are only subtracted when that leaves a positive
/// figure; newer `free` already excludes them from `used`.
fn used_from_six_columns(caps: &Captures<'_>) -> Option<u64> {
    let used = capture_u64::<2>(caps)?;
    let buffers = capture_u64::<5>(caps)?;
    let cache = capture_u64::<6>(caps)?;
    let reclaimable = buffers.checked_add(cache)?;
    Some(if used > reclaimable {
        used - reclaimable
    } else {
        used
    })
}

fn model_half(caps: &Captures<'_>) -> Option<String> {
    let value = caps.get(1)?.as_str().trim();
    if value.is_empty()
        || MODEL_PLACEHOLDERS
            .iter()
            .any(|p| value.eq_ignore_ascii_case(p))
    {
        return None;
    }
    Some(value.to_string())
}

static DISK_CHAIN: [Strategy<DiskUsage>; 1] = [Strategy {
    name: "df-total",
    pattern: &DISK_TOTAL_LINE_RE,
    extract: disk_from_summary,
}];

static MEM_TOTAL_CHAIN: [Strategy<u64>; 1] = [Strategy {
    name: "free-total",
    pattern: &MEM_TOTAL_RE,
    extract: capture_u64::<1>,
}];

static MEM_USED_CHAIN: [Strategy<u64>; 2] = [
    Strategy {
        name: "free-buffers-cache",
        pattern: &MEM_EFFECTIVE_USED_RE,
        extract: capture_u64::<1>,
    },
    Strategy {
        name: "free-six-column",
        pattern: &MEM_SIX_COLUMN_RE,
        extract: used_from_six_columns,
    },
];

static CPU_IDLE_CHAIN: [Strategy<f64>; 1] = [Strategy {
    name: "top-idle",
    pattern: &CPU_IDLE_RE,
    extract: capture_f64::<1>,
}];

static MANUFACTURER_CHAIN: [Strategy<String>; 1] = [Strategy {
    name: "dmi-manufacturer",
    pattern: &MANUFACTURER_RE,
    extract: model_half,
}];

static PRODUCT_NAME_CHAIN: [Strategy<String>; 1] = [Strategy {
    name: "dmi-product-name",
    pattern: &PRODUCT_NAME_RE,
    extract: model_half,
}];

/// Returns the text after `start` up to `end`, or up to the end of the
/// output when `end` does not follow.
pub(crate) fn section_until<'a>(output: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let start_idx = output.find(start).map(|i| i + start.len())?;
    let rest = &output[start_idx..];
    let end_idx = rest.find(end).unwrap_or(rest.len());
    Some(rest[..end_idx].trim())
}

/// Stateless parser for diagnostic command output
pub struct MetricsParser;

impl MetricsParser {
    /// Extracts a [`MetricRecord`] from the output of [`DIAGNOSTIC_COMMAND`].
    ///
    /// Never fails: empty output yields [`MetricRecord::unreachable`], and
    /// any field whose pattern is not found stays empty.
    #[must_use]
    pub fn parse(output: &str) -> MetricRecord {
        if output.trim().is_empty() {
            return MetricRecord::unreachable();
        }

        let disk = first_match(output, &DISK_CHAIN);
        let mem_total_mb = first_match(output, &MEM_TOTAL_CHAIN);
        let mem_used_mb = first_match(output, &MEM_USED_CHAIN);

        MetricRecord {
            model: Self::parse_model(output),
            disk_total_gb: disk.as_ref().map(|d| d.total_gb),
            disk_used_gb: disk.as_ref().map(|d| d.used_gb),
            disk_usage_pct: disk.map(|d| d.percent),
            mem_total_mb,
            mem_used_mb,
            mem_usage_pct: Self::usage_percent(mem_used_mb, mem_total_mb),
            cpu_usage_pct: first_match(output, &CPU_IDLE_CHAIN).and_then(Self::cpu_from_idle),
            hardware_health: evaluate_health(output),
        }
    }

    /// Joins the manufacturer and product name that are not placeholders
    fn parse_model(output: &str) -> String {
        [
            first_match(output, &MANUFACTURER_CHAIN),
            first_match(output, &PRODUCT_NAME_CHAIN),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// `used / total * 100`; empty when either side is missing or total is 0
    fn usage_percent(used: Option<u64>, total: Option<u64>) -> Option<String> {
        let (used, total) = (used?, total?);
        if total == 0 {
            return None;
        }
        let pct = used as f64 / total as f64 * 100.0;
        pct.is_finite().then(|| format_percent(pct))
    }

    fn cpu_from_idle(idle: f64) -> Option<String> {
        let busy = 100.0 - idle;
        busy.is_finite().then(|| format_percent(busy))
    }
}
