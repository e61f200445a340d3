//! Run settings stored in the reserved `[report]` section

use std::path::PathBuf;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::monitoring::PollSettings;

/// Name of the config section that holds [`ReportSettings`] instead of a host
pub const RESERVED_SECTION: &str = "report";

/// Canonical site order of the table-space sheet
pub const DEFAULT_SITES: [&str; 9] = [
    "主库",
    "备份库",
    "泰安地震监测中心站",
    "烟台地震监测中心站",
    "聊城地震监测中心站",
    "菏泽地震监测中心站",
    "潍坊地震监测中心站",
    "临沂地震监测中心站",
    "青岛地震监测中心站",
];

/// Expands a leading `~` in a user-supplied path
#[must_use]
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Settings for one report run (`[report]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Directory the workbook is written to (default: current directory)
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Workbook file name prefix; the year and month are appended
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// SSH polling settings (`[report.poll]`)
    #[serde(default)]
    pub poll: PollSettings,
    /// Table-space scrape settings (`[report.table_space]`)
    #[serde(default)]
    pub table_space: TableSpaceSettings,
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_file_prefix() -> String {
    "server_monthly_report".to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            poll: PollSettings::default(),
            table_space: TableSpaceSettings::default(),
        }
    }
}

impl ReportSettings {
    /// Output directory with `~` expanded
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        expand_path(&self.output_dir)
    }

    /// Workbook path for a run at `now`, e.g. `server_monthly_report_202610.xlsx`
    #[must_use]
    pub fn report_path<Tz>(&self, now: &DateTime<Tz>) -> PathBuf
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.output_dir()
            .join(format!("{}_{}.xlsx", self.file_prefix, now.format("%Y%m")))
    }

    /// Checks values serde cannot check
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] for an empty or path-like
    /// file prefix, or a table-space URL that is not HTTP(S).
    pub fn validate(&self) -> ConfigResult<()> {
        if self.file_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidSettings(
                "report.file_prefix must be non-empty".into(),
            ));
        }
        if self.file_prefix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidSettings(format!(
                "report.file_prefix must not contain path separators, got '{}'",
                self.file_prefix
            )));
        }
        if let Some(url) = &self.table_space.url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidSettings(format!(
                "report.table_space.url must be an http(s) URL, got '{url}'"
            )));
        }
        Ok(())
    }
}

/// Where and how to scrape the table-space page (`[report.table_space]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpaceSettings {
    /// Page URL; when unset the table-space sheet is skipped
    #[serde(default)]
    pub url: Option<String>,
    /// Charset used when the server does not declare one
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Header of the column whose values become sheet columns
    #[serde(default = "default_scheme_column")]
    pub scheme_column: String,
    /// Header of the column holding the used percentage
    #[serde(default = "default_value_column")]
    pub value_column: String,
    /// Canonical row order; sites missing from the page stay as empty rows
    #[serde(default = "default_sites")]
    pub sites: Vec<String>,
    /// HTTP request timeout in seconds
    #[serde(default = "default_scrape_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_encoding() -> String {
    "gbk".to_string()
}

fn default_scheme_column() -> String {
    "方案名称".to_string()
}

fn default_value_column() -> String {
    "已用百分比".to_string()
}

fn default_sites() -> Vec<String> {
    DEFAULT_SITES.iter().map(ToString::to_string).collect()
}

const fn default_scrape_timeout_secs() -> u64 {
    30
}

impl Default for TableSpaceSettings {
    fn default() -> Self {
        Self {
            url: None,
            encoding: default_encoding(),
            scheme_column: default_scheme_column(),
            value_column: default_value_column(),
            sites: default_sites(),
            timeout_secs: default_scrape_timeout_secs(),
        }
    }
}
