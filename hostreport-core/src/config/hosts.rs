//! Host inventory loading
//!
//! The config file is a TOML document where every top-level table is a
//! host, keyed by its display name:
//!
//! ```toml
//! ["db-primary"]
//! host = "10.0.0.5"
//! user = "monitor"
//! password = "..."
//! ```
//!
//! The reserved `[report]` table holds [`ReportSettings`]. Hosts keep the
//! order they appear in the document.

use std::path::Path;

use secrecy::SecretString;
use toml::{Table, Value};

use super::settings::{RESERVED_SECTION, ReportSettings};
use crate::error::{ConfigError, ConfigResult, ReportError};
use crate::tracing::span_names;

/// Login details for one host
#[derive(Debug, Clone)]
pub struct HostCredential {
    /// Display name (config section name)
    pub name: String,
    /// Hostname or IP address
    pub address: String,
    /// SSH user
    pub username: String,
    /// SSH password
    pub secret: SecretString,
}

/// Everything loaded from the config file
#[derive(Debug, Clone, Default)]
pub struct HostInventory {
    /// Hosts in document order
    pub hosts: Vec<HostCredential>,
    /// Run settings from `[report]`, or defaults
    pub settings: ReportSettings,
    /// Sections that were skipped, with the reason
    pub skipped: Vec<String>,
}

impl HostInventory {
    /// Loads the inventory from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist,
    /// [`ConfigError::Unreadable`] if it cannot be read, and the errors of
    /// [`HostInventory::parse`] otherwise.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let _span = crate::trace_operation!(
            span_names::CONFIG_LOAD,
            path = %path.display()
        )
        .entered();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses an inventory document.
    ///
    /// Incomplete host sections are skipped with a warning and listed in
    /// [`HostInventory::skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML and
    /// [`ConfigError::InvalidSettings`] for a bad `[report]` section.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let document: Table =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut inventory = Self::default();

        for (name, value) in document {
            if name == RESERVED_SECTION {
                let settings: ReportSettings = value
                    .try_into()
                    .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;
                settings.validate()?;
                inventory.settings = settings;
                continue;
            }

            match host_from_section(&name, &value) {
                Ok(host) => inventory.hosts.push(host),
                Err(source) => {
                    inventory.skipped.push(source.to_string());
                    let err = ReportError::from(source);
                    tracing::warn!(section = %name, error = %err, "Skipping config section");
                }
            }
        }

        tracing::debug!(
            hosts = inventory.hosts.len(),
            skipped = inventory.skipped.len(),
            "Inventory loaded"
        );
        Ok(inventory)
    }
}

fn host_from_section(name: &str, value: &Value) -> ConfigResult<HostCredential> {
    let section = value
        .as_table()
        .ok_or_else(|| ConfigError::NotASection(name.to_string()))?;

    let required = |key: &'static str| -> ConfigResult<String> {
        section
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| ConfigError::SectionIncomplete {
                section: name.to_string(),
                key,
            })
    };

    Ok(HostCredential {
        name: name.to_string(),
        address: required("host")?,
        username: required("user")?,
        // passwords are taken verbatim, surrounding spaces included
        secret: section
            .get("password")
            .and_then(Value::as_str)
            .map(|p| SecretString::from(p.to_string()))
            .ok_or_else(|| ConfigError::SectionIncomplete {
                section: name.to_string(),
                key: "password",
            })?,
    })
}
