//! Configuration for `hostreport`
//!
//! Loads the host inventory and run settings from a single TOML file.

mod hosts;
pub mod settings;

pub use hosts::{HostCredential, HostInventory};
pub use settings::{
    DEFAULT_SITES, RESERVED_SECTION, ReportSettings, TableSpaceSettings, expand_path,
};
