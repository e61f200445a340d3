//! Polling settings for remote host metrics collection
//!
//! Stored in `config.toml` under `[report.poll]`. Every field has a default,
//! so the whole table may be omitted.

use serde::{Deserialize, Serialize};

/// SSH polling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSettings {
    /// SSH port used for every host (default: 22)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connection timeout in seconds (1–300, default: 10)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Upper bound for the whole remote command in seconds (1–3600, default: 120)
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

const fn default_port() -> u16 {
    22
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_command_timeout_secs() -> u64 {
    120
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl PollSettings {
    /// Returns the connection timeout clamped to the valid range (1–300 seconds)
    #[must_use]
    pub const fn effective_connect_timeout_secs(&self) -> u64 {
        if self.connect_timeout_secs == 0 {
            1
        } else if self.connect_timeout_secs > 300 {
            300
        } else {
            self.connect_timeout_secs
        }
    }

    /// Returns the command timeout clamped to the valid range.
    ///
    /// Never shorter than the connection timeout, so a slow handshake is
    /// reported as a connection failure rather than a command timeout.
    #[must_use]
    pub fn effective_command_timeout_secs(&self) -> u64 {
        self.command_timeout_secs
            .clamp(1, 3600)
            .max(self.effective_connect_timeout_secs())
    }
}
