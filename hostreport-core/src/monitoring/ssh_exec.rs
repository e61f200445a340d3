//! SSH command execution for host polling
//!
//! Runs the diagnostic command on remote hosts via `ssh` (or `sshpass -e ssh`
//! for password-authenticated hosts). Each call spawns its own client
//! process, so no session state is shared between hosts.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tokio::process::Command;

use super::settings::PollSettings;
use crate::config::HostCredential;
use crate::error::TransportError;

/// Output of one remote command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Remote stdout
    pub stdout: String,
    /// Remote stderr (and ssh client diagnostics)
    pub stderr: String,
}

/// Runs a single command line on a remote host
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Executes `command` on `host` and returns its separated output.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the session cannot be opened, the
    /// command does not finish in time, or nothing was printed to stdout.
    async fn exec(
        &self,
        host: &HostCredential,
        command: &str,
    ) -> Result<CommandOutput, TransportError>;
}

/// [`CommandTransport`] backed by the system `ssh` client
#[derive(Debug, Clone)]
pub struct SshTransport {
    settings: PollSettings,
    sshpass_available: bool,
}

impl SshTransport {
    /// Creates a transport, checking `sshpass` availability once.
    ///
    /// Without `sshpass`, hosts are contacted in batch mode and must accept
    /// key-based authentication.
    #[must_use]
    pub fn new(settings: PollSettings) -> Self {
        let sshpass_available = std::process::Command::new("sshpass")
            .arg("-V")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok();
        if !sshpass_available {
            tracing::warn!("sshpass not found; password authentication is unavailable");
        }
        Self {
            settings,
            sshpass_available,
        }
    }

    /// Builds the `ssh` invocation for one host
    fn build_command(&self, host: &HostCredential, command: &str) -> Command {
        let mut cmd;

        if self.sshpass_available {
            cmd = Command::new("sshpass");
            cmd.arg("-e").arg("ssh");
            // sshpass reads the password from SSHPASS with -e
            cmd.env("SSHPASS", host.secret.expose_secret());
        } else {
            cmd = Command::new("ssh");
            cmd.arg("-o").arg("BatchMode=yes");
        }

        cmd.arg("-o").arg("StrictHostKeyChecking=no");
        cmd.arg("-o").arg(format!(
            "ConnectTimeout={}",
            self.settings.effective_connect_timeout_secs()
        ));

        if self.settings.port != 22 {
            cmd.arg("-p").arg(self.settings.port.to_string());
        }

        cmd.arg(format!("{}@{}", host.username, host.address));
        cmd.arg(command);

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // the child is killed if the timeout drops the future
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandTransport for SshTransport {
    async fn exec(
        &self,
        host: &HostCredential,
        command: &str,
    ) -> Result<CommandOutput, TransportError> {
        let timeout_secs = self.settings.effective_command_timeout_secs();
        let mut cmd = self.build_command(host, command);

        match tokio::time::timeout(Duration::from_secs(timeout_secs), cmd.output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                // The composite command's exit status is that of its last
                // step, so any stdout at all counts as a capture.
                if stdout.trim().is_empty() {
                    return Err(TransportError::NoOutput {
                        status: output.status.to_string(),
                        stderr,
                    });
                }
                if !output.status.success() {
                    tracing::debug!(
                        host = %host.name,
                        status = %output.status,
                        "Diagnostic command exited non-zero"
                    );
                }
                Ok(CommandOutput { stdout, stderr })
            }
            Ok(Err(e)) => Err(TransportError::Spawn(e.to_string())),
            Err(_) => Err(TransportError::Timeout(timeout_secs)),
        }
    }
}
