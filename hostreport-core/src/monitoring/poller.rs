//! Sequential host poller
//!
//! Sends [`DIAGNOSTIC_COMMAND`] to each host in turn through a
//! [`CommandTransport`], and turns every outcome into a [`RawCapture`]. A
//! failing host yields an empty capture and the loop moves on.

use tracing::Instrument;

use super::metrics::{MetricRecord, RawCapture};
use super::parser::{DIAGNOSTIC_COMMAND, MetricsParser};
use super::ssh_exec::CommandTransport;
use crate::config::HostCredential;
use crate::error::ReportError;
use crate::tracing::span_names;

/// A host's identity together with its extracted metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMetrics {
    /// Host display name
    pub name: String,
    /// Host address
    pub address: String,
    /// Extracted metrics
    pub record: MetricRecord,
}

impl HostMetrics {
    /// Runs the extractor over a capture
    #[must_use]
    pub fn from_capture(capture: &RawCapture) -> Self {
        Self {
            name: capture.name.clone(),
            address: capture.address.clone(),
            record: MetricsParser::parse(&capture.text),
        }
    }
}

/// Polls one host; never fails.
pub async fn poll_host<T>(transport: &T, host: &HostCredential) -> RawCapture
where
    T: CommandTransport + ?Sized,
{
    let span = crate::trace_operation!(
        span_names::POLL_HOST,
        host = %host.name,
        address = %host.address
    );

    async {
        match transport.exec(host, DIAGNOSTIC_COMMAND).await {
            Ok(output) => {
                if !output.stderr.is_empty() {
                    tracing::debug!(stderr = %output.stderr, "Diagnostic command wrote to stderr");
                }
                tracing::info!(bytes = output.stdout.len(), "Captured diagnostic output");
                RawCapture {
                    name: host.name.clone(),
                    address: host.address.clone(),
                    text: output.stdout,
                }
            }
            Err(source) => {
                let err = ReportError::HostUnreachable {
                    host: host.name.clone(),
                    source,
                };
                tracing::warn!(error = %err, "Host skipped");
                RawCapture::failed(&host.name, &host.address)
            }
        }
    }
    .instrument(span)
    .await
}

/// Polls every host sequentially, in the given order.
///
/// Always returns exactly one capture per host.
pub async fn poll_hosts<T>(transport: &T, hosts: &[HostCredential]) -> Vec<RawCapture>
where
    T: CommandTransport + ?Sized,
{
    let mut captures = Vec::with_capacity(hosts.len());
    for host in hosts {
        captures.push(poll_host(transport, host).await);
    }

    let failed = captures.iter().filter(|c| c.is_failed()).count();
    tracing::info!(
        total = captures.len(),
        failed,
        "Polling finished"
    );
    captures
}

/// Runs the extractor over every capture, keeping order
#[must_use]
pub fn extract_all(captures: &[RawCapture]) -> Vec<HostMetrics> {
    captures.iter().map(HostMetrics::from_capture).collect()
}
