//! Integration tests for polling and extraction over a scripted transport

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hostreport_core::config::{HostCredential, HostInventory};
use hostreport_core::error::TransportError;
use hostreport_core::monitoring::{
    CommandOutput, CommandTransport, DIAGNOSTIC_COMMAND, HardwareHealth, extract_all, poll_hosts,
};
use hostreport_core::report::{TableSpaceMatrix, assemble};

/// A fully populated capture
pub const HEALTHY_CAPTURE: &str = "\
---DISK---
total             1870        735       1041  42% -
---MEM---
               total        used        free      shared  buff/cache   available
Mem:           15885        4512        1203         389       10169       10655
Swap:           2047           0        2047
---CPU---
%Cpu(s):  2.3 us,  0.8 sy,  0.0 ni, 96.7 id,  0.2 wa,  0.0 hi,  0.0 si,  0.0 st
---MODEL---
\tManufacturer: Dell Inc.
\tProduct Name: PowerEdge R740
---HEALTH---
Inlet Temp       | 22 degrees C      | ok
Fan1             | 5880 RPM          | ok
---END---
";

/// Replays a fixed stdout (or failure) per host address and records calls
pub struct ScriptedTransport {
    replies: HashMap<String, Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new<'a>(replies: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> Self {
        Self {
            replies: replies
                .into_iter()
                .map(|(addr, out)| (addr.to_string(), out.map(ToString::to_string)))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandTransport for ScriptedTransport {
    async fn exec(
        &self,
        host: &HostCredential,
        command: &str,
    ) -> Result<CommandOutput, TransportError> {
        assert_eq!(command, DIAGNOSTIC_COMMAND);
        self.calls.lock().unwrap().push(host.address.clone());
        match self.replies.get(&host.address) {
            Some(Some(stdout)) => Ok(CommandOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            Some(None) => Err(TransportError::Timeout(10)),
            None => Err(TransportError::Spawn(format!("no route to {}", host.address))),
        }
    }
}

pub fn five_host_inventory() -> HostInventory {
    HostInventory::parse(
        r#"
["web-01"]
host = "10.0.0.11"
user = "root"
password = "a"

["web-02"]
host = "10.0.0.12"
user = "root"
password = "b"

["db-01"]
host = "10.0.0.5"
user = "monitor"
password = "c"

["db-02"]
host = "10.0.0.6"
user = "monitor"
password = "d"

["backup"]
host = "10.0.0.9"
user = "root"
password = "e"
"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_one_unreachable_host_in_five() {
    let inventory = five_host_inventory();
    let transport = ScriptedTransport::new([
        ("10.0.0.11", Some(HEALTHY_CAPTURE)),
        ("10.0.0.12", Some(HEALTHY_CAPTURE)),
        ("10.0.0.5", None),
        ("10.0.0.6", Some(HEALTHY_CAPTURE)),
        ("10.0.0.9", Some(HEALTHY_CAPTURE)),
    ]);

    let captures = poll_hosts(&transport, &inventory.hosts).await;
    let metrics = extract_all(&captures);
    let book = assemble(&metrics, TableSpaceMatrix::default());

    assert_eq!(book.performance.len(), 5);
    assert_eq!(book.hardware.len(), 5);

    let names: Vec<_> = book.performance.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["web-01", "web-02", "db-01", "db-02", "backup"]);

    let down = &book.performance[2];
    assert_eq!(down.disk_total_gb, None);
    assert_eq!(down.mem_usage_pct, None);
    assert_eq!(down.model, "");
    assert_eq!(book.hardware[2].health, HardwareHealth::Unreachable);

    for idx in [0, 1, 3, 4] {
        let row = &book.performance[idx];
        assert_eq!(row.disk_usage_pct.as_deref(), Some("42%"));
        assert_eq!(row.mem_usage_pct.as_deref(), Some("28.4%"));
        assert_eq!(row.cpu_usage_pct.as_deref(), Some("3.3%"));
        assert_eq!(row.model, "Dell Inc. PowerEdge R740");
        assert_eq!(book.hardware[idx].health, HardwareHealth::Healthy);
    }
}

#[tokio::test]
async fn test_hosts_are_polled_once_in_config_order() {
    let inventory = five_host_inventory();
    let transport = ScriptedTransport::new([]);

    let captures = poll_hosts(&transport, &inventory.hosts).await;

    assert_eq!(
        transport.calls(),
        ["10.0.0.11", "10.0.0.12", "10.0.0.5", "10.0.0.6", "10.0.0.9"]
    );
    assert!(captures.iter().all(|c| c.is_failed()));
    let metrics = extract_all(&captures);
    assert!(
        metrics
            .iter()
            .all(|m| m.record.hardware_health == HardwareHealth::Unreachable)
    );
}

#[tokio::test]
async fn test_partial_capture_keeps_what_was_found() {
    let inventory = five_host_inventory();
    let partial = "---DISK---\n---MEM---\nMem: 2000 1000 500 0 100 100\n---CPU---\n";
    let transport = ScriptedTransport::new([("10.0.0.11", Some(partial))]);

    let captures = poll_hosts(&transport, &inventory.hosts[..1]).await;
    let metrics = extract_all(&captures);
    let record = &metrics[0].record;

    assert_eq!(record.disk_total_gb, None);
    assert_eq!(record.mem_total_mb, Some(2000));
    assert_eq!(record.mem_used_mb, Some(800));
    assert_eq!(record.mem_usage_pct.as_deref(), Some("40.0%"));
    assert_eq!(record.cpu_usage_pct, None);
    // no health marker reached: reported healthy
    assert_eq!(record.hardware_health, HardwareHealth::Healthy);
}
