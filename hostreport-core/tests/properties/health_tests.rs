//! Property tests for hardware health classification

use hostreport_core::monitoring::{
    END_MARKER, HEALTH_MARKER, HardwareHealth, KERNEL_DISK_ALARM, MetricsParser, evaluate_region,
};
use proptest::prelude::*;

// the alphabet cannot spell any kernel fault keyword
fn sensor_name() -> impl Strategy<Value = String> {
    "[A-E][0-9a-e]{0,8}"
}

fn sensor_line(name: &str, status: &str) -> String {
    format!("{name:<16} | 42 RPM | {status}\n")
}

proptest! {
    /// Property: all sensors ok and no fault keyword -> healthy
    #[test]
    fn all_ok_is_healthy(names in prop::collection::vec(sensor_name(), 1..10)) {
        let region: String = names.iter().map(|n| sensor_line(n, "ok")).collect();
        prop_assert_eq!(evaluate_region(&region), HardwareHealth::Healthy);
    }

    /// Property: a single bad sensor degrades with "<name>:<status>"
    #[test]
    fn one_bad_sensor_degrades(
        names in prop::collection::vec(sensor_name(), 0..6),
        bad in sensor_name(),
        status in prop::sample::select(vec!["cr", "nc", "nr", "critical"]),
        position in any::<prop::sample::Index>(),
    ) {
        let mut lines: Vec<String> = names.iter().map(|n| sensor_line(n, "ok")).collect();
        let at = position.index(lines.len() + 1);
        lines.insert(at, sensor_line(&bad, status));
        let region = lines.concat();

        prop_assert_eq!(
            evaluate_region(&region),
            HardwareHealth::Degraded(vec![format!("{bad}:{status}")])
        );
    }

    /// Property: no ok sensor and no anomaly -> unknown
    #[test]
    fn only_unreadable_sensors_is_unknown(
        names in prop::collection::vec(sensor_name(), 0..6),
        status in prop::sample::select(vec!["ns", "Not Readable", "NS"]),
    ) {
        let region: String = names.iter().map(|n| sensor_line(n, status)).collect();
        prop_assert_eq!(evaluate_region(&region), HardwareHealth::UnknownNoData);
    }

    /// Property: a kernel fault line always adds the kernel alarm last
    #[test]
    fn kernel_fault_adds_alarm(
        names in prop::collection::vec(sensor_name(), 0..6),
        keyword in prop::sample::select(vec!["I/O error", "disk error", "FAILED"]),
    ) {
        let mut region: String = names.iter().map(|n| sensor_line(n, "ok")).collect();
        region.push_str(&format!("[12.5] blk_update_request: {keyword}, dev sda\n"));

        match evaluate_region(&region) {
            HardwareHealth::Degraded(reasons) => {
                prop_assert_eq!(reasons.last().map(String::as_str), Some(KERNEL_DISK_ALARM));
            }
            other => prop_assert!(false, "expected degraded, got {other}"),
        }
    }

    /// Property: only the marked region is inspected
    #[test]
    fn text_outside_markers_is_ignored(name in sensor_name()) {
        let text = format!(
            "{}{HEALTH_MARKER}\n{}{END_MARKER}\n{}",
            sensor_line("Outside", "cr"),
            sensor_line(&name, "ok"),
            "dmesg: disk error after end\n",
        );
        prop_assert_eq!(MetricsParser::parse(&text).hardware_health, HardwareHealth::Healthy);
    }
}
