//! Property tests for metric extraction

use hostreport_core::monitoring::{HardwareHealth, MetricRecord, MetricsParser, format_percent};
use proptest::prelude::*;

proptest! {
    /// Property: the same text always yields the same record
    #[test]
    fn extraction_is_deterministic(text in "(?s).{0,400}") {
        prop_assert_eq!(MetricsParser::parse(&text), MetricsParser::parse(&text));
    }

    /// Property: blank text is the unreachable record
    #[test]
    fn blank_text_is_unreachable(text in "[ \t\r\n]{0,40}") {
        prop_assert_eq!(MetricsParser::parse(&text), MetricRecord::unreachable());
    }

    /// Property: any non-blank text is never classified unreachable
    #[test]
    fn non_blank_text_is_never_unreachable(text in "[a-zA-Z0-9 :%|\n-]{1,200}") {
        prop_assume!(!text.trim().is_empty());
        let record = MetricsParser::parse(&text);
        prop_assert_ne!(record.hardware_health, HardwareHealth::Unreachable);
    }

    /// Property: text without digits yields no numeric metric, never a zero
    #[test]
    fn missing_patterns_leave_fields_absent(text in "[A-Za-z \n]{1,120}") {
        let record = MetricsParser::parse(&text);
        prop_assert_eq!(record.disk_total_gb, None);
        prop_assert_eq!(record.disk_used_gb, None);
        prop_assert_eq!(record.disk_usage_pct, None);
        prop_assert_eq!(record.mem_total_mb, None);
        prop_assert_eq!(record.mem_used_mb, None);
        prop_assert_eq!(record.mem_usage_pct, None);
        prop_assert_eq!(record.cpu_usage_pct, None);
    }

    /// Property: memory usage is used / total with one decimal place
    #[test]
    fn memory_usage_matches_ratio(total in 1u64..2_000_000, seed in any::<u64>()) {
        let used = seed % (total + 1);
        let text = format!("---MEM---\nMem: {total} {used} 0 0 0 0\n");
        let record = MetricsParser::parse(&text);

        prop_assert_eq!(record.mem_total_mb, Some(total));
        prop_assert_eq!(record.mem_used_mb, Some(used));
        let expected = format_percent(used as f64 / total as f64 * 100.0);
        prop_assert_eq!(record.mem_usage_pct, Some(expected));
    }

    /// Property: a zero total never produces a usage figure
    #[test]
    fn zero_memory_total_has_no_usage(used in 0u64..100_000) {
        let text = format!("Mem: 0 {used} 0 0 0 0\n");
        let record = MetricsParser::parse(&text);
        prop_assert_eq!(record.mem_total_mb, Some(0));
        prop_assert_eq!(record.mem_usage_pct, None);
    }

    /// Property: buffers and cache are subtracted only when used exceeds them
    #[test]
    fn six_column_used_never_underflows(
        total in 1u64..1_000_000,
        used in 0u64..1_000_000,
        buffers in 0u64..500_000,
        cache in 0u64..500_000,
    ) {
        let text = format!("Mem: {total} {used} 0 0 {buffers} {cache}\n");
        let record = MetricsParser::parse(&text);
        let expected = if used > buffers + cache { used - buffers - cache } else { used };
        prop_assert_eq!(record.mem_used_mb, Some(expected));
    }

    /// Property: CPU usage is 100 minus idle
    #[test]
    fn cpu_usage_is_complement_of_idle(tenths in 0u32..=1000) {
        let idle = format!("{}.{}", tenths / 10, tenths % 10);
        let text = format!("%Cpu(s):  1.0 us,  0.5 sy,  0.0 ni, {idle} id,  0.0 wa\n");
        let record = MetricsParser::parse(&text);

        let idle: f64 = idle.parse().unwrap();
        prop_assert_eq!(record.cpu_usage_pct, Some(format_percent(100.0 - idle)));
    }

    /// Property: the df total line is read verbatim
    #[test]
    fn disk_total_line_is_read(
        total in 1u64..100_000,
        used in 0u64..100_000,
        pct in 0u8..=100,
    ) {
        let free = total.saturating_sub(used);
        let text = format!("---DISK---\ntotal {total} {used} {free} {pct}% -\n---MEM---\n");
        let record = MetricsParser::parse(&text);

        prop_assert_eq!(record.disk_total_gb, Some(total));
        prop_assert_eq!(record.disk_used_gb, Some(used));
        prop_assert_eq!(record.disk_usage_pct, Some(format!("{pct}%")));
    }

    /// Property: placeholder model values never reach the record
    #[test]
    fn placeholder_models_are_dropped(
        manufacturer in prop::sample::select(vec!["To Be Filled By O.E.M.", "", "Unknown", "empty"]),
        product in prop::sample::select(vec!["System Product Name", "", "unknown", "EMPTY"]),
    ) {
        let text = format!("---MODEL---\nManufacturer: {manufacturer}\nProduct Name: {product}\n");
        prop_assert_eq!(MetricsParser::parse(&text).model, "");
    }
}
