//! Integration tests for assembling and exporting a full report

use chrono::TimeZone;
use hostreport_core::config::{ReportSettings, TableSpaceSettings};
use hostreport_core::monitoring::{extract_all, poll_hosts};
use hostreport_core::report::{
    ExportOutcome, HARDWARE_SHEET, PERFORMANCE_SHEET, TABLE_SPACE_SHEET, TableSpaceMatrix,
    assemble, export_workbook, parse_table_space,
};
use tempfile::TempDir;

use super::poller_tests::{HEALTHY_CAPTURE, ScriptedTransport, five_host_inventory};

const TABLE_SPACE_PAGE: &str = r#"
<html><body><table>
<tr><th colspan="3">数据库表空间</th></tr>
<tr><th>站点</th><th>方案名称</th><th>已用百分比</th></tr>
<tr><td>主库</td><td>USERS</td><td>85.3%</td></tr>
<tr><td>青岛地震监测中心站</td><td>USERS</td><td>12.0%</td></tr>
<tr><td>主库</td><td>SYSTEM</td><td>61.0%</td></tr>
<tr><td>合计</td><td></td><td></td></tr>
</table></body></html>
"#;

#[tokio::test]
async fn test_full_report_is_written() {
    let dir = TempDir::new().unwrap();
    let inventory = five_host_inventory();
    let transport = ScriptedTransport::new([
        ("10.0.0.11", Some(HEALTHY_CAPTURE)),
        ("10.0.0.6", Some(HEALTHY_CAPTURE)),
    ]);

    let metrics = extract_all(&poll_hosts(&transport, &inventory.hosts).await);
    let matrix = parse_table_space(TABLE_SPACE_PAGE, &TableSpaceSettings::default()).unwrap();

    // canonical order: 主库 first, 青岛 last
    assert_eq!(matrix.rows.len(), 9);
    assert_eq!(matrix.rows[0].site, "主库");
    assert_eq!(matrix.get("青岛地震监测中心站", "USERS"), Some("12.0%"));
    assert_eq!(matrix.get("备份库", "USERS"), None);

    let settings = ReportSettings {
        output_dir: dir.path().join("reports").to_string_lossy().into_owned(),
        ..ReportSettings::default()
    };
    let now = chrono::Local.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
    let path = settings.report_path(&now);
    assert!(path.ends_with("server_monthly_report_202610.xlsx"));

    let outcome = export_workbook(&path, &assemble(&metrics, matrix).into_sheets()).unwrap();

    assert_eq!(
        outcome,
        ExportOutcome::Written {
            path: path.clone(),
            sheets: vec![
                PERFORMANCE_SHEET.to_string(),
                HARDWARE_SHEET.to_string(),
                TABLE_SPACE_SHEET.to_string(),
            ],
        }
    );
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"), "xlsx is a zip container");
}

#[tokio::test]
async fn test_failed_scrape_omits_table_space_sheet() {
    let dir = TempDir::new().unwrap();
    let inventory = five_host_inventory();
    let transport = ScriptedTransport::new([]);
    let metrics = extract_all(&poll_hosts(&transport, &inventory.hosts).await);

    let matrix = TableSpaceMatrix::empty(&TableSpaceSettings::default().sites);
    let path = dir.path().join("report.xlsx");
    let outcome = export_workbook(&path, &assemble(&metrics, matrix).into_sheets()).unwrap();

    match outcome {
        ExportOutcome::Written { sheets, .. } => {
            assert_eq!(sheets, [PERFORMANCE_SHEET, HARDWARE_SHEET]);
        }
        ExportOutcome::Skipped => panic!("host sheets should still be written"),
    }
}

#[test]
fn test_nothing_to_report_writes_no_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.xlsx");
    let outcome =
        export_workbook(&path, &assemble(&[], TableSpaceMatrix::default()).into_sheets()).unwrap();

    assert_eq!(outcome, ExportOutcome::Skipped);
    assert!(!path.exists());
}
