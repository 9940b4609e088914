//! Sheet writer behavior over the in-memory spreadsheet API.

mod common;

use chrono::NaiveDate;

use brdcase::model::{Priority, TestCase};
use brdcase::sheets::{worksheet_name, Row, SheetWriter, SpreadsheetApi};

use common::InMemorySheets;

fn cases(n: usize, tag: &str) -> Vec<TestCase> {
    (1..=n)
        .map(|i| TestCase {
            description: format!("{} {}", tag, i),
            steps: "1. Open".to_string(),
            expected_result: "Shown".to_string(),
            priority: if i % 2 == 0 { Priority::Low } else { Priority::High },
        })
        .collect()
}

#[tokio::test]
async fn test_rewrite_leaves_no_residual_rows() {
    let sheets = InMemorySheets::new();
    let writer = SheetWriter::new(Box::new(sheets.clone()), "Output");

    writer
        .write(&cases(50, "first"), "brd_20240309_140507", "brd.pdf", "TC")
        .await
        .unwrap();
    let result = writer
        .write(&cases(5, "second"), "brd_20240309_140507", "brd.pdf", "TC")
        .await
        .unwrap();

    assert_eq!(result.rows_written, 8);

    let state = sheets.state.lock().unwrap();
    let rows = state.tab("Output", "brd_20240309_140507").unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[7][0], "TC005");
    assert_eq!(rows[7][1], "second 5");
    assert!(rows.iter().all(|r| !r[1].starts_with("first")));
}

#[tokio::test]
async fn test_bulk_write_without_clear_overlays_old_rows() {
    let sheets = InMemorySheets::new();
    let spreadsheet = sheets.open_or_create_spreadsheet("Output").await.unwrap();
    let worksheet = sheets
        .open_or_create_worksheet(&spreadsheet, "tab", 150, 10)
        .await
        .unwrap();

    let long: Vec<Row> = (0..4).map(|i| vec![format!("old {}", i)]).collect();
    let short: Vec<Row> = vec![vec!["new 0".to_string()]];
    sheets.write_rows(&spreadsheet, &worksheet, &long).await.unwrap();
    sheets.write_rows(&spreadsheet, &worksheet, &short).await.unwrap();

    let state = sheets.state.lock().unwrap();
    let rows = state.tab("Output", "tab").unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][0], "new 0");
    assert_eq!(rows[3][0], "old 3");
}

#[tokio::test]
async fn test_rows_render_priority_and_blank_result() {
    let sheets = InMemorySheets::new();
    let writer = SheetWriter::new(Box::new(sheets.clone()), "Output");

    writer
        .write(&cases(2, "case"), "tab", "Payments BRD.pdf", "QA-")
        .await
        .unwrap();

    let state = sheets.state.lock().unwrap();
    let rows = state.tab("Output", "tab").unwrap();
    assert_eq!(rows[0][0], "📋 Payments BRD.pdf");
    assert!(rows[1].iter().all(String::is_empty));
    assert_eq!(
        rows[2],
        vec!["Test ID", "Description", "Steps", "Expected Result", "Priority", "Result"]
    );
    assert_eq!(rows[3], vec!["QA-001", "case 1", "1. Open", "Shown", "High", ""]);
    assert_eq!(rows[4][4], "Low");
}

#[tokio::test]
async fn test_new_tab_grid_fits_large_batches() {
    let sheets = InMemorySheets::new();
    let writer = SheetWriter::new(Box::new(sheets.clone()), "Output");

    writer.write(&cases(10, "a"), "small", "a.pdf", "TC").await.unwrap();
    writer.write(&cases(300, "b"), "large", "b.pdf", "TC").await.unwrap();

    let state = sheets.state.lock().unwrap();
    assert_eq!(
        state.requested_rows,
        vec![("small".to_string(), 150), ("large".to_string(), 313)]
    );
}

#[test]
fn test_long_filename_truncation_keeps_timestamp() {
    let at = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(14, 5, 7)
        .unwrap();
    let filename = format!("{}.pdf", "requirements ".repeat(20));

    let name = worksheet_name(&filename, at, 40);

    assert_eq!(name.chars().count(), 40);
    assert!(name.ends_with("_20240309_140507"));
    assert!(name.starts_with("requirements_"));
}

#[test]
fn test_short_name_untouched() {
    let at = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(14, 5, 7)
        .unwrap();
    assert_eq!(
        worksheet_name("Login Flow v2.pdf", at, 100),
        "Login_Flow_v2_20240309_140507"
    );
}
