//! End-to-end pipeline runs against scripted API fakes.

mod common;

use brdcase::error::GenerateError;
use brdcase::pipeline::BatchReport;

use common::{cases_json, InMemorySheets, TestHarness, LOGIN_BRD};

fn api_error() -> Result<String, GenerateError> {
    Err(GenerateError::ApiCallFailed("API error (500): upstream".to_string()))
}

#[tokio::test]
async fn test_three_full_batches_end_to_end() {
    let harness = TestHarness::new();
    let doc = harness.stage_pdf("login_brd.pdf", LOGIN_BRD);

    let (report, requests) = harness
        .run(
            doc,
            90,
            vec![
                Ok(cases_json(30, "happy")),
                Ok(cases_json(30, "validation")),
                Ok(cases_json(30, "edge")),
            ],
        )
        .await;

    assert!(report.success, "Pipeline failed: {:?}", report.error);
    assert_eq!(report.total_test_cases, Some(90));
    assert_eq!(report.target_test_cases, Some(90));
    assert_eq!(report.coverage_percentage, Some(90.0));
    assert!(report.error.is_none());
    assert_eq!(
        report.sheet_url.as_deref(),
        Some("https://docs.google.com/spreadsheets/d/id-BRD_TestCases_Output")
    );

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    for request in requests.iter() {
        assert!(request.user.contains("EXACTLY 30"));
        assert!(request.user.contains("Sign in button"));
    }

    let worksheet = report.worksheet_name.unwrap();
    assert!(worksheet.starts_with("login_brd_"));

    let state = harness.sheets.state.lock().unwrap();
    let rows = state.tab(harness.spreadsheet_name(), &worksheet).unwrap();
    assert_eq!(rows.len(), 93);
    assert_eq!(rows[0][0], "📋 login_brd.pdf");
    assert_eq!(rows[2][0], "Test ID");
    assert_eq!(rows[3][0], "TC001");
    assert_eq!(rows[3][1], "happy case 1");
    assert_eq!(rows[33][0], "TC031");
    assert_eq!(rows[33][1], "validation case 1");
    assert_eq!(rows[92][0], "TC090");
    assert_eq!(rows[92][1], "edge case 30");
    assert_eq!(state.formatted, vec![worksheet.clone()]);
    drop(state);

    assert!(harness.staged_files().is_empty(), "staged upload removed");
}

#[tokio::test]
async fn test_target_75_requests_30_30_15() {
    let harness = TestHarness::new();
    let doc = harness.stage_pdf("brd.pdf", LOGIN_BRD);

    let (report, requests) = harness
        .run(
            doc,
            75,
            vec![
                Ok(cases_json(30, "happy")),
                Ok(cases_json(30, "validation")),
                Ok(cases_json(15, "edge")),
            ],
        )
        .await;

    assert!(report.success);
    assert_eq!(report.total_test_cases, Some(75));

    let requests = requests.lock().unwrap();
    let counts: Vec<bool> = vec![
        requests[0].user.contains("EXACTLY 30"),
        requests[1].user.contains("EXACTLY 30"),
        requests[2].user.contains("EXACTLY 15"),
    ];
    assert_eq!(counts, vec![true, true, true]);
}

#[tokio::test]
async fn test_batch_two_failure_keeps_first_batch() {
    let harness = TestHarness::new();
    let doc = harness.stage_pdf("brd.pdf", LOGIN_BRD);

    let (report, requests) = harness
        .run(doc, 90, vec![Ok(cases_json(30, "happy")), api_error()])
        .await;

    assert!(report.success);
    assert_eq!(report.total_test_cases, Some(30));
    let advisory = report.error.expect("advisory message");
    assert!(advisory.starts_with("Batch 2 failed but Batch 1 succeeded"));
    assert_eq!(requests.lock().unwrap().len(), 2, "no batch 3 request");
    assert!(harness.staged_files().is_empty());
}

#[tokio::test]
async fn test_batch_three_failure_keeps_two_batches() {
    let harness = TestHarness::new();
    let doc = harness.stage_pdf("brd.pdf", LOGIN_BRD);

    let (report, _) = harness
        .run(
            doc,
            90,
            vec![
                Ok(cases_json(10, "happy")),
                Ok(cases_json(10, "validation")),
                Ok("Sorry, I cannot help with that.".to_string()),
            ],
        )
        .await;

    assert!(report.success);
    assert_eq!(report.total_test_cases, Some(20));
    assert!(report
        .error
        .unwrap()
        .starts_with("Batch 3 parsing failed but Batch 1+2 succeeded"));
}

#[tokio::test]
async fn test_first_batch_failure_fails_document() {
    let harness = TestHarness::new();
    let doc = harness.stage_pdf("brd.pdf", LOGIN_BRD);

    let (report, requests) = harness.run(doc, 90, vec![api_error()]).await;

    assert!(!report.success);
    assert!(report
        .error
        .unwrap()
        .starts_with("Test case generation failed:"));
    assert!(report.total_test_cases.is_none());
    assert_eq!(requests.lock().unwrap().len(), 1);
    assert!(harness.sheets.state.lock().unwrap().requested_rows.is_empty());
    assert!(harness.staged_files().is_empty());
}

#[tokio::test]
async fn test_one_missing_key_rejects_whole_batch() {
    let harness = TestHarness::new();
    let doc = harness.stage_pdf("brd.pdf", LOGIN_BRD);

    let reply = serde_json::json!([
        {"description": "a", "steps": "1. x", "expected_result": "y", "priority": "High"},
        {"description": "b", "steps": "1. x", "priority": "Low"},
    ])
    .to_string();

    let (report, _) = harness.run(doc, 10, vec![Ok(reply)]).await;

    assert!(!report.success);
    assert!(report.error.unwrap().contains("expected_result"));
}

#[tokio::test]
async fn test_single_batch_below_threshold() {
    let harness = TestHarness::new();
    let doc = harness.stage_pdf("brd.pdf", LOGIN_BRD);

    let (report, requests) = harness
        .run(doc, 55, vec![Ok(cases_json(55, "happy"))])
        .await;

    assert!(report.success);
    assert_eq!(report.total_test_cases, Some(55));
    // 40 + 55/55 * 50
    assert_eq!(report.coverage_percentage, Some(90.0));
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_batch_mode_disabled_sends_one_request() {
    let mut harness = TestHarness::new();
    harness.config.generation.batch_mode = false;
    let doc = harness.stage_pdf("brd.pdf", LOGIN_BRD);

    let (report, requests) = harness
        .run(doc, 90, vec![Ok(cases_json(90, "happy"))])
        .await;

    assert!(report.success);
    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].user.contains("EXACTLY 90"));
}

#[tokio::test]
async fn test_short_document_is_insufficient_content() {
    let harness = TestHarness::new();
    let doc = harness.stage_pdf("stub.pdf", &["Draft"]);

    let (report, requests) = harness.run(doc, 55, vec![]).await;

    assert!(!report.success);
    let error = report.error.unwrap();
    assert!(error.starts_with("PDF extraction failed:"));
    assert!(error.contains("scanned image or corrupted"));
    assert!(requests.lock().unwrap().is_empty());
    assert!(harness.staged_files().is_empty());
}

#[tokio::test]
async fn test_write_failure_fails_document() {
    let harness = TestHarness::with_sheets(InMemorySheets::failing_writes());
    let doc = harness.stage_pdf("brd.pdf", LOGIN_BRD);

    let (report, _) = harness.run(doc, 5, vec![Ok(cases_json(5, "happy"))]).await;

    assert!(!report.success);
    assert!(report
        .error
        .unwrap()
        .starts_with("Google Sheets write failed:"));
    assert!(harness.staged_files().is_empty());
}

#[tokio::test]
async fn test_failure_is_isolated_per_document() {
    let harness = TestHarness::new();
    let unsupported = harness.stage_bytes("notes.docx", b"not a pdf");
    let good = harness.stage_pdf("good.pdf", LOGIN_BRD);
    let (pipeline, _) = harness.pipeline(vec![Ok(cases_json(20, "happy"))]);

    let report: BatchReport = pipeline.run_all(vec![Ok(unsupported), Ok(good)], 20).await;

    assert!(!report.success);
    assert_eq!(report.message, "Some files failed to process");
    assert_eq!(report.total_files, 2);
    assert_eq!(report.successful_files, 1);
    assert_eq!(report.failed_files, 1);
    assert_eq!(report.results[0].filename, "notes.docx");
    assert!(report.results[0]
        .error
        .as_deref()
        .unwrap()
        .contains("Unsupported document format"));
    assert_eq!(report.results[1].filename, "good.pdf");
    assert_eq!(report.results[1].total_test_cases, Some(20));
    assert!(harness.staged_files().is_empty());
}

#[tokio::test]
async fn test_report_serializes_like_the_response_surface() {
    let harness = TestHarness::new();
    let doc = harness.stage_pdf("brd.pdf", LOGIN_BRD);
    let (pipeline, _) = harness.pipeline(vec![Ok(cases_json(10, "happy"))]);

    let report = pipeline.run_all(vec![Ok(doc)], 10).await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "All files processed successfully");
    assert_eq!(json["results"][0]["total_test_cases"], 10);
    assert_eq!(json["results"][0]["coverage_percentage"], 90.0);
    assert!(json["results"][0].get("error").is_none());
}
