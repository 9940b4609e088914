//! Table-driven tests for configuration loading and validation.

use brdcase::config::{load_config_from_str, ExtractionMode};

/// Represents a single config loading test case.
struct ConfigTestCase {
    /// Test case name for identification.
    name: &'static str,
    /// The config JSON content to test.
    config_json: &'static str,
    /// Whether loading should succeed.
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

const JSON_CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "valid_minimal",
        config_json: r#"{ "version": "1.0" }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_full",
        config_json: r#"{
            "version": "1.0",
            "upload_directory": "/srv/uploads",
            "max_upload_bytes": 8388608,
            "allowed_extensions": ["pdf"],
            "coverage_target": 85,
            "extraction": { "mode": "content_stream", "min_chars": 200 },
            "generation": {
                "base_url": "https://llm.internal/v1",
                "model": "gpt-4o",
                "api_key_env": "LLM_KEY",
                "max_tokens": 6000,
                "temperature": 0.3,
                "timeout_secs": 90,
                "target_count": 90,
                "batch_mode": true
            },
            "sheets": {
                "credentials_file": "/etc/brdcase/sa.json",
                "spreadsheet_name": "QA Cases",
                "test_id_prefix": "UI-",
                "max_worksheet_name_len": 60,
                "timeout_secs": 20
            }
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_null_api_key_env",
        config_json: r#"{ "version": "1.0", "generation": { "api_key_env": null } }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "missing_version",
        config_json: r#"{ "upload_directory": "uploads" }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unsupported_version",
        config_json: r#"{ "version": "2.0" }"#,
        should_succeed: false,
        expected_error: Some("Unsupported config version"),
    },
    ConfigTestCase {
        name: "unknown_top_level_field",
        config_json: r#"{ "version": "1.0", "ocr": { "enabled": true } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unknown_extraction_mode",
        config_json: r#"{ "version": "1.0", "extraction": { "mode": "ocr" } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "zero_target_count",
        config_json: r#"{ "version": "1.0", "generation": { "target_count": 0 } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "worksheet_name_too_short_for_timestamp",
        config_json: r#"{ "version": "1.0", "sheets": { "max_worksheet_name_len": 12 } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "non_http_base_url",
        config_json: r#"{ "version": "1.0", "generation": { "base_url": "ftp://llm" } }"#,
        should_succeed: false,
        expected_error: Some("must be an http(s) URL"),
    },
    ConfigTestCase {
        name: "blank_spreadsheet_name",
        config_json: r#"{ "version": "1.0", "sheets": { "spreadsheet_name": "   " } }"#,
        should_succeed: false,
        expected_error: Some("spreadsheet_name cannot be empty"),
    },
    ConfigTestCase {
        name: "invalid_json",
        config_json: r#"{ "version": "1.0", "#,
        should_succeed: false,
        expected_error: Some("Failed to parse config JSON"),
    },
];

#[test]
fn test_json_config_loading() {
    for test_case in JSON_CONFIG_TESTS {
        let result = load_config_from_str(test_case.config_json);

        if test_case.should_succeed {
            assert!(
                result.is_ok(),
                "Test '{}': Expected success but got error: {:?}",
                test_case.name,
                result.err()
            );
        } else {
            assert!(
                result.is_err(),
                "Test '{}': Expected error but got success",
                test_case.name
            );

            if let Some(expected_error) = test_case.expected_error {
                let error_msg = result.err().unwrap().to_string();
                assert!(
                    error_msg.contains(expected_error),
                    "Test '{}': Expected error containing '{}', got '{}'",
                    test_case.name,
                    expected_error,
                    error_msg
                );
            }
        }
    }
}

#[test]
fn test_full_config_values() {
    let config = load_config_from_str(JSON_CONFIG_TESTS[1].config_json).unwrap();

    assert_eq!(config.extraction.mode, ExtractionMode::ContentStream);
    assert_eq!(config.extraction.min_chars, 200);
    assert_eq!(config.generation.target_count, 90);
    assert_eq!(config.generation.api_key_env.as_deref(), Some("LLM_KEY"));
    assert_eq!(config.sheets.test_id_prefix, "UI-");
    assert_eq!(config.sheets.max_worksheet_name_len, 60);
    assert_eq!(config.coverage_target, 85);
}

#[test]
fn test_null_api_key_env_disables_env_lookup() {
    let config = load_config_from_str(JSON_CONFIG_TESTS[2].config_json).unwrap();
    assert!(config.generation.api_key_env.is_none());
}
