use serde_json::Value;

use crate::error::GenerateError;
use crate::model::{Priority, TestCase};

const REQUIRED_FIELDS: [&str; 4] = ["description", "steps", "expected_result", "priority"];

/// Removes a surrounding Markdown code fence (```` ```json ... ``` ````) if present.
pub fn strip_code_fence(response: &str) -> &str {
    let mut text = response.trim();

    if text.starts_with("```") {
        text = match text.split_once('\n') {
            Some((_, rest)) => rest,
            None => &text[3..],
        };
    }
    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }

    text.trim()
}

/// Parses one batch response. Any malformed record rejects the whole batch.
pub fn parse_test_cases(response: &str) -> Result<Vec<TestCase>, GenerateError> {
    let cleaned = strip_code_fence(response);

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| GenerateError::ApiResponseMalformed(format!("Failed to parse JSON: {}", e)))?;

    let records = value.as_array().ok_or_else(|| {
        GenerateError::ApiResponseMalformed("Response is not a JSON array".to_string())
    })?;

    records
        .iter()
        .enumerate()
        .map(|(i, record)| parse_record(i + 1, record))
        .collect()
}

fn parse_record(position: usize, record: &Value) -> Result<TestCase, GenerateError> {
    let object = record.as_object().ok_or_else(|| {
        GenerateError::ApiResponseMalformed(format!("Test case {} is not a JSON object", position))
    })?;

    let mut fields = [""; 4];
    for (slot, name) in fields.iter_mut().zip(REQUIRED_FIELDS) {
        let value = object.get(name).ok_or_else(|| {
            GenerateError::ApiResponseMalformed(format!(
                "Test case {} missing required field: {}",
                position, name
            ))
        })?;
        let text = value.as_str().map(str::trim).unwrap_or("");
        if text.is_empty() {
            return Err(GenerateError::ApiResponseMalformed(format!(
                "Test case {} field '{}' must be a non-empty string",
                position, name
            )));
        }
        *slot = text;
    }

    let [description, steps, expected_result, priority] = fields;
    let priority: Priority = priority.parse().map_err(|e| {
        GenerateError::ApiResponseMalformed(format!("Test case {}: {}", position, e))
    })?;

    Ok(TestCase {
        description: description.to_string(),
        steps: steps.to_string(),
        expected_result: expected_result.to_string(),
        priority,
    })
}
