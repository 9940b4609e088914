use crate::model::TestCase;

pub const HEADERS: [&str; COLUMN_COUNT] = [
    "Test ID",
    "Description",
    "Steps",
    "Expected Result",
    "Priority",
    "Result",
];

pub const COLUMN_COUNT: usize = 6;

/// Title, spacer and header rows above the data.
pub const HEADER_ROW_COUNT: usize = 3;

pub const TITLE_PREFIX: &str = "📋 ";

pub type Row = Vec<String>;

/// `{prefix}{index}` with the index zero-padded to three digits (1-based).
pub fn test_id(prefix: &str, index: usize) -> String {
    format!("{}{:03}", prefix, index)
}

/// Lays out the full worksheet: title, blank spacer, header, then one row per
/// test case numbered from 1 in input order.
pub fn build_rows(test_cases: &[TestCase], source_label: &str, id_prefix: &str) -> Vec<Row> {
    let mut rows = Vec::with_capacity(test_cases.len() + HEADER_ROW_COUNT);

    let mut title = blank_row();
    title[0] = format!("{}{}", TITLE_PREFIX, source_label);
    rows.push(title);
    rows.push(blank_row());
    rows.push(HEADERS.iter().map(|h| h.to_string()).collect());

    for (i, tc) in test_cases.iter().enumerate() {
        rows.push(vec![
            test_id(id_prefix, i + 1),
            tc.description.clone(),
            tc.steps.clone(),
            tc.expected_result.clone(),
            tc.priority.to_string(),
            String::new(),
        ]);
    }

    rows
}

fn blank_row() -> Row {
    vec![String::new(); COLUMN_COUNT]
}
