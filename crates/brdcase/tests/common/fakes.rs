//! In-process stand-ins for the two external APIs.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use brdcase::error::{GenerateError, SheetError};
use brdcase::generator::{ChatClient, ChatRequest, ChatResponse};
use brdcase::sheets::{FormatPlan, Row, SpreadsheetApi, SpreadsheetHandle, WorksheetHandle};

/// A JSON array of `count` well-formed test cases tagged with `tag`.
pub fn cases_json(count: usize, tag: &str) -> String {
    let cases: Vec<serde_json::Value> = (1..=count)
        .map(|i| {
            serde_json::json!({
                "description": format!("{} case {}", tag, i),
                "steps": "1. Open the login page\n2. Fill the form\n3. Click Sign in",
                "expected_result": "The page reacts as described",
                "priority": "High",
            })
        })
        .collect();
    serde_json::Value::Array(cases).to_string()
}

pub type RequestLog = Arc<Mutex<Vec<ChatRequest>>>;

/// Answers each request with the next scripted reply and records what it was asked.
pub struct ScriptedChatClient {
    replies: Mutex<VecDeque<Result<String, GenerateError>>>,
    requests: RequestLog,
}

impl ScriptedChatClient {
    pub fn new(replies: Vec<Result<String, GenerateError>>) -> (Self, RequestLog) {
        let requests = RequestLog::default();
        let client = Self {
            replies: Mutex::new(replies.into()),
            requests: requests.clone(),
        };
        (client, requests)
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GenerateError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.map(|content| ChatResponse {
                content,
                usage: None,
            }),
            None => Err(GenerateError::ApiCallFailed(
                "no scripted reply left".to_string(),
            )),
        }
    }
}

#[derive(Debug, Default)]
pub struct SheetsState {
    /// Tab title to its current cell values, per spreadsheet name.
    pub spreadsheets: HashMap<String, HashMap<String, Vec<Row>>>,
    /// Grid rows requested for each tab, in call order.
    pub requested_rows: Vec<(String, usize)>,
    pub formatted: Vec<String>,
    pub fail_writes: bool,
}

impl SheetsState {
    pub fn tab(&self, spreadsheet: &str, title: &str) -> Option<&Vec<Row>> {
        self.spreadsheets.get(spreadsheet)?.get(title)
    }
}

/// Spreadsheet API backed by maps. Reopening a tab clears its values.
#[derive(Clone, Default)]
pub struct InMemorySheets {
    pub state: Arc<Mutex<SheetsState>>,
}

impl InMemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        let sheets = Self::default();
        sheets.state.lock().unwrap().fail_writes = true;
        sheets
    }
}

#[async_trait]
impl SpreadsheetApi for InMemorySheets {
    async fn open_or_create_spreadsheet(&self, name: &str) -> Result<SpreadsheetHandle, SheetError> {
        self.state
            .lock()
            .unwrap()
            .spreadsheets
            .entry(name.to_string())
            .or_default();
        Ok(SpreadsheetHandle::new(format!("id-{}", name), name))
    }

    async fn open_or_create_worksheet(
        &self,
        spreadsheet: &SpreadsheetHandle,
        title: &str,
        rows: usize,
        _cols: usize,
    ) -> Result<WorksheetHandle, SheetError> {
        let mut state = self.state.lock().unwrap();
        state.requested_rows.push((title.to_string(), rows));

        let tabs = state
            .spreadsheets
            .entry(spreadsheet.title.clone())
            .or_default();
        // An existing tab keeps its grid but loses every value
        let existed = tabs.contains_key(title);
        tabs.insert(title.to_string(), Vec::new());

        Ok(WorksheetHandle {
            sheet_id: tabs.len() as i64,
            title: title.to_string(),
            existed,
        })
    }

    async fn write_rows(
        &self,
        spreadsheet: &SpreadsheetHandle,
        worksheet: &WorksheetHandle,
        rows: &[Row],
    ) -> Result<(), SheetError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(SheetError::WriteFailed("quota exceeded".to_string()));
        }
        let grid = state
            .spreadsheets
            .entry(spreadsheet.title.clone())
            .or_default()
            .entry(worksheet.title.clone())
            .or_default();

        // Values land from A1 over whatever is already there
        for (index, row) in rows.iter().enumerate() {
            match grid.get_mut(index) {
                Some(existing) => {
                    if existing.len() < row.len() {
                        existing.resize(row.len(), String::new());
                    }
                    existing[..row.len()].clone_from_slice(row);
                }
                None => grid.push(row.clone()),
            }
        }
        Ok(())
    }

    async fn apply_format(
        &self,
        _spreadsheet: &SpreadsheetHandle,
        worksheet: &WorksheetHandle,
        _plan: &FormatPlan,
    ) -> Result<(), SheetError> {
        self.state
            .lock()
            .unwrap()
            .formatted
            .push(worksheet.title.clone());
        Ok(())
    }
}
