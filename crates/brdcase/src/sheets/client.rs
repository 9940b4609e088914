//! Spreadsheet API access: the [`SpreadsheetApi`] seam and its Google Sheets
//! implementation.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Method, Url};
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::config::schema::SheetsConfig;
use crate::error::SheetError;
use crate::sanitize::truncate_body;
use crate::sheets::auth::{ServiceAccountKey, TokenProvider};
use crate::sheets::format::FormatPlan;
use crate::sheets::rows::Row;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub fn spreadsheet_url(id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{}", id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetHandle {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl SpreadsheetHandle {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            url: spreadsheet_url(&id),
            id,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetHandle {
    pub sheet_id: i64,
    pub title: String,
    /// True when the tab already existed and was cleared.
    pub existed: bool,
}

#[async_trait]
pub trait SpreadsheetApi: Send + Sync {
    /// Opens the spreadsheet titled `name`, creating it when none exists.
    async fn open_or_create_spreadsheet(&self, name: &str)
        -> Result<SpreadsheetHandle, SheetError>;

    /// Opens and clears the tab titled `title`, or adds it with at least
    /// `rows` x `cols` cells.
    async fn open_or_create_worksheet(
        &self,
        spreadsheet: &SpreadsheetHandle,
        title: &str,
        rows: usize,
        cols: usize,
    ) -> Result<WorksheetHandle, SheetError>;

    /// Writes `rows` in one call, starting at A1.
    async fn write_rows(
        &self,
        spreadsheet: &SpreadsheetHandle,
        worksheet: &WorksheetHandle,
        rows: &[Row],
    ) -> Result<(), SheetError>;

    async fn apply_format(
        &self,
        spreadsheet: &SpreadsheetHandle,
        worksheet: &WorksheetHandle,
        plan: &FormatPlan,
    ) -> Result<(), SheetError>;
}

/// Google Sheets v4 client authenticated as a service account.
pub struct GoogleSheetsClient {
    client: Client,
    tokens: TokenProvider,
    sheets_base: String,
    drive_base: String,
}

impl GoogleSheetsClient {
    /// Loads the service-account key named in `config`. A missing or invalid
    /// key file is `CredentialsMissing`.
    pub fn from_config(config: &SheetsConfig) -> Result<Self, SheetError> {
        let key = ServiceAccountKey::from_file(Path::new(&config.credentials_file))?;
        Self::new(key, Duration::from_secs(config.timeout_secs))
    }

    pub fn new(key: ServiceAccountKey, timeout: Duration) -> Result<Self, SheetError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                SheetError::SpreadsheetUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        let tokens = TokenProvider::new(client.clone(), key)?;
        info!(
            "Google Sheets client initialized for {}",
            tokens.client_email()
        );

        Ok(Self {
            client,
            tokens,
            sheets_base: SHEETS_API_BASE.to_string(),
            drive_base: DRIVE_API_BASE.to_string(),
        })
    }

    /// `{sheets_base}/spreadsheets/{segments...}`, each segment percent-encoded.
    fn sheets_url(&self, segments: &[&str]) -> Result<Url, SheetError> {
        let mut url = Url::parse(&self.sheets_base).map_err(|e| {
            SheetError::SpreadsheetUnavailable(format!("Invalid Sheets API URL: {}", e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                SheetError::SpreadsheetUnavailable("Sheets API URL cannot be a base".to_string())
            })?
            .push("spreadsheets")
            .extend(segments);
        Ok(url)
    }

    async fn call(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, &str)],
        body: Option<Value>,
        fail: fn(String) -> SheetError,
    ) -> Result<Value, SheetError> {
        let token = self.tokens.access_token().await?;
        debug!("{} {}", method, url.path());

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(token.expose_secret())
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| map_transport_error(e, fail))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(fail(format!(
                "API error ({}): {}",
                status,
                truncate_body(&text)
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, fail))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| fail(format!("Failed to parse response: {}", e)))
    }

    async fn find_spreadsheet(&self, name: &str) -> Result<Option<String>, SheetError> {
        let url = Url::parse(&format!("{}/files", self.drive_base)).map_err(|e| {
            SheetError::SpreadsheetUnavailable(format!("Invalid Drive API URL: {}", e))
        })?;
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            escape_query_literal(name),
            SPREADSHEET_MIME_TYPE
        );

        let response = self
            .call(
                Method::GET,
                url,
                &[("q", query.as_str()), ("fields", "files(id,name)")],
                None,
                SheetError::SpreadsheetUnavailable,
            )
            .await?;

        Ok(response["files"]
            .as_array()
            .and_then(|files| files.first())
            .and_then(|f| f["id"].as_str())
            .map(str::to_string))
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Value>,
        fail: fn(String) -> SheetError,
    ) -> Result<Value, SheetError> {
        let segment = format!("{}:batchUpdate", spreadsheet_id);
        let url = self.sheets_url(&[&segment])?;
        self.call(
            Method::POST,
            url,
            &[],
            Some(json!({ "requests": requests })),
            fail,
        )
        .await
    }
}

fn map_transport_error(e: reqwest::Error, fail: fn(String) -> SheetError) -> SheetError {
    if e.is_timeout() {
        SheetError::Timeout(e.to_string())
    } else {
        fail(format!("Request failed: {}", e))
    }
}

/// Escapes a value for a single-quoted Drive query literal.
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// A1-notation prefix for a tab, quoted so any title is accepted.
pub fn quote_tab(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Finds `title` among the `sheets[].properties` of a spreadsheet.
fn find_tab(spreadsheet: &Value, title: &str) -> Option<(i64, usize)> {
    spreadsheet["sheets"].as_array()?.iter().find_map(|sheet| {
        let props = &sheet["properties"];
        if props["title"].as_str()? != title {
            return None;
        }
        let sheet_id = props["sheetId"].as_i64().unwrap_or(0);
        let row_count = props["gridProperties"]["rowCount"].as_u64().unwrap_or(0) as usize;
        Some((sheet_id, row_count))
    })
}

#[async_trait]
impl SpreadsheetApi for GoogleSheetsClient {
    async fn open_or_create_spreadsheet(
        &self,
        name: &str,
    ) -> Result<SpreadsheetHandle, SheetError> {
        if let Some(id) = self.find_spreadsheet(name).await? {
            info!("Opened existing spreadsheet: {}", name);
            return Ok(SpreadsheetHandle::new(id, name));
        }

        let url = self.sheets_url(&[])?;
        let created = self
            .call(
                Method::POST,
                url,
                &[],
                Some(json!({ "properties": { "title": name } })),
                SheetError::SpreadsheetUnavailable,
            )
            .await?;

        let id = created["spreadsheetId"].as_str().ok_or_else(|| {
            SheetError::SpreadsheetUnavailable(
                "Failed to create spreadsheet: response has no spreadsheetId".to_string(),
            )
        })?;

        info!("Created new spreadsheet: {}", name);
        Ok(SpreadsheetHandle::new(id, name))
    }

    async fn open_or_create_worksheet(
        &self,
        spreadsheet: &SpreadsheetHandle,
        title: &str,
        rows: usize,
        cols: usize,
    ) -> Result<WorksheetHandle, SheetError> {
        let url = self.sheets_url(&[&spreadsheet.id])?;
        let current = self
            .call(
                Method::GET,
                url,
                &[("fields", "sheets.properties")],
                None,
                SheetError::SpreadsheetUnavailable,
            )
            .await?;

        if let Some((sheet_id, row_count)) = find_tab(&current, title) {
            info!("Worksheet '{}' already exists, will overwrite", title);

            let segment = format!("{}:clear", quote_tab(title));
            let url = self.sheets_url(&[&spreadsheet.id, "values", &segment])?;
            self.call(
                Method::POST,
                url,
                &[],
                Some(json!({})),
                SheetError::SpreadsheetUnavailable,
            )
            .await?;

            if row_count < rows {
                let grow = json!({
                    "updateSheetProperties": {
                        "properties": {
                            "sheetId": sheet_id,
                            "gridProperties": { "rowCount": rows },
                        },
                        "fields": "gridProperties.rowCount",
                    }
                });
                self.batch_update(&spreadsheet.id, vec![grow], SheetError::SpreadsheetUnavailable)
                    .await?;
            }

            return Ok(WorksheetHandle {
                sheet_id,
                title: title.to_string(),
                existed: true,
            });
        }

        let add = json!({
            "addSheet": {
                "properties": {
                    "title": title,
                    "gridProperties": { "rowCount": rows, "columnCount": cols },
                }
            }
        });
        let reply = self
            .batch_update(&spreadsheet.id, vec![add], SheetError::SpreadsheetUnavailable)
            .await?;

        let sheet_id = reply["replies"][0]["addSheet"]["properties"]["sheetId"]
            .as_i64()
            .ok_or_else(|| {
                SheetError::SpreadsheetUnavailable(
                    "Failed to create worksheet: response has no sheetId".to_string(),
                )
            })?;

        info!("Created new worksheet: {}", title);
        Ok(WorksheetHandle {
            sheet_id,
            title: title.to_string(),
            existed: false,
        })
    }

    async fn write_rows(
        &self,
        spreadsheet: &SpreadsheetHandle,
        worksheet: &WorksheetHandle,
        rows: &[Row],
    ) -> Result<(), SheetError> {
        let range = format!("{}!A1", quote_tab(&worksheet.title));
        let url = self.sheets_url(&[&spreadsheet.id, "values", &range])?;

        self.call(
            Method::PUT,
            url,
            &[("valueInputOption", "RAW")],
            Some(json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": rows,
            })),
            SheetError::WriteFailed,
        )
        .await?;

        Ok(())
    }

    async fn apply_format(
        &self,
        spreadsheet: &SpreadsheetHandle,
        worksheet: &WorksheetHandle,
        plan: &FormatPlan,
    ) -> Result<(), SheetError> {
        self.batch_update(
            &spreadsheet.id,
            plan.to_requests(worksheet.sheet_id),
            SheetError::WriteFailed,
        )
        .await?;
        Ok(())
    }
}
