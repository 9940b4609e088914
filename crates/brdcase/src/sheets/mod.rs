pub mod auth;
pub mod client;
pub mod format;
pub mod naming;
pub mod rows;
pub mod writer;

pub use client::{
    spreadsheet_url, GoogleSheetsClient, SpreadsheetApi, SpreadsheetHandle, WorksheetHandle,
};
pub use format::FormatPlan;
pub use naming::{sanitize_filename, worksheet_name, worksheet_name_now};
pub use rows::{build_rows, test_id, Row, HEADERS};
pub use writer::SheetWriter;
