use tracing::{info, warn, Instrument};

use crate::error::SheetError;
use crate::model::{TestCase, WorksheetResult};
use crate::sheets::client::{SpreadsheetApi, SpreadsheetHandle, WorksheetHandle};
use crate::sheets::format::FormatPlan;
use crate::sheets::rows::{build_rows, HEADER_ROW_COUNT};

/// Columns given to a newly created tab.
pub const NEW_WORKSHEET_COLUMNS: usize = 10;

/// Minimum rows given to a newly created tab.
pub const NEW_WORKSHEET_MIN_ROWS: usize = 150;

/// Writes test cases into one tab of a named spreadsheet.
pub struct SheetWriter {
    api: Box<dyn SpreadsheetApi>,
    spreadsheet_name: String,
    format: FormatPlan,
}

impl SheetWriter {
    pub fn new(api: Box<dyn SpreadsheetApi>, spreadsheet_name: impl Into<String>) -> Self {
        Self {
            api,
            spreadsheet_name: spreadsheet_name.into(),
            format: FormatPlan::default(),
        }
    }

    pub fn spreadsheet_name(&self) -> &str {
        &self.spreadsheet_name
    }

    /// Replaces the contents of `worksheet_name` with the given test cases.
    ///
    /// `source_label` titles the sheet; when empty the worksheet name is used.
    /// Formatting is best effort and never fails the write.
    pub async fn write(
        &self,
        test_cases: &[TestCase],
        worksheet_name: &str,
        source_label: &str,
        id_prefix: &str,
    ) -> Result<WorksheetResult, SheetError> {
        let label = if source_label.trim().is_empty() {
            worksheet_name
        } else {
            source_label
        };

        let span = tracing::info_span!(
            "sheets.write",
            worksheet = %worksheet_name,
            test_cases = test_cases.len()
        );

        async {
            let spreadsheet = self
                .api
                .open_or_create_spreadsheet(&self.spreadsheet_name)
                .await?;

            let rows = build_rows(test_cases, label, id_prefix);
            let grid_rows = NEW_WORKSHEET_MIN_ROWS.max(rows.len() + 10);
            let worksheet = self
                .api
                .open_or_create_worksheet(
                    &spreadsheet,
                    worksheet_name,
                    grid_rows,
                    NEW_WORKSHEET_COLUMNS,
                )
                .await?;

            info!("Writing {} rows to worksheet", rows.len());
            self.api.write_rows(&spreadsheet, &worksheet, &rows).await?;

            self.apply_format(&spreadsheet, &worksheet).await;

            info!(
                spreadsheet = %self.spreadsheet_name,
                data_rows = rows.len() - HEADER_ROW_COUNT,
                url = %spreadsheet.url,
                "Worksheet written"
            );

            Ok::<_, SheetError>(WorksheetResult {
                worksheet_name: worksheet.title,
                rows_written: rows.len(),
                url: spreadsheet.url,
            })
        }
        .instrument(span)
        .await
    }

    async fn apply_format(&self, spreadsheet: &SpreadsheetHandle, worksheet: &WorksheetHandle) {
        if let Err(e) = self
            .api
            .apply_format(spreadsheet, worksheet, &self.format)
            .await
        {
            warn!("Could not apply formatting: {}", e);
        }
    }
}
