//! Presentation formatting applied after the data write.

use serde_json::{json, Value};

use crate::sheets::rows::{COLUMN_COUNT, HEADER_ROW_COUNT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const PURPLE: Color = Color::rgb(0.4, 0.2, 0.8);
    pub const BLUE: Color = Color::rgb(0.2, 0.4, 0.8);

    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    fn to_json(self) -> Value {
        json!({ "red": self.red, "green": self.green, "blue": self.blue })
    }
}

/// Style of one row band, always spanning every data column.
#[derive(Debug, Clone, PartialEq)]
pub struct BandStyle {
    /// Zero-based row index.
    pub row: usize,
    pub background: Color,
    pub foreground: Color,
    pub bold: bool,
    pub font_size: Option<u32>,
    pub merge: bool,
    pub height_px: Option<u32>,
}

/// Everything the sheet writer formats: title band, header band, frozen rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatPlan {
    pub title: BandStyle,
    pub header: BandStyle,
    pub frozen_rows: usize,
}

impl Default for FormatPlan {
    fn default() -> Self {
        Self {
            title: BandStyle {
                row: 0,
                background: Color::PURPLE,
                foreground: Color::WHITE,
                bold: true,
                font_size: Some(14),
                merge: true,
                height_px: Some(50),
            },
            header: BandStyle {
                row: HEADER_ROW_COUNT - 1,
                background: Color::BLUE,
                foreground: Color::WHITE,
                bold: true,
                font_size: None,
                merge: false,
                height_px: None,
            },
            frozen_rows: HEADER_ROW_COUNT,
        }
    }
}

impl FormatPlan {
    /// Sheets API `batchUpdate` requests for the worksheet `sheet_id`.
    pub fn to_requests(&self, sheet_id: i64) -> Vec<Value> {
        let mut requests = Vec::new();
        for band in [&self.title, &self.header] {
            band_requests(band, sheet_id, &mut requests);
        }

        requests.push(json!({
            "updateSheetProperties": {
                "properties": {
                    "sheetId": sheet_id,
                    "gridProperties": { "frozenRowCount": self.frozen_rows },
                },
                "fields": "gridProperties.frozenRowCount",
            }
        }));

        requests
    }
}

fn band_range(band: &BandStyle, sheet_id: i64) -> Value {
    json!({
        "sheetId": sheet_id,
        "startRowIndex": band.row,
        "endRowIndex": band.row + 1,
        "startColumnIndex": 0,
        "endColumnIndex": COLUMN_COUNT,
    })
}

fn band_requests(band: &BandStyle, sheet_id: i64, requests: &mut Vec<Value>) {
    if band.merge {
        requests.push(json!({
            "mergeCells": {
                "range": band_range(band, sheet_id),
                "mergeType": "MERGE_ALL",
            }
        }));
    }

    let mut text_format = json!({
        "bold": band.bold,
        "foregroundColor": band.foreground.to_json(),
    });
    if let Some(size) = band.font_size {
        text_format["fontSize"] = json!(size);
    }

    requests.push(json!({
        "repeatCell": {
            "range": band_range(band, sheet_id),
            "cell": {
                "userEnteredFormat": {
                    "backgroundColor": band.background.to_json(),
                    "textFormat": text_format,
                    "horizontalAlignment": "CENTER",
                    "verticalAlignment": "MIDDLE",
                }
            },
            "fields": "userEnteredFormat(backgroundColor,textFormat,horizontalAlignment,verticalAlignment)",
        }
    }));

    if let Some(height) = band.height_px {
        requests.push(json!({
            "updateDimensionProperties": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "startIndex": band.row,
                    "endIndex": band.row + 1,
                },
                "properties": { "pixelSize": height },
                "fields": "pixelSize",
            }
        }));
    }
}
