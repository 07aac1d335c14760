// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Spreadsheet extractor (XLSX/XLS)

use calamine::{Data, DataType};
use std::path::Path;

use super::TextExtractor;
use crate::{RenamerError, Result};

/// Flattens every sheet into space-separated rows
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpreadsheetExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for SpreadsheetExtractor {
    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["xlsx", "xls"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        use calamine::{open_workbook_auto, Reader};

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| RenamerError::Extraction(format!("Failed to open spreadsheet: {}", e)))?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let mut lines = Vec::new();

        for sheet_name in &sheet_names {
            let range = workbook.worksheet_range(sheet_name).map_err(|e| {
                RenamerError::Extraction(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;

            for row in range.rows() {
                lines.push(format_row(row));
            }
        }

        Ok(lines.join("\n"))
    }
}

/// Cells joined with single spaces; empty cells render as blanks
pub fn format_row(cells: &[Data]) -> String {
    cells.iter()
        .map(format_cell)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Date cells as `YYYY-MM-DD HH:MM:SS`; calamine displays them as the raw
/// Excel serial number otherwise
fn format_cell(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string(),
    }
}
