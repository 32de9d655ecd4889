//! Workbook reader - spreadsheet file → in-memory grid

use crate::error::{SheetDiffError, SheetDiffResult};
use crate::types::{Cell, CellValue, Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads .xlsx/.xlsm/.xls/.xlsb/.ods files into a [`Workbook`]
pub struct WorkbookReader {
    path: PathBuf,
}

impl WorkbookReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Shorthand for `WorkbookReader::new(path).read()`
    pub fn open<P: AsRef<Path>>(path: P) -> SheetDiffResult<Workbook> {
        Self::new(path).read()
    }

    /// Read every sheet, values and formulas
    pub fn read(&self) -> SheetDiffResult<Workbook> {
        if !self.path.exists() {
            return Err(SheetDiffError::Workbook(format!(
                "File not found: {}",
                self.path.display()
            )));
        }

        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            SheetDiffError::Workbook(format!(
                "Failed to open {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut result = Workbook::new(&self.path);

        for sheet_name in workbook.sheet_names() {
            let range = match workbook.worksheet_range(&sheet_name) {
                Ok(range) => range,
                Err(e) => {
                    // Chart sheets and macro sheets have no cell range
                    warn!(sheet = %sheet_name, error = %e, "skipping unreadable sheet");
                    continue;
                }
            };
            let formulas = workbook.worksheet_formula(&sheet_name).ok();

            let sheet = Self::build_sheet(&sheet_name, &range, formulas.as_ref());
            debug!(
                sheet = %sheet.name,
                cells = sheet.cells.len(),
                max_row = sheet.max_row,
                max_col = sheet.max_col,
                "loaded sheet"
            );
            result.add_sheet(sheet);
        }

        Ok(result)
    }

    /// Convert calamine ranges into an absolute, 1-based sparse grid
    fn build_sheet(name: &str, range: &Range<Data>, formulas: Option<&Range<String>>) -> Sheet {
        let mut sheet = Sheet::new(name);

        // calamine ranges begin at the first used cell, not at A1
        if let Some((start_row, start_col)) = range.start() {
            for (row, col, data) in range.cells() {
                let value = Self::convert_value(data);
                if value.is_empty() {
                    continue;
                }
                let abs_row = start_row + row as u32 + 1;
                let abs_col = start_col + col as u32 + 1;
                sheet.set(abs_row, abs_col, Cell::new(value));
            }
        }

        if let Some(formulas) = formulas {
            if let Some((start_row, start_col)) = formulas.start() {
                for (row, col, formula) in formulas.cells() {
                    if formula.is_empty() {
                        continue;
                    }
                    let abs_row = start_row + row as u32 + 1;
                    let abs_col = start_col + col as u32 + 1;
                    let formula = if formula.starts_with('=') {
                        formula.clone()
                    } else {
                        format!("={}", formula)
                    };
                    let value = sheet
                        .get(abs_row, abs_col)
                        .map(|c| c.value.clone())
                        .unwrap_or_default();
                    sheet.set(abs_row, abs_col, Cell::with_formula(value, formula));
                }
            }
        }

        sheet
    }

    /// Map a calamine cell onto [`CellValue`]
    pub(crate) fn convert_value(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Duration(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}
