//! Highlighted copy of the newer workbook
//!
//! Rewrites every sheet of the new workbook through rust_xlsxwriter, applies
//! the highlight format to changed cells and appends a summary sheet.
//! Only values and formulas survive the trip; calamine does not expose
//! source styling.

use crate::error::{SheetDiffError, SheetDiffResult};
use crate::types::{Cell, CellValue, Sheet, Workbook as SourceWorkbook, WorkbookDiff};
use rust_xlsxwriter::{Color, Format, FormatPattern, Formula, Workbook, Worksheet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Default name of the appended summary sheet
pub const SUMMARY_SHEET: &str = "Summary_of_Changes";

/// Excel caps sheet names at 31 characters
const MAX_SHEET_NAME: usize = 31;

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Fill pattern applied to changed cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPattern {
    Solid,
    #[default]
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    DarkDown,
    DarkUp,
    Gray125,
}

impl From<FillPattern> for FormatPattern {
    fn from(pattern: FillPattern) -> Self {
        match pattern {
            FillPattern::Solid => FormatPattern::Solid,
            FillPattern::LightDown => FormatPattern::LightDown,
            FillPattern::LightUp => FormatPattern::LightUp,
            FillPattern::LightGrid => FormatPattern::LightGrid,
            FillPattern::LightTrellis => FormatPattern::LightTrellis,
            FillPattern::DarkDown => FormatPattern::DarkDown,
            FillPattern::DarkUp => FormatPattern::DarkUp,
            FillPattern::Gray125 => FormatPattern::Gray125,
        }
    }
}

/// Look of a changed cell: red light-down fill, bold white font by default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    /// Fill colour as `RRGGBB` hex
    pub fill_color: String,
    /// Font colour as `RRGGBB` hex
    pub font_color: String,
    pub pattern: FillPattern,
    pub bold: bool,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            fill_color: "FF0000".to_string(),
            font_color: "FFFFFF".to_string(),
            pattern: FillPattern::LightDown,
            bold: true,
        }
    }
}

impl HighlightStyle {
    /// Parse `RRGGBB` (optionally `#RRGGBB`) into an RGB integer
    pub fn parse_color(hex: &str) -> SheetDiffResult<u32> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(SheetDiffError::Config(format!(
                "Invalid colour '{}': expected RRGGBB",
                hex
            )));
        }
        u32::from_str_radix(digits, 16)
            .map_err(|e| SheetDiffError::Config(format!("Invalid colour '{}': {}", hex, e)))
    }

    /// Build the rust_xlsxwriter format for changed cells
    pub fn to_format(&self) -> SheetDiffResult<Format> {
        let fill = Color::RGB(Self::parse_color(&self.fill_color)?);
        let font = Color::RGB(Self::parse_color(&self.font_color)?);

        let mut format = Format::new()
            .set_pattern(self.pattern.into())
            .set_foreground_color(fill)
            .set_font_color(font);
        if self.bold {
            format = format.set_bold();
        }
        Ok(format)
    }
}

/// Writes the annotated copy of the newer workbook
pub struct HighlightWriter {
    style: HighlightStyle,
    summary_sheet: String,
}

impl HighlightWriter {
    pub fn new(style: HighlightStyle) -> Self {
        Self {
            style,
            summary_sheet: SUMMARY_SHEET.to_string(),
        }
    }

    /// Override the summary sheet name
    pub fn with_summary_sheet(mut self, name: impl Into<String>) -> Self {
        self.summary_sheet = name.into();
        self
    }

    /// Write `new` with changed cells highlighted plus a summary sheet
    pub fn write(
        &self,
        new: &SourceWorkbook,
        diff: &WorkbookDiff,
        output_path: &Path,
    ) -> SheetDiffResult<()> {
        let highlight = self.style.to_format()?;
        let formats = CellFormats {
            plain: Format::new(),
            plain_date: Format::new().set_num_format(DATE_FORMAT),
            highlight_date: highlight.clone().set_num_format(DATE_FORMAT),
            highlight,
        };

        let mut workbook = Workbook::new();

        for sheet in &new.sheets {
            let changed: HashSet<(u32, u32)> = diff
                .sheet(&sheet.name)
                .map(|s| s.changes.iter().map(|c| (c.cell.row, c.cell.col)).collect())
                .unwrap_or_default();

            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(&sheet.name)
                .map_err(|e| SheetDiffError::Export(format!("Failed to set worksheet name: {}", e)))?;
            Self::write_sheet(worksheet, sheet, &changed, &formats)?;
            debug!(sheet = %sheet.name, highlighted = changed.len(), "wrote sheet");
        }

        let summary_name = unique_sheet_name(&self.summary_sheet, &new.sheet_names());
        self.write_summary(&mut workbook, &summary_name, diff)?;

        workbook
            .save(output_path)
            .map_err(|e| SheetDiffError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    fn write_sheet(
        worksheet: &mut Worksheet,
        sheet: &Sheet,
        changed: &HashSet<(u32, u32)>,
        formats: &CellFormats,
    ) -> SheetDiffResult<()> {
        for ((row, col), cell) in &sheet.cells {
            let format = formats.pick(&cell.value, changed.contains(&(*row, *col)));
            let (r, c) = to_zero_based(*row, *col)?;
            write_cell(worksheet, r, c, cell, format)?;
        }

        // Cleared cells have no source cell but still need the highlight
        for &(row, col) in changed {
            if sheet.get(row, col).is_none() {
                let (r, c) = to_zero_based(row, col)?;
                worksheet
                    .write_blank(r, c, &formats.highlight)
                    .map_err(|e| SheetDiffError::Export(format!("Failed to write cell: {}", e)))?;
            }
        }
        Ok(())
    }

    fn write_summary(
        &self,
        workbook: &mut Workbook,
        name: &str,
        diff: &WorkbookDiff,
    ) -> SheetDiffResult<()> {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(name)
            .map_err(|e| SheetDiffError::Export(format!("Failed to set worksheet name: {}", e)))?;

        worksheet
            .set_column_width(0, 30)
            .and_then(|ws| ws.set_column_width(1, 24))
            .map_err(|e| SheetDiffError::Export(format!("Failed to set column width: {}", e)))?;

        let header_format = Format::new().set_bold();
        worksheet
            .write_string_with_format(0, 0, "Sheet Name", &header_format)
            .map_err(|e| SheetDiffError::Export(format!("Failed to write header: {}", e)))?;
        worksheet
            .write_string_with_format(0, 1, "Change Summary", &header_format)
            .map_err(|e| SheetDiffError::Export(format!("Failed to write header: {}", e)))?;

        for (i, (sheet_name, summary)) in diff.summary_rows().iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet
                .write_string(row, 0, sheet_name)
                .and_then(|ws| ws.write_string(row, 1, summary))
                .map_err(|e| SheetDiffError::Export(format!("Failed to write summary: {}", e)))?;
        }
        Ok(())
    }
}

struct CellFormats {
    plain: Format,
    plain_date: Format,
    highlight: Format,
    highlight_date: Format,
}

impl CellFormats {
    fn pick(&self, value: &CellValue, changed: bool) -> &Format {
        let is_date = matches!(value, CellValue::DateTime(_));
        match (changed, is_date) {
            (true, true) => &self.highlight_date,
            (true, false) => &self.highlight,
            (false, true) => &self.plain_date,
            (false, false) => &self.plain,
        }
    }
}

fn to_zero_based(row: u32, col: u32) -> SheetDiffResult<(u32, u16)> {
    let c = u16::try_from(col.saturating_sub(1))
        .map_err(|_| SheetDiffError::Export(format!("Column {} out of range", col)))?;
    Ok((row.saturating_sub(1), c))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: &Format,
) -> SheetDiffResult<()> {
    let result = if let Some(formula) = &cell.formula {
        let mut formula = Formula::new(formula);
        if !cell.value.is_empty() {
            formula = formula.set_result(cached_result(&cell.value));
        }
        worksheet.write_formula_with_format(row, col, formula, format)
    } else {
        match &cell.value {
            CellValue::Empty => worksheet.write_blank(row, col, format),
            CellValue::Number(n) | CellValue::DateTime(n) => {
                worksheet.write_number_with_format(row, col, *n, format)
            }
            CellValue::Bool(b) => worksheet.write_boolean_with_format(row, col, *b, format),
            CellValue::Text(s) | CellValue::Error(s) | CellValue::Duration(s) => {
                worksheet.write_string_with_format(row, col, s, format)
            }
        }
    };

    result
        .map(|_| ())
        .map_err(|e| SheetDiffError::Export(format!("Failed to write cell: {}", e)))
}

/// Cached formula result in the form Excel stores it
fn cached_result(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Number(n) | CellValue::DateTime(n) => n.to_string(),
        CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        CellValue::Text(s) | CellValue::Error(s) | CellValue::Duration(s) => s.clone(),
    }
}

/// `base` if free, otherwise `base_2`, `base_3`, ... (case-insensitive, 31 chars max)
pub fn unique_sheet_name(base: &str, existing: &[&str]) -> String {
    let taken = |name: &str| existing.iter().any(|e| e.eq_ignore_ascii_case(name));
    let truncate = |s: &str, max: usize| s.chars().take(max).collect::<String>();

    let base = truncate(base, MAX_SHEET_NAME);
    if !taken(base.as_str()) {
        return base;
    }

    let mut n = 2;
    loop {
        let suffix = format!("_{}", n);
        let candidate = format!(
            "{}{}",
            truncate(base.as_str(), MAX_SHEET_NAME - suffix.len()),
            suffix
        );
        if !taken(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}
