//! Plain-text report file

use super::summary_table;
use crate::error::SheetDiffResult;
use crate::types::{CellChange, SheetStatus, WorkbookDiff};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

/// One change as `Sheet!B2: 'old' -> 'new'`
pub fn format_change(sheet: &str, change: &CellChange) -> String {
    format!(
        "{}!{}: '{}' -> '{}'",
        sheet, change.cell, change.old, change.new
    )
}

/// Full report: header, every change per sheet, then the summary table
pub fn render_text_report(diff: &WorkbookDiff, generated: NaiveDateTime) -> String {
    let mut content = String::new();
    content.push_str("Workbook Comparison Report\n");
    content.push_str(&format!("Old file: {}\n", diff.old_path.display()));
    content.push_str(&format!("New file: {}\n", diff.new_path.display()));
    content.push_str(&format!(
        "Generated: {}\n",
        generated.format("%Y-%m-%d %H:%M:%S")
    ));
    content.push_str(&format!("Total changed cells: {}\n", diff.total_changes()));

    for sheet in &diff.sheets {
        content.push('\n');
        content.push_str(&format!("Sheet: {} ({})\n", sheet.name, sheet.summary()));
        if sheet.status == SheetStatus::Compared {
            for change in &sheet.changes {
                content.push_str("  ");
                content.push_str(&format_change(&sheet.name, change));
                content.push('\n');
            }
        }
    }

    content.push_str("\nSummary of Changes\n");
    content.push_str(&summary_table(&diff.summary_rows()));
    content.push('\n');
    content
}

/// Write [`render_text_report`] to `output`
pub fn write_text_report(
    output: &Path,
    diff: &WorkbookDiff,
    generated: NaiveDateTime,
) -> SheetDiffResult<()> {
    fs::write(output, render_text_report(diff, generated))?;
    Ok(())
}
