//! JSON report file

use crate::error::SheetDiffResult;
use crate::types::WorkbookDiff;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    total_changes: usize,
    #[serde(flatten)]
    diff: &'a WorkbookDiff,
}

/// Serialise the diff with a generation timestamp
pub fn render_json_report(diff: &WorkbookDiff, generated: NaiveDateTime) -> SheetDiffResult<String> {
    let report = JsonReport {
        generated: generated.format("%Y-%m-%dT%H:%M:%S").to_string(),
        total_changes: diff.total_changes(),
        diff,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn write_json_report(
    output: &Path,
    diff: &WorkbookDiff,
    generated: NaiveDateTime,
) -> SheetDiffResult<()> {
    fs::write(output, render_json_report(diff, generated)?)?;
    Ok(())
}
