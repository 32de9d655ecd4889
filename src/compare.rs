//! Cell-by-cell workbook comparison
//!
//! Every sheet pair is scanned row-major over the larger extent of the two
//! grids. Cells outside a grid's used range read as [`CellValue::Empty`].

use crate::types::{
    Cell, CellChange, CellRef, CellValue, Sheet, SheetDiff, SheetStatus, Workbook, WorkbookDiff,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Knobs for value equality
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Compare formula text instead of cached values where a formula exists
    pub compare_formulas: bool,
    /// Numbers within this absolute distance are equal
    pub numeric_tolerance: f64,
}

/// Compare every sheet of `old` against `new`
pub fn compare_workbooks(
    old: &Workbook,
    new: &Workbook,
    options: &CompareOptions,
) -> WorkbookDiff {
    let mut sheets = Vec::with_capacity(old.sheets.len());

    for old_sheet in &old.sheets {
        let Some(new_sheet) = new.sheet(&old_sheet.name) else {
            debug!(sheet = %old_sheet.name, "sheet missing in new workbook");
            sheets.push(SheetDiff {
                name: old_sheet.name.clone(),
                status: SheetStatus::MissingInNew,
                changes: Vec::new(),
            });
            continue;
        };

        let changes = compare_sheets(old_sheet, new_sheet, options);
        debug!(sheet = %old_sheet.name, changes = changes.len(), "compared sheet");
        sheets.push(SheetDiff {
            name: old_sheet.name.clone(),
            status: SheetStatus::Compared,
            changes,
        });
    }

    for new_sheet in &new.sheets {
        if old.sheet(&new_sheet.name).is_none() {
            debug!(sheet = %new_sheet.name, "sheet added in new workbook");
            sheets.push(SheetDiff {
                name: new_sheet.name.clone(),
                status: SheetStatus::AddedInNew,
                changes: Vec::new(),
            });
        }
    }

    WorkbookDiff {
        old_path: old.path.clone(),
        new_path: new.path.clone(),
        sheets,
    }
}

/// Row-major scan of two sheets up to the larger extent of either
pub fn compare_sheets(old: &Sheet, new: &Sheet, options: &CompareOptions) -> Vec<CellChange> {
    let max_row = old.max_row.max(new.max_row);
    let max_col = old.max_col.max(new.max_col);

    let mut changes = Vec::new();
    for row in 1..=max_row {
        for col in 1..=max_col {
            let old_cell = old.get(row, col);
            let new_cell = new.get(row, col);
            let old_value = comparable(old_cell, options);
            let new_value = comparable(new_cell, options);

            if !values_equal(&old_value, &new_value, options.numeric_tolerance) {
                changes.push(CellChange {
                    cell: CellRef::new(row, col),
                    old: old_value,
                    new: new_value,
                });
            }
        }
    }
    changes
}

/// The value a cell is judged by: formula text when requested, else its value
fn comparable(cell: Option<&Cell>, options: &CompareOptions) -> CellValue {
    match cell {
        None => CellValue::Empty,
        Some(Cell {
            formula: Some(formula),
            ..
        }) if options.compare_formulas => CellValue::Text(formula.clone()),
        Some(cell) => cell.value.clone(),
    }
}

/// Typed equality; numbers honour `tolerance`, mixed types never match
pub fn values_equal(a: &CellValue, b: &CellValue, tolerance: f64) -> bool {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y))
        | (CellValue::DateTime(x), CellValue::DateTime(y)) => {
            x == y || (x - y).abs() <= tolerance
        }
        _ => a == b,
    }
}
