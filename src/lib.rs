//! sheetdiff - cell-by-cell spreadsheet workbook comparison
//!
//! Loads two workbooks, scans every common sheet over the larger extent of
//! both grids and reports each differing cell.
//!
//! # Features
//!
//! - Reads .xlsx, .xlsm, .xls, .xlsb and .ods (via calamine)
//! - Picks the newest pair in a directory by version tag or filename date
//! - Console summary, text and JSON reports
//! - Highlighted copy of the newer workbook with a summary sheet
//! - Optional zip bundle of all artifacts
//!
//! # Example
//!
//! ```no_run
//! use sheetdiff::compare::{compare_workbooks, CompareOptions};
//! use sheetdiff::excel::WorkbookReader;
//!
//! let old = WorkbookReader::open("Workbook V1.7.0.xlsx")?;
//! let new = WorkbookReader::open("Workbook V1.8.0.xlsx")?;
//!
//! let diff = compare_workbooks(&old, &new, &CompareOptions::default());
//! for (sheet, summary) in diff.summary_rows() {
//!     println!("{sheet}: {summary}");
//! }
//! # Ok::<(), sheetdiff::error::SheetDiffError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod compare;
pub mod config;
pub mod discovery;
pub mod error;
pub mod excel;
pub mod output;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use error::{SheetDiffError, SheetDiffResult};
pub use types::{
    Cell, CellChange, CellRef, CellValue, Sheet, SheetDiff, SheetStatus, Workbook, WorkbookDiff,
};
