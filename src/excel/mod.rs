//! Excel I/O
//!
//! - Read: any calamine-supported workbook → [`crate::types::Workbook`]
//! - Write: highlighted .xlsx copy of the newer workbook

mod highlight;
mod reader;

pub use highlight::{unique_sheet_name, FillPattern, HighlightStyle, HighlightWriter, SUMMARY_SHEET};
pub use reader::WorkbookReader;
