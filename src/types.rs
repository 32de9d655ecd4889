use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

//==============================================================================
// Cell Model
//==============================================================================

/// Scalar value held by a single cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// No value (blank cell, empty string, or outside the used range)
    #[default]
    Empty,
    /// Integer or floating point number
    Number(f64),
    /// Text
    Text(String),
    /// Boolean
    Bool(bool),
    /// Excel serial date/time
    DateTime(f64),
    /// Error literal such as `#DIV/0!`
    Error(String),
    /// ISO 8601 duration
    Duration(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "Empty",
            CellValue::Number(_) => "Number",
            CellValue::Text(_) => "Text",
            CellValue::Bool(_) => "Bool",
            CellValue::DateTime(_) => "DateTime",
            CellValue::Error(_) => "Error",
            CellValue::Duration(_) => "Duration",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, "None"),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::DateTime(serial) => write!(f, "{}", format_serial_date(*serial)),
            CellValue::Error(e) => write!(f, "{e}"),
            CellValue::Duration(d) => write!(f, "{d}"),
        }
    }
}

/// Format a number for display: integers without `.0`, everything else
/// in its shortest exact form
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    format!("{}", n)
}

/// Render an Excel serial date (1900 system) as ISO text
fn format_serial_date(serial: f64) -> String {
    use chrono::{Duration, NaiveDate};

    // 9999-12-31 is the last date Excel can show
    if !(0.0..=2_958_465.0).contains(&serial) {
        return format_number(serial);
    }
    // Serial 0 is 1899-12-30 once the 1900 leap-year bug is accounted for
    let Some(midnight) = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return format_number(serial);
    };
    let seconds = (serial * 86_400.0).round() as i64;
    let dt = midnight + Duration::seconds(seconds);
    if seconds % 86_400 == 0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// A single cell: its value and, when present, the formula that produced it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub value: CellValue,
    pub formula: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            formula: None,
        }
    }

    pub fn with_formula(value: CellValue, formula: impl Into<String>) -> Self {
        Self {
            value,
            formula: Some(formula.into()),
        }
    }
}

/// 1-based cell coordinate, displayed in A1 notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Column letters for this reference (1→A, 27→AA)
    pub fn column_letter(&self) -> String {
        column_index_to_letter(self.col.saturating_sub(1) as usize)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letter(), self.row)
    }
}

/// Convert a 0-based column index to Excel column letters (0→A, 25→Z, 26→AA)
pub fn column_index_to_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

//==============================================================================
// Workbook Model
//==============================================================================

/// One worksheet as a sparse grid of 1-based (row, col) → cell
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub cells: BTreeMap<(u32, u32), Cell>,
    /// Last used row (at least 1)
    pub max_row: u32,
    /// Last used column (at least 1)
    pub max_col: u32,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            max_row: 1,
            max_col: 1,
        }
    }

    /// Insert a cell, growing the sheet extent as needed
    pub fn set(&mut self, row: u32, col: u32, cell: Cell) {
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self.cells.insert((row, col), cell);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Value at (row, col); out-of-range or missing cells are `Empty`
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.get(row, col).map(|c| &c.value).unwrap_or(&EMPTY)
    }
}

/// A loaded workbook: sheets in workbook order
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheets: Vec::new(),
        }
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

//==============================================================================
// Diff Model
//==============================================================================

/// How a cell changed between the two workbooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// One differing cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellChange {
    pub cell: CellRef,
    pub old: CellValue,
    pub new: CellValue,
}

impl CellChange {
    pub fn kind(&self) -> ChangeKind {
        match (self.old.is_empty(), self.new.is_empty()) {
            (true, _) => ChangeKind::Added,
            (_, true) => ChangeKind::Removed,
            _ => ChangeKind::Modified,
        }
    }
}

/// Whether a sheet was compared or only exists on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetStatus {
    Compared,
    MissingInNew,
    AddedInNew,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetDiff {
    pub name: String,
    pub status: SheetStatus,
    pub changes: Vec<CellChange>,
}

impl SheetDiff {
    /// Text used in summary tables and the summary sheet
    pub fn summary(&self) -> String {
        match self.status {
            SheetStatus::MissingInNew => "Missing in new file".to_string(),
            SheetStatus::AddedInNew => "Added in new file".to_string(),
            SheetStatus::Compared if self.changes.is_empty() => "No changes".to_string(),
            SheetStatus::Compared => format!("{} changes", self.changes.len()),
        }
    }
}

/// Result of comparing two workbooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookDiff {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub sheets: Vec<SheetDiff>,
}

impl WorkbookDiff {
    pub fn total_changes(&self) -> usize {
        self.sheets.iter().map(|s| s.changes.len()).sum()
    }

    /// True when any cell changed or any sheet exists on one side only
    pub fn has_changes(&self) -> bool {
        self.sheets
            .iter()
            .any(|s| s.status != SheetStatus::Compared || !s.changes.is_empty())
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetDiff> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// (sheet name, change summary) rows in report order
    pub fn summary_rows(&self) -> Vec<(String, String)> {
        self.sheets
            .iter()
            .map(|s| (s.name.clone(), s.summary()))
            .collect()
    }
}
