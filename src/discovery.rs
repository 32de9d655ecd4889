//! Candidate workbook discovery
//!
//! Picks the two most recent spreadsheets in a directory, ordered either by a
//! `V<major>.<minor>.<patch>` tag or by a date embedded in the file name.

use crate::error::{SheetDiffError, SheetDiffResult};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extensions calamine can read
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Ordering key used to pick the latest pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SelectBy {
    /// Semantic version tag, e.g. `Workbook V1.8.0.xlsx`
    #[default]
    Version,
    /// Date in the file name, e.g. `report_2024-01-15.xlsx`
    Date,
}

/// A spreadsheet found in the input directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub version: Option<(u32, u32, u32)>,
    pub date: Option<NaiveDate>,
}

impl Candidate {
    pub fn from_path(path: PathBuf) -> Self {
        let name = file_name(&path);
        Self {
            version: extract_version(&name),
            date: extract_date(&name),
            path,
        }
    }

    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// First `V<major>.<minor>.<patch>` tag in a file name
pub fn extract_version(file_name: &str) -> Option<(u32, u32, u32)> {
    let re = Regex::new(r"V(\d+)\.(\d+)\.(\d+)").ok()?;
    let caps = re.captures(file_name)?;
    let part = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();
    Some((part(1)?, part(2)?, part(3)?))
}

/// Last valid calendar date in the file stem (YYYY-MM-DD, YYYY_MM_DD, YYYY.MM.DD or YYYYMMDD)
pub fn extract_date(file_name: &str) -> Option<NaiveDate> {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let re = Regex::new(r"(\d{4})[-_.]?(\d{2})[-_.]?(\d{2})").ok()?;
    re.captures_iter(&stem)
        .filter_map(|caps| {
            let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
            let month = caps.get(2)?.as_str().parse::<u32>().ok()?;
            let day = caps.get(3)?.as_str().parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .last()
}

/// Whether `path` looks like a spreadsheet we can read
pub fn is_spreadsheet(path: &Path) -> bool {
    let name = file_name(path);
    // Excel lock files
    if name.starts_with("~$") {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Spreadsheets directly inside `dir`, sorted by `select_by` (oldest first)
pub fn list_candidates(dir: &Path, select_by: SelectBy) -> SheetDiffResult<Vec<Candidate>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_spreadsheet(&path) {
            candidates.push(Candidate::from_path(path));
        } else {
            debug!(path = %path.display(), "ignoring non-spreadsheet entry");
        }
    }
    sort_candidates(&mut candidates, select_by);
    Ok(candidates)
}

/// Sort ascending by key; missing keys first, ties by file name
pub fn sort_candidates(candidates: &mut [Candidate], select_by: SelectBy) {
    match select_by {
        SelectBy::Version => candidates.sort_by(|a, b| {
            a.version
                .cmp(&b.version)
                .then_with(|| a.file_name().cmp(&b.file_name()))
        }),
        SelectBy::Date => candidates.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.file_name().cmp(&b.file_name()))
        }),
    }
}

/// The two most recent spreadsheets in `dir` as (older, newer)
///
/// A missing directory is created and reported as
/// [`SheetDiffError::DirectoryCreated`] so the caller can ask for files.
pub fn select_latest_pair(dir: &Path, select_by: SelectBy) -> SheetDiffResult<(PathBuf, PathBuf)> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Err(SheetDiffError::DirectoryCreated(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(SheetDiffError::Discovery(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let mut candidates = list_candidates(dir, select_by)?;
    if candidates.len() < 2 {
        return Err(SheetDiffError::NotEnoughFiles {
            dir: dir.to_path_buf(),
            found: candidates.len(),
        });
    }

    let newer = candidates.pop().map(|c| c.path);
    let older = candidates.pop().map(|c| c.path);
    match (older, newer) {
        (Some(older), Some(newer)) => {
            info!(old = %older.display(), new = %newer.display(), "selected workbook pair");
            Ok((older, newer))
        }
        _ => Err(SheetDiffError::Discovery(
            "candidate list shrank during selection".to_string(),
        )),
    }
}
