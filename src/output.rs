//! Timestamped output file names

use crate::error::SheetDiffResult;
use crate::report::ReportFormat;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

const PREFIX: &str = "difference";

/// Paths of every artifact produced by one comparison run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub stamp: String,
}

impl OutputPaths {
    /// `difference_<YYYY-MM-DD_HHMMSS>.*` under `dir`
    pub fn timestamped(dir: impl AsRef<Path>, now: NaiveDateTime) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            stamp: now.format("%Y-%m-%d_%H%M%S").to_string(),
        }
    }

    /// Create the output directory if missing
    pub fn ensure_dir(&self) -> SheetDiffResult<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn with_extension(&self, ext: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.{}", PREFIX, self.stamp, ext))
    }

    pub fn workbook(&self) -> PathBuf {
        self.with_extension("xlsx")
    }

    pub fn report(&self, format: ReportFormat) -> Option<PathBuf> {
        format.extension().map(|ext| self.with_extension(ext))
    }

    pub fn archive(&self) -> PathBuf {
        self.with_extension("zip")
    }
}
