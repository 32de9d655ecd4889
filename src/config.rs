//! Optional `sheetdiff.yaml` configuration
//!
//! Every key is optional; CLI flags override whatever the file sets.
//!
//! ```yaml
//! input_dir: excel_files
//! output_dir: Output
//! select_by: version      # or: date
//! report: text            # text | json | none
//! archive: false
//! compare_formulas: false
//! numeric_tolerance: 0.0
//! summary_sheet: Summary_of_Changes
//! highlight:
//!   fill_color: FF0000
//!   font_color: FFFFFF
//!   pattern: light_down
//!   bold: true
//! ```

use crate::compare::CompareOptions;
use crate::discovery::SelectBy;
use crate::error::{SheetDiffError, SheetDiffResult};
use crate::excel::{HighlightStyle, SUMMARY_SHEET};
use crate::report::ReportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "sheetdiff.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub select_by: SelectBy,
    pub report: ReportFormat,
    pub archive: bool,
    pub compare_formulas: bool,
    pub numeric_tolerance: f64,
    pub summary_sheet: String,
    pub highlight: HighlightStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("excel_files"),
            output_dir: PathBuf::from("Output"),
            select_by: SelectBy::Version,
            report: ReportFormat::Text,
            archive: false,
            compare_formulas: false,
            numeric_tolerance: 0.0,
            summary_sheet: SUMMARY_SHEET.to_string(),
            highlight: HighlightStyle::default(),
        }
    }
}

impl Config {
    /// Parse and validate a YAML config file
    pub fn from_file(path: &Path) -> SheetDiffResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SheetDiffError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Explicit path if given, else `sheetdiff.yaml` in `cwd` if present, else defaults
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> SheetDiffResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let default_path = cwd.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            return Self::from_file(&default_path);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> SheetDiffResult<()> {
        HighlightStyle::parse_color(&self.highlight.fill_color)?;
        HighlightStyle::parse_color(&self.highlight.font_color)?;

        if !self.numeric_tolerance.is_finite() || self.numeric_tolerance < 0.0 {
            return Err(SheetDiffError::Config(format!(
                "numeric_tolerance must be a non-negative number, got {}",
                self.numeric_tolerance
            )));
        }
        if self.summary_sheet.trim().is_empty() {
            return Err(SheetDiffError::Config(
                "summary_sheet must not be empty".to_string(),
            ));
        }
        if self
            .summary_sheet
            .chars()
            .any(|c| matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        {
            return Err(SheetDiffError::Config(format!(
                "summary_sheet '{}' contains characters Excel does not allow",
                self.summary_sheet
            )));
        }
        Ok(())
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            compare_formulas: self.compare_formulas,
            numeric_tolerance: self.numeric_tolerance,
        }
    }
}
