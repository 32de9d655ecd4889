//! Terminal output

use super::summary_table;
use super::text::format_change;
use crate::types::{SheetStatus, WorkbookDiff};
use colored::Colorize;
use std::path::Path;

/// Prints comparisons to stdout
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    /// Print each changed cell, not just the summary
    pub show_cells: bool,
    /// Cap on printed cells per sheet
    pub max_cells: usize,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self {
            show_cells: false,
            max_cells: 50,
        }
    }
}

impl ConsoleReporter {
    pub fn new(show_cells: bool, max_cells: usize) -> Self {
        Self {
            show_cells,
            max_cells,
        }
    }

    pub fn print_files(&self, old: &Path, new: &Path) {
        println!("   Old File: '{}'", old.display());
        println!("   New File: '{}'", new.display());
        println!();
    }

    pub fn print_diff(&self, diff: &WorkbookDiff) {
        if self.show_cells {
            self.print_cells(diff);
        }

        println!("{}", "📊 Summary of Changes:".bold().cyan());
        println!("{}", summary_table(&diff.summary_rows()));
        println!();

        let total = diff.total_changes();
        if diff.has_changes() {
            println!(
                "{}",
                format!("⚠️  {} changed cells across {} sheets", total, diff.sheets.len())
                    .bold()
                    .yellow()
            );
        } else {
            println!("{}", "✅ Workbooks are identical".bold().green());
        }
    }

    fn print_cells(&self, diff: &WorkbookDiff) {
        for sheet in &diff.sheets {
            if sheet.status != SheetStatus::Compared || sheet.changes.is_empty() {
                continue;
            }
            println!(
                "   📄 Sheet: {} ({})",
                sheet.name.bright_blue().bold(),
                sheet.summary()
            );
            for change in sheet.changes.iter().take(self.max_cells) {
                println!("      {}", format_change(&sheet.name, change));
            }
            let hidden = sheet.changes.len().saturating_sub(self.max_cells);
            if hidden > 0 {
                println!("      {}", format!("... and {} more", hidden).dimmed());
            }
        }
        println!();
    }
}
