//! Difference reports: console, text file and JSON

pub mod console;
pub mod json;
pub mod text;

use serde::{Deserialize, Serialize};

pub use console::ConsoleReporter;
pub use json::write_json_report;
pub use text::{render_text_report, write_text_report};

/// Headers shared by every summary table
pub const SUMMARY_HEADERS: [&str; 2] = ["Sheet Name", "Change Summary"];

/// File report written next to the highlighted workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain-text report
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// No report file
    None,
}

impl ReportFormat {
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ReportFormat::Text => Some("txt"),
            ReportFormat::Json => Some("json"),
            ReportFormat::None => None,
        }
    }
}

/// Render a "grid" table: `+---+` borders, `+===+` under the header
pub fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().take(columns).enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border = |fill: char| {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&fill.to_string().repeat(w + 2));
            line.push('+');
        }
        line
    };
    let render_row = |cells: Vec<&str>| {
        let mut line = String::from("|");
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or("");
            let pad = w - cell.chars().count();
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad + 1));
            line.push('|');
        }
        line
    };

    let mut out = Vec::with_capacity(rows.len() * 2 + 3);
    out.push(border('-'));
    out.push(render_row(headers.to_vec()));
    out.push(border('='));
    for row in rows {
        out.push(render_row(row.iter().map(String::as_str).collect()));
        out.push(border('-'));
    }
    out.join("\n")
}

/// Summary rows as owned table cells
pub fn summary_table(rows: &[(String, String)]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(name, summary)| vec![name.clone(), summary.clone()])
        .collect();
    render_grid(&SUMMARY_HEADERS, &rows)
}
