use crate::archive;
use crate::compare::{compare_workbooks, CompareOptions};
use crate::config::Config;
use crate::discovery::{self, Candidate, SelectBy};
use crate::error::{SheetDiffError, SheetDiffResult};
use crate::excel::{HighlightStyle, HighlightWriter, WorkbookReader};
use crate::output::OutputPaths;
use crate::report::{render_grid, write_json_report, write_text_report, ConsoleReporter, ReportFormat};
use crate::types::WorkbookDiff;
use chrono::Local;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings shared by `compare` and `latest`
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub report: ReportFormat,
    /// Write the highlighted copy of the newer workbook
    pub highlight: bool,
    pub archive: bool,
    pub compare: CompareOptions,
    pub style: HighlightStyle,
    pub summary_sheet: String,
    pub show_cells: bool,
    pub max_cells: usize,
    pub verbose: bool,
}

impl RunOptions {
    /// Start from config values; the CLI then overrides individual fields
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            report: config.report,
            highlight: true,
            archive: config.archive,
            compare: config.compare_options(),
            style: config.highlight.clone(),
            summary_sheet: config.summary_sheet.clone(),
            show_cells: false,
            max_cells: 50,
            verbose: false,
        }
    }

    fn writes_files(&self) -> bool {
        self.highlight || self.report != ReportFormat::None
    }
}

/// What a comparison produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub diff: WorkbookDiff,
    /// Files written, in creation order (workbook, report, archive)
    pub artifacts: Vec<PathBuf>,
}

/// Execute the compare command on two explicit files
pub fn compare(old: PathBuf, new: PathBuf, options: &RunOptions) -> SheetDiffResult<RunOutcome> {
    println!("{}", "🔍 sheetdiff - Comparing workbooks".bold().green());
    run_comparison(&old, &new, options)
}

/// Execute the latest command: pick the two newest files in `dir`, then compare
pub fn latest(dir: PathBuf, select_by: SelectBy, options: &RunOptions) -> SheetDiffResult<RunOutcome> {
    println!("{}", "🔍 sheetdiff - Comparing latest workbooks".bold().green());
    println!("   Directory: {}", dir.display());
    println!("   Ordered by: {:?}", select_by);

    // A created directory surfaces as an error; main reports it
    let (old, new) = discovery::select_latest_pair(&dir, select_by)?;

    run_comparison(&old, &new, options)
}

/// Execute the list command: show candidates in selection order
pub fn list(dir: PathBuf, select_by: SelectBy) -> SheetDiffResult<Vec<Candidate>> {
    println!("{}", "📂 sheetdiff - Candidate workbooks".bold().green());
    println!("   Directory: {}", dir.display());
    println!("   Ordered by: {:?}\n", select_by);

    if !dir.is_dir() {
        return Err(SheetDiffError::Discovery(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let candidates = discovery::list_candidates(&dir, select_by)?;
    if candidates.is_empty() {
        println!("{}", "⚠️  No spreadsheet files found".yellow());
        return Ok(candidates);
    }

    println!("{}", candidates_table(&candidates));
    Ok(candidates)
}

/// Grid of candidates; the last two are tagged old/new
fn candidates_table(candidates: &[Candidate]) -> String {
    let count = candidates.len();
    let rows: Vec<Vec<String>> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let role = match count - i {
                1 if count >= 2 => "new",
                2 => "old",
                _ => "",
            };
            vec![
                c.file_name(),
                c.version
                    .map(|(a, b, d)| format!("{}.{}.{}", a, b, d))
                    .unwrap_or_else(|| "-".to_string()),
                c.date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                role.to_string(),
            ]
        })
        .collect();
    render_grid(&["File", "Version", "Date", "Role"], &rows)
}

fn run_comparison(old: &Path, new: &Path, options: &RunOptions) -> SheetDiffResult<RunOutcome> {
    let console = ConsoleReporter::new(options.show_cells, options.max_cells);
    console.print_files(old, new);

    if options.verbose {
        println!("{}", "📖 Loading workbooks...".cyan());
    }
    let old_wb = WorkbookReader::open(old)?;
    let new_wb = WorkbookReader::open(new)?;
    if options.verbose {
        println!(
            "   Old: {} sheets, New: {} sheets\n",
            old_wb.sheets.len(),
            new_wb.sheets.len()
        );
        println!("{}", "🧮 Processing sheets...".cyan());
    }

    let diff = compare_workbooks(&old_wb, &new_wb, &options.compare);
    info!(
        changes = diff.total_changes(),
        sheets = diff.sheets.len(),
        "comparison finished"
    );
    console.print_diff(&diff);

    let mut artifacts = Vec::new();
    if !options.writes_files() {
        if options.archive {
            warn!("--archive ignored: no workbook or report is being written");
        }
        return Ok(RunOutcome { diff, artifacts });
    }

    let paths = OutputPaths::timestamped(&options.output_dir, Local::now().naive_local());
    paths.ensure_dir()?;
    println!();

    if options.highlight {
        let output = paths.workbook();
        HighlightWriter::new(options.style.clone())
            .with_summary_sheet(options.summary_sheet.clone())
            .write(&new_wb, &diff, &output)?;
        println!(
            "{}",
            format!("✅ Highlighted workbook saved to {}", output.display())
                .bold()
                .green()
        );
        artifacts.push(output);
    }

    if let Some(output) = paths.report(options.report) {
        let generated = Local::now().naive_local();
        match options.report {
            ReportFormat::Json => write_json_report(&output, &diff, generated)?,
            _ => write_text_report(&output, &diff, generated)?,
        }
        println!(
            "{}",
            format!("✅ Report saved to {}", output.display())
                .bold()
                .green()
        );
        artifacts.push(output);
    }

    if options.archive {
        let output = paths.archive();
        archive::bundle(&artifacts, &output)?;
        println!(
            "{}",
            format!("📦 Artifacts bundled into {}", output.display())
                .bold()
                .green()
        );
        artifacts.push(output);
    }

    Ok(RunOutcome { diff, artifacts })
}
