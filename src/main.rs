use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sheetdiff::cli::{self, RunOptions};
use sheetdiff::config::Config;
use sheetdiff::discovery::SelectBy;
use sheetdiff::report::ReportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetdiff")]
#[command(about = "Compare two spreadsheet workbooks cell by cell.")]
#[command(long_about = "sheetdiff - Compare two spreadsheet workbooks cell by cell

Every common sheet is scanned over the larger extent of both grids.
Differences are printed as a summary table and, by default, written as a
highlighted copy of the newer workbook plus a text report.

COMMANDS:
  compare   - Compare two explicit workbook files
  latest    - Compare the two newest workbooks in a directory
  list      - Show candidate workbooks in selection order

EXAMPLES:
  sheetdiff compare old.xlsx new.xlsx
  sheetdiff latest excel_files --by version
  sheetdiff latest reports --by date --archive --report json
  sheetdiff list excel_files

CONFIG:
  Defaults are read from ./sheetdiff.yaml (or --config PATH).
  CLI flags override the file.")]
#[command(version)]
struct Cli {
    /// YAML config file (default: ./sheetdiff.yaml if present)
    #[arg(long, global = true, env = "SHEETDIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Show verbose output and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Compare two explicit workbook files.

OLD is the baseline, NEW the revision. Changed cells of NEW are highlighted
in the output workbook and a Summary_of_Changes sheet is appended.

EXAMPLE:
  sheetdiff compare 'Workbook V1.7.0.xlsx' 'Workbook V1.8.0.xlsx'")]
    /// Compare two workbook files
    Compare {
        /// Baseline workbook
        old: PathBuf,

        /// Revised workbook
        new: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    #[command(long_about = "Compare the two newest workbooks in a directory.

Files are ordered by a V<major>.<minor>.<patch> tag (--by version) or by a
date in the file name such as 2024-01-15 or 20240115 (--by date). Files
without the key sort first. If the directory does not exist it is created.

EXAMPLES:
  sheetdiff latest excel_files
  sheetdiff latest reports --by date")]
    /// Compare the two newest workbooks in a directory
    Latest {
        /// Directory to search (default: input_dir from config, else excel_files)
        #[arg(env = "SHEETDIFF_INPUT_DIR")]
        dir: Option<PathBuf>,

        /// Ordering key
        #[arg(long, value_enum)]
        by: Option<SelectBy>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show candidate workbooks in selection order
    List {
        /// Directory to search (default: input_dir from config, else excel_files)
        #[arg(env = "SHEETDIFF_INPUT_DIR")]
        dir: Option<PathBuf>,

        /// Ordering key
        #[arg(long, value_enum)]
        by: Option<SelectBy>,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Directory for the highlighted workbook, report and archive
    #[arg(short, long, env = "SHEETDIFF_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Report file format
    #[arg(short, long, value_enum)]
    report: Option<ReportFormat>,

    /// Skip writing the highlighted workbook
    #[arg(long)]
    no_highlight: bool,

    /// Bundle the workbook and report into a zip file
    #[arg(short, long)]
    archive: bool,

    /// Compare formula text instead of cached values
    #[arg(long)]
    formulas: bool,

    /// Treat numbers within this distance as equal
    #[arg(long, value_parser = parse_tolerance)]
    tolerance: Option<f64>,

    /// Print every changed cell
    #[arg(short, long)]
    show_cells: bool,

    /// Maximum changed cells printed per sheet
    #[arg(long, default_value = "50")]
    max_cells: usize,

    /// Exit with status 1 when the workbooks differ
    #[arg(long)]
    fail_on_diff: bool,
}

impl OutputArgs {
    fn apply(&self, options: &mut RunOptions) {
        if let Some(dir) = &self.output_dir {
            options.output_dir = dir.clone();
        }
        if let Some(report) = self.report {
            options.report = report;
        }
        if self.no_highlight {
            options.highlight = false;
        }
        if self.archive {
            options.archive = true;
        }
        if self.formulas {
            options.compare.compare_formulas = true;
        }
        if let Some(tolerance) = self.tolerance {
            options.compare.numeric_tolerance = tolerance;
        }
        options.show_cells = self.show_cells;
        options.max_cells = self.max_cells;
    }
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("tolerance must be a non-negative number, got {s}"));
    }
    Ok(value)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sheetdiff=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let config = Config::load(cli.config.as_deref(), &cwd).context("Failed to load config")?;

    let mut options = RunOptions::from_config(&config);
    options.verbose = cli.verbose;

    let (outcome, fail_on_diff) = match cli.command {
        Commands::Compare { old, new, output } => {
            output.apply(&mut options);
            (cli::compare(old, new, &options)?, output.fail_on_diff)
        }

        Commands::Latest { dir, by, output } => {
            output.apply(&mut options);
            let dir = dir.unwrap_or_else(|| config.input_dir.clone());
            let by = by.unwrap_or(config.select_by);
            (cli::latest(dir, by, &options)?, output.fail_on_diff)
        }

        Commands::List { dir, by } => {
            let dir = dir.unwrap_or_else(|| config.input_dir.clone());
            cli::list(dir, by.unwrap_or(config.select_by))?;
            return Ok(());
        }
    };

    if fail_on_diff && outcome.diff.has_changes() {
        std::process::exit(1);
    }
    Ok(())
}
