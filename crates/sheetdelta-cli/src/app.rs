//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sheetdelta_core::{
    diff_cells, diff_records, CellSnapshot, ChangeSummary, RecordSnapshot, RecordSnapshotBuilder,
};
use sheetdelta_data::{load_cells, open_source};

use crate::config::load_config;
use crate::report::{render_cell_text, render_json, render_record_text};

/// Output format for change reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "sheetdelta")]
#[command(author, version, about = "Detect changes between two versions of a spreadsheet", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two files cell by cell
    Cells {
        /// Origin workbook or CSV file
        origin: PathBuf,

        /// Updated workbook or CSV file
        updated: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only compare this sheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// Exit with status 1 if any change is found
        #[arg(long)]
        fail_on_change: bool,
    },

    /// Compare two files record by record
    Records {
        /// Origin workbook or CSV file
        origin: PathBuf,

        /// Updated workbook or CSV file
        updated: PathBuf,

        /// Schema configuration file (default: sheetdelta.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only compare this sheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Exit with status 1 if any change is found
        #[arg(long)]
        fail_on_change: bool,
    },

    /// List the sheets of a workbook or CSV file
    Sheets {
        /// Input file
        input: PathBuf,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (summary, fail_on_change) = match cli.command {
        Commands::Cells {
            origin,
            updated,
            format,
            sheet,
            fail_on_change,
        } => {
            let (report, summary) = cells_command(&origin, &updated, format, sheet.as_deref())?;
            println!("{}", report.trim_end());
            (summary, fail_on_change)
        }
        Commands::Records {
            origin,
            updated,
            config,
            sheet,
            format,
            fail_on_change,
        } => {
            let (report, summary) = records_command(
                &origin,
                &updated,
                config.as_deref(),
                sheet.as_deref(),
                format,
            )?;
            println!("{}", report.trim_end());
            (summary, fail_on_change)
        }
        Commands::Sheets { input } => {
            for name in sheets_command(&input)? {
                println!("{}", name);
            }
            return Ok(());
        }
    };

    if fail_on_change && summary.total() > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    // A second initialization (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_snapshot(path: &Path, sheet: Option<&str>) -> Result<CellSnapshot> {
    let mut snapshot =
        load_cells(path).with_context(|| format!("Failed to load: {}", path.display()))?;

    if let Some(sheet) = sheet {
        if !snapshot.has_sheet(sheet) {
            tracing::warn!("Sheet '{}' not found in {}", sheet, path.display());
        }
        snapshot.retain_sheet(sheet);
    }

    tracing::debug!("{}: {} cells", path.display(), snapshot.len());
    Ok(snapshot)
}

/// Execute the cells command, returning the rendered report and change counts
pub fn cells_command(
    origin: &Path,
    updated: &Path,
    format: OutputFormat,
    sheet: Option<&str>,
) -> Result<(String, ChangeSummary)> {
    let origin = load_snapshot(origin, sheet)?;
    let updated = load_snapshot(updated, sheet)?;

    let changes = diff_cells(&origin, &updated);
    let report = match format {
        OutputFormat::Text => render_cell_text(&changes),
        OutputFormat::Json => render_json(&changes).context("Failed to serialize report")?,
    };

    Ok((report, changes.summary()))
}

/// Execute the records command, returning the rendered report and change counts
pub fn records_command(
    origin: &Path,
    updated: &Path,
    config_path: Option<&Path>,
    sheet: Option<&str>,
    format: OutputFormat,
) -> Result<(String, ChangeSummary)> {
    let config = load_config(config_path)?;
    let schemas = config.schemas().context("Invalid sheet configuration")?;

    let mut builder = RecordSnapshotBuilder::new();
    if let Some(schemas) = schemas {
        builder = builder.with_schemas(schemas);
    }
    if let Some(sheet) = sheet {
        builder = builder.only_sheet(sheet);
    }

    let origin = build_records(&builder, origin)?;
    let updated = build_records(&builder, updated)?;

    let changes = diff_records(&origin, &updated);
    let report = match format {
        OutputFormat::Text => render_record_text(&changes),
        OutputFormat::Json => render_json(&changes).context("Failed to serialize report")?,
    };

    Ok((report, changes.summary()))
}

fn build_records(builder: &RecordSnapshotBuilder, path: &Path) -> Result<RecordSnapshot> {
    let cells = load_snapshot(path, None)?;
    let records = builder.build(&cells);
    tracing::debug!("{}: {} records", path.display(), records.len());
    Ok(records)
}

/// Execute the sheets command
pub fn sheets_command(input: &Path) -> Result<Vec<String>> {
    let source =
        open_source(input).with_context(|| format!("Failed to open: {}", input.display()))?;
    source
        .sheet_names()
        .with_context(|| format!("Failed to read sheet names: {}", input.display()))
}
