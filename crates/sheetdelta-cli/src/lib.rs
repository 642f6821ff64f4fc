//! sheetdelta CLI - Command-line interface library
//!
//! This library provides the CLI functionality for sheetdelta:
//! - Cells: cell-level diff between two files
//! - Records: record-level diff driven by `sheetdelta.toml` schemas
//! - Sheets: list the sheets of a file
//!
//! # Library Usage
//!
//! ```ignore
//! use sheetdelta_cli::{cells_command, records_command, OutputFormat};
//!
//! let (report, summary) = cells_command(&origin, &updated, OutputFormat::Json, None)?;
//! let (report, summary) = records_command(&origin, &updated, None, Some("Clients"), OutputFormat::Text)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Which cells changed?
//! sheetdelta cells urban_planning-01.xlsx urban_planning-02.xlsx
//!
//! # Which records changed, as JSON, failing CI on any change?
//! sheetdelta records v1.xlsx v2.xlsx --config sheetdelta.toml --format json --fail-on-change
//!
//! # Sheet names, for writing a config
//! sheetdelta sheets v1.xlsx
//! ```

pub mod app;
pub mod config;
pub mod report;

// Re-export main entry point and types
pub use app::{cells_command, records_command, run_cli, sheets_command, OutputFormat};
pub use config::{load_config, DiffConfig, SheetConfig};
pub use report::{render_cell_text, render_json, render_record_text};
