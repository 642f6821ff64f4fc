//! # sheetdelta-data
//!
//! Snapshot loaders for sheetdelta - read workbooks and CSV files into
//! [`CellSnapshot`]s, optionally folding them into records right away.
//!
//! ## Features
//!
//! - **Workbook Support**: `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods` via `calamine`
//! - **CSV Support**: comma, semicolon and tab separated files via `csv`
//! - **Full grid**: every cell from A1 to the last used cell, blanks included
//!
//! ## Example
//!
//! ```rust,ignore
//! use sheetdelta_core::{diff_cells, RecordSchema};
//! use sheetdelta_data::{load_cells, load_records};
//!
//! let origin = load_cells("urban_planning-01.xlsx")?;
//! let updated = load_cells("urban_planning-02.xlsx")?;
//! let changes = diff_cells(&origin, &updated);
//!
//! let schemas = vec![RecordSchema::new("Clients").with_index(["ID Client"])];
//! let records = load_records("urban_planning-01.xlsx", Some(schemas), None)?;
//! ```

pub mod error;
pub mod sources;

use std::path::Path;

use sheetdelta_core::{CellSnapshot, RecordSchema, RecordSnapshot, RecordSnapshotBuilder};

// Re-exports
pub use error::{DataError, Result};
pub use sources::{open_source, CsvOptions, CsvSource, ExcelSource, SnapshotSource};

/// Load every cell of a workbook or CSV file
pub fn load_cells(path: impl AsRef<Path>) -> Result<CellSnapshot> {
    open_source(path)?.load_cells()
}

/// Load a file and fold it into records
///
/// # Arguments
/// * `path` - Workbook or CSV file
/// * `schemas` - Record schemas; `None` uses one default schema per sheet
/// * `sheet` - Only build records for this sheet
///
/// # Returns
/// The records of every schema whose sheet exists in the file
pub fn load_records(
    path: impl AsRef<Path>,
    schemas: Option<Vec<RecordSchema>>,
    sheet: Option<&str>,
) -> Result<RecordSnapshot> {
    let cells = load_cells(path)?;

    let mut builder = RecordSnapshotBuilder::new();
    if let Some(schemas) = schemas {
        builder = builder.with_schemas(schemas);
    }
    if let Some(sheet) = sheet {
        builder = builder.only_sheet(sheet);
    }

    Ok(builder.build(&cells))
}
