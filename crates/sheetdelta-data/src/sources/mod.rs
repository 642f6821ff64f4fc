//! Data source implementations.
//!
//! This module contains adapters that turn files into cell snapshots.

pub mod csv;
pub mod excel;

use std::path::Path;

pub use self::csv::{CsvOptions, CsvSource};
pub use self::excel::ExcelSource;

use sheetdelta_core::CellSnapshot;

use crate::error::{DataError, Result};

/// Extensions handled by [`ExcelSource`]
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "xla", "xlam", "ods"];

/// Trait for sources that can provide a cell snapshot
pub trait SnapshotSource {
    /// List available sheets in declaration order
    fn sheet_names(&self) -> Result<Vec<String>>;

    /// Load every cell, sheet by sheet, row-major
    fn load_cells(&self) -> Result<CellSnapshot>;
}

/// Open a source, choosing the adapter from the file extension
pub fn open_source(path: impl AsRef<Path>) -> Result<Box<dyn SnapshotSource>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DataError::FileNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(Box::new(CsvSource::new(path)?)),
        "tsv" | "tab" => Ok(Box::new(CsvSource::with_options(path, CsvOptions::tsv())?)),
        ext if WORKBOOK_EXTENSIONS.contains(&ext) => Ok(Box::new(ExcelSource::new(path)?)),
        _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
    }
}
