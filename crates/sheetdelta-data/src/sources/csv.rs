//! CSV data source.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use sheetdelta_core::{Cell, CellSnapshot, CellValue};

use crate::error::{DataError, Result};
use crate::sources::SnapshotSource;

/// Options for CSV parsing
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Whether to trim whitespace from fields
    pub trim: bool,
    /// Sheet name for the file's cells (default: the file stem)
    pub sheet_name: Option<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: false,
            sheet_name: None,
        }
    }
}

impl CsvOptions {
    /// Create options for tab-separated values (TSV)
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Create options for semicolon-separated values (common in European locales)
    pub fn semicolon() -> Self {
        Self {
            delimiter: b';',
            ..Default::default()
        }
    }

    /// Use a fixed sheet name instead of the file stem
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }
}

/// CSV file data source, read as a single sheet
pub struct CsvSource {
    /// Path to the CSV file
    path: PathBuf,
    /// Parsing options
    options: CsvOptions,
}

impl CsvSource {
    /// Create a new CSV source from a file path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(path, CsvOptions::default())
    }

    /// Create a new CSV source with custom options
    pub fn with_options(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            options,
        })
    }

    /// Name of the single sheet this file maps to
    pub fn sheet_name(&self) -> String {
        if let Some(name) = &self.options.sheet_name {
            return name.clone();
        }
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data".to_string())
    }

    /// Read all rows from the CSV file
    pub fn read_all(&self) -> Result<Vec<Vec<String>>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .has_headers(false) // Headers are a schema concern
            .trim(if self.options.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .flexible(true)
            .from_reader(reader);

        let mut result = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            result.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(result)
    }
}

impl SnapshotSource for CsvSource {
    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(vec![self.sheet_name()])
    }

    fn load_cells(&self) -> Result<CellSnapshot> {
        let sheet = self.sheet_name();
        let rows = self.read_all()?;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut snapshot = CellSnapshot::new();
        snapshot.add_sheet(sheet.as_str());

        // Short rows are padded so every row spans the same columns
        for (r, row) in rows.into_iter().enumerate() {
            let mut fields = row.into_iter();
            for c in 0..width {
                let value = fields.next().map(CellValue::Text);
                snapshot.push(Cell::new(sheet.as_str(), r as u32 + 1, c as u32 + 1, value.as_ref()));
            }
        }

        log::debug!("Loaded {} cells from '{}'", snapshot.len(), self.path.display());
        Ok(snapshot)
    }
}
