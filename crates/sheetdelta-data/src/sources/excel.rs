//! Workbook data source using calamine (xlsx, xlsm, xlsb, xls, ods).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use sheetdelta_core::{Cell, CellSnapshot, CellValue};

use crate::error::{DataError, Result};
use crate::sources::SnapshotSource;

/// Spreadsheet workbook data source
pub struct ExcelSource {
    /// Path to the workbook
    path: PathBuf,
    /// Sheet names cache, in workbook order
    sheet_names: Vec<String>,
}

impl ExcelSource {
    /// Create a new workbook source from a file path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }

        let workbook = Self::open(path)?;
        let sheet_names = workbook.sheet_names().to_vec();

        Ok(Self {
            path: path.to_path_buf(),
            sheet_names,
        })
    }

    fn open(path: &Path) -> Result<Sheets<BufReader<File>>> {
        open_workbook_auto(path)
            .map_err(|e| DataError::WorkbookOpen(format!("{}: {}", path.display(), e)))
    }

    /// Load the cells of a single sheet
    pub fn load_sheet(&self, sheet: &str) -> Result<Vec<Cell>> {
        let mut workbook = Self::open(&self.path)?;
        Self::read_sheet(&mut workbook, sheet)
    }

    fn read_sheet(workbook: &mut Sheets<BufReader<File>>, sheet: &str) -> Result<Vec<Cell>> {
        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(DataError::SheetNotFound(sheet.to_string()));
        }

        // The sheet is declared, so a failure here is a broken sheet part
        let range = workbook.worksheet_range(sheet)?;

        Ok(Self::range_cells(sheet, &range))
    }

    /// Every cell from A1 to the last used cell, row by row.
    ///
    /// Cells inside that rectangle that hold nothing come out with an absent
    /// value, so a cleared cell reads as `""` rather than disappearing.
    fn range_cells(sheet: &str, range: &Range<Data>) -> Vec<Cell> {
        let Some((end_row, end_col)) = range.end() else {
            return Vec::new();
        };

        let mut cells = Vec::with_capacity((end_row as usize + 1) * (end_col as usize + 1));
        for row in 0..=end_row {
            for col in 0..=end_col {
                let value = range.get_value((row, col)).and_then(Self::cell_value);
                cells.push(Cell::new(sheet, row + 1, col + 1, value.as_ref()));
            }
        }
        cells
    }

    /// Convert a calamine cell to a loader value; `None` for empty cells
    pub fn cell_value(cell: &Data) -> Option<CellValue> {
        match cell {
            Data::Empty => None,
            Data::String(s) => Some(CellValue::Text(s.clone())),
            Data::Int(i) => Some(CellValue::Int(*i)),
            Data::Float(f) => Some(CellValue::Float(*f)),
            Data::Bool(b) => Some(CellValue::Bool(*b)),
            Data::Error(e) => Some(CellValue::Error(format!("#ERROR: {:?}", e))),
            Data::DateTime(dt) => Some(CellValue::DateTime(format!("{}", dt))),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::DateTime(s.clone())),
        }
    }
}

impl SnapshotSource for ExcelSource {
    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.sheet_names.clone())
    }

    fn load_cells(&self) -> Result<CellSnapshot> {
        // Re-open workbook for reading (calamine requires this pattern)
        let mut workbook = Self::open(&self.path)?;
        let mut snapshot = CellSnapshot::new();

        for sheet in &self.sheet_names {
            snapshot.add_sheet(sheet.as_str());
            let cells = Self::read_sheet(&mut workbook, sheet)?;
            log::debug!("Loaded {} cells from sheet '{}'", cells.len(), sheet);
            snapshot.extend(cells);
        }

        Ok(snapshot)
    }
}
