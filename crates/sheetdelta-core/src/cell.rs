//! Cell entities and cell snapshots.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{normalize, CellValue};

/// Identity of a cell: sheet plus 1-based coordinates
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    /// Sheet name
    pub sheet: String,
    /// 1-based row
    pub row: u32,
    /// 1-based column
    pub col: u32,
}

impl CellId {
    pub fn new(sheet: impl Into<String>, row: u32, col: u32) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            col,
        }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!R{}C{}", self.sheet, self.row, self.col)
    }
}

/// A single spreadsheet cell with its normalized value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Sheet name
    pub sheet: String,
    /// 1-based row
    pub row: u32,
    /// 1-based column
    pub col: u32,
    /// Normalized value, empty when the cell holds nothing
    pub value: String,
}

impl Cell {
    /// Create a cell from a raw loader value
    pub fn new(sheet: impl Into<String>, row: u32, col: u32, value: Option<&CellValue>) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            col,
            value: normalize(value),
        }
    }

    /// Create a cell from text that is already in canonical form
    pub fn text(sheet: impl Into<String>, row: u32, col: u32, value: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            col,
            value: value.into(),
        }
    }

    pub fn id(&self) -> CellId {
        CellId::new(self.sheet.clone(), self.row, self.col)
    }
}

/// All cells of one workbook version, in loader order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Sheet names in workbook declaration order, including empty sheets
    sheets: Vec<String>,
    cells: Vec<Cell>,
}

impl CellSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a sheet, keeping the first declaration's position
    pub fn add_sheet(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.sheets.contains(&name) {
            self.sheets.push(name);
        }
    }

    /// Append a cell; its sheet is declared on first sight
    pub fn push(&mut self, cell: Cell) {
        if !self.sheets.iter().any(|s| *s == cell.sheet) {
            self.sheets.push(cell.sheet.clone());
        }
        self.cells.push(cell);
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheets
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s == name)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Keep only the cells of one sheet
    pub fn retain_sheet(&mut self, name: &str) {
        self.sheets.retain(|s| s == name);
        self.cells.retain(|c| c.sheet == name);
    }

    /// Random-access view over one sheet, `None` if the sheet is unknown
    pub fn grid(&self, sheet: &str) -> Option<SheetGrid<'_>> {
        if !self.has_sheet(sheet) {
            return None;
        }

        let mut values = HashMap::new();
        let mut max_row = 0;
        let mut max_col = 0;
        for cell in self.cells.iter().filter(|c| c.sheet == sheet) {
            max_row = max_row.max(cell.row);
            max_col = max_col.max(cell.col);
            values.insert((cell.row, cell.col), cell.value.as_str());
        }

        Some(SheetGrid {
            values,
            max_row,
            max_col,
        })
    }
}

impl FromIterator<Cell> for CellSnapshot {
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        let mut snapshot = CellSnapshot::new();
        for cell in iter {
            snapshot.push(cell);
        }
        snapshot
    }
}

impl Extend<Cell> for CellSnapshot {
    fn extend<T: IntoIterator<Item = Cell>>(&mut self, iter: T) {
        for cell in iter {
            self.push(cell);
        }
    }
}

/// Rectangular view of one sheet's normalized values
#[derive(Debug, Clone)]
pub struct SheetGrid<'a> {
    values: HashMap<(u32, u32), &'a str>,
    max_row: u32,
    max_col: u32,
}

impl SheetGrid<'_> {
    /// Value at a 1-based coordinate; missing cells read as `""`
    pub fn value(&self, row: u32, col: u32) -> &str {
        self.values.get(&(row, col)).copied().unwrap_or("")
    }

    /// Highest occupied row, 0 for an empty sheet
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    /// Highest occupied column, 0 for an empty sheet
    pub fn max_col(&self) -> u32 {
        self.max_col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CellSnapshot {
        vec![
            Cell::text("Sheet1", 1, 1, "a"),
            Cell::text("Sheet1", 1, 2, "b"),
            Cell::text("Sheet2", 3, 4, "z"),
            Cell::new("Sheet1", 2, 1, None),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_sheets_keep_first_seen_order() {
        let snapshot = sample();
        assert_eq!(snapshot.sheet_names(), ["Sheet1", "Sheet2"]);
        assert_eq!(snapshot.len(), 4);
    }

    #[test]
    fn test_empty_sheet_is_declared() {
        let mut snapshot = CellSnapshot::new();
        snapshot.add_sheet("Empty");
        snapshot.add_sheet("Empty");
        assert_eq!(snapshot.sheet_names(), ["Empty"]);
        assert!(snapshot.is_empty());

        let grid = snapshot.grid("Empty").unwrap();
        assert_eq!(grid.max_row(), 0);
        assert_eq!(grid.max_col(), 0);
    }

    #[test]
    fn test_grid_bounds_and_lookup() {
        let snapshot = sample();
        let grid = snapshot.grid("Sheet1").unwrap();
        assert_eq!(grid.max_row(), 2);
        assert_eq!(grid.max_col(), 2);
        assert_eq!(grid.value(1, 2), "b");
        assert_eq!(grid.value(2, 1), "");
        assert_eq!(grid.value(9, 9), "");
        assert!(snapshot.grid("Missing").is_none());
    }

    #[test]
    fn test_absent_value_is_empty_string() {
        let cell = Cell::new("S", 1, 1, None);
        assert_eq!(cell.value, "");
        let cell = Cell::new("S", 1, 1, Some(&CellValue::Int(5)));
        assert_eq!(cell.value, "5");
    }

    #[test]
    fn test_retain_sheet() {
        let mut snapshot = sample();
        snapshot.retain_sheet("Sheet2");
        assert_eq!(snapshot.sheet_names(), ["Sheet2"]);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_cell_id_display() {
        assert_eq!(CellId::new("Clients", 2, 3).to_string(), "Clients!R2C3");
    }
}
