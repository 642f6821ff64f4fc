//! Record snapshot builder - folds cell grids into records.

use std::collections::HashSet;

use crate::cell::{CellSnapshot, SheetGrid};
use crate::record::{FieldMap, FieldName, IndexKey, Record, RecordSnapshot};
use crate::schema::{default_schemas, RecordSchema};

/// Applies record schemas to a cell snapshot
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshotBuilder {
    /// Explicit schemas; `None` means one default schema per sheet
    schemas: Option<Vec<RecordSchema>>,
    /// Restrict the build to a single sheet
    sheet: Option<String>,
}

impl RecordSnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these schemas instead of the per-sheet defaults
    pub fn with_schemas(mut self, schemas: Vec<RecordSchema>) -> Self {
        self.schemas = Some(schemas);
        self
    }

    /// Only build records for the named sheet
    pub fn only_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Schemas that `build` will apply to this snapshot, in application order
    pub fn schemas_for(&self, cells: &CellSnapshot) -> Vec<RecordSchema> {
        let schemas = match &self.schemas {
            Some(schemas) => schemas.clone(),
            None => default_schemas(cells.sheet_names()),
        };

        match &self.sheet {
            Some(sheet) => schemas.into_iter().filter(|s| s.sheet == *sheet).collect(),
            None => schemas,
        }
    }

    /// Build the record snapshot.
    ///
    /// Schemas naming a sheet the snapshot does not have contribute nothing.
    pub fn build(&self, cells: &CellSnapshot) -> RecordSnapshot {
        let mut snapshot = RecordSnapshot::new();

        for schema in self.schemas_for(cells) {
            let Some(grid) = cells.grid(&schema.sheet) else {
                log::warn!("Sheet '{}' not found, skipping its schema", schema.sheet);
                continue;
            };

            let records = read_records(&schema, &grid);
            log::debug!("Read {} records from sheet '{}'", records.len(), schema.sheet);
            snapshot.extend(records);
        }

        snapshot
    }
}

/// Field names for a sheet read with a header row.
///
/// Blank header cells are named `Column_<n>`, `n` being the 1-based position
/// within the header.
pub fn header_names(grid: &SheetGrid<'_>, row: u32, first_col: u32) -> Vec<FieldName> {
    (first_col..=grid.max_col())
        .enumerate()
        .map(|(i, col)| match grid.value(row, col) {
            "" => FieldName::Named(format!("Column_{}", i + 1)),
            name => FieldName::Named(name.to_string()),
        })
        .collect()
}

fn read_records(schema: &RecordSchema, grid: &SheetGrid<'_>) -> Vec<Record> {
    // Offsets past the last addressable row or column leave nothing to read
    let Some(first_col) = schema.col_offset.checked_add(1) else {
        return Vec::new();
    };
    let Some(mut first_row) = schema.row_offset.checked_add(1) else {
        return Vec::new();
    };

    let names = if schema.has_header {
        let names = header_names(grid, first_row, first_col);
        let Some(next_row) = first_row.checked_add(1) else {
            return Vec::new();
        };
        first_row = next_row;
        names
    } else {
        (first_col..=grid.max_col()).map(FieldName::Column).collect()
    };

    let mut seen = HashSet::new();
    let mut shadowed = 0usize;
    let mut records = Vec::new();

    for row in first_row..=grid.max_row() {
        let mut fields = FieldMap::with_capacity(names.len());
        for (name, col) in names.iter().zip(first_col..=grid.max_col()) {
            fields.insert(name.clone(), grid.value(row, col));
        }

        let key = index_key(schema, &fields, row);
        if !schema.is_positional() && !seen.insert(key.clone()) {
            shadowed += 1;
        }
        records.push(Record::new(schema.sheet.clone(), key, fields));
    }

    if shadowed > 0 {
        log::warn!(
            "Sheet '{}': {} rows repeat an earlier index key; the last occurrence wins",
            schema.sheet,
            shadowed
        );
    }

    records
}

fn index_key(schema: &RecordSchema, fields: &FieldMap, row: u32) -> IndexKey {
    if schema.is_positional() {
        return IndexKey::Positional(row);
    }

    IndexKey::Keyed(
        schema
            .index
            .iter()
            .map(|field| (field.clone(), fields.get(field).unwrap_or_default()))
            .collect(),
    )
}
