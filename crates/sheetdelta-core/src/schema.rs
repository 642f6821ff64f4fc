//! Record schemas: how a sheet's grid folds into records.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::record::FieldName;

/// Per-sheet description of a record table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Sheet to read
    pub sheet: String,
    /// Leading rows to skip before the table starts
    pub row_offset: u32,
    /// Leading columns to skip before the table starts
    pub col_offset: u32,
    /// First table row holds field names
    pub has_header: bool,
    /// Fields forming the record identity; empty means "row number"
    pub index: Vec<FieldName>,
}

impl RecordSchema {
    /// Schema with a header row, no offsets and row-number identity
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            row_offset: 0,
            col_offset: 0,
            has_header: true,
            index: Vec::new(),
        }
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_row_offset(mut self, row_offset: u32) -> Self {
        self.row_offset = row_offset;
        self
    }

    pub fn with_col_offset(mut self, col_offset: u32) -> Self {
        self.col_offset = col_offset;
        self
    }

    pub fn with_index<I, F>(mut self, index: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldName>,
    {
        self.index = index.into_iter().map(Into::into).collect();
        self
    }

    /// True when records are keyed by their row number
    pub fn is_positional(&self) -> bool {
        self.index.is_empty()
    }

    /// Check that the index fields can address this sheet's fields.
    ///
    /// The builder itself never fails; a mismatched index simply reads as
    /// empty values. Callers loading schemas from configuration use this to
    /// reject such mistakes early.
    pub fn validate(&self) -> Result<()> {
        if self.sheet.trim().is_empty() {
            return Err(SchemaError::EmptySheetName);
        }

        for (i, field) in self.index.iter().enumerate() {
            if self.index[..i].contains(field) {
                return Err(SchemaError::DuplicateIndexField {
                    sheet: self.sheet.clone(),
                    field: field.clone(),
                });
            }

            match (field, self.has_header) {
                (FieldName::Column(0), _) => {
                    return Err(SchemaError::ZeroColumn {
                        sheet: self.sheet.clone(),
                    });
                }
                (FieldName::Column(_), true) => {
                    return Err(SchemaError::PositionalIndexWithHeader {
                        sheet: self.sheet.clone(),
                        field: field.clone(),
                    });
                }
                (FieldName::Named(_), false) => {
                    return Err(SchemaError::NamedIndexWithoutHeader {
                        sheet: self.sheet.clone(),
                        field: field.clone(),
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// One default schema per sheet: header row, no offsets, row-number identity
pub fn default_schemas<S: AsRef<str>>(sheet_names: &[S]) -> Vec<RecordSchema> {
    sheet_names
        .iter()
        .map(|name| RecordSchema::new(name.as_ref()))
        .collect()
}
