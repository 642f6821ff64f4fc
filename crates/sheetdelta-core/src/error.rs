//! Error types for schema validation.

use thiserror::Error;

use crate::record::FieldName;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Problems found in a record schema before it is applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Schema without a sheet name
    #[error("Schema has an empty sheet name")]
    EmptySheetName,

    /// Column position index on a sheet read with a header row
    #[error("Sheet '{sheet}': index field {field} is a column position, but the sheet has a header row")]
    PositionalIndexWithHeader { sheet: String, field: FieldName },

    /// Named index on a sheet read without a header row
    #[error("Sheet '{sheet}': index field '{field}' is a name, but the sheet has no header row")]
    NamedIndexWithoutHeader { sheet: String, field: FieldName },

    /// Column positions are 1-based
    #[error("Sheet '{sheet}': column position 0 is not valid, positions start at 1")]
    ZeroColumn { sheet: String },

    /// Same index field declared twice
    #[error("Sheet '{sheet}': index field '{field}' is declared more than once")]
    DuplicateIndexField { sheet: String, field: FieldName },
}
