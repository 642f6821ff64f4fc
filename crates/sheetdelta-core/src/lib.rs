//! # sheetdelta-core
//!
//! Change detection between two snapshots of spreadsheet data, at the level
//! of single cells or of logical records folded from rows by a schema.
//!
//! ## Features
//!
//! - **Value normalization**: one canonical text form per scalar, absence equals `""`
//! - **Cell diff**: cells matched by `(sheet, row, col)`
//! - **Record diff**: rows folded into records by [`RecordSchema`] and matched
//!   by an index key (declared fields, or the row number)
//!
//! The crate does not read files; see `sheetdelta-data` for loaders.
//!
//! ## Example
//!
//! ```rust
//! use sheetdelta_core::{diff_records, Cell, CellSnapshot, RecordSchema, RecordSnapshotBuilder};
//!
//! let origin: CellSnapshot = vec![
//!     Cell::text("Clients", 1, 1, "ID"),
//!     Cell::text("Clients", 1, 2, "Name"),
//!     Cell::text("Clients", 2, 1, "C1"),
//!     Cell::text("Clients", 2, 2, "Ann"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut updated = origin.clone();
//! updated.push(Cell::text("Clients", 3, 1, "C2"));
//! updated.push(Cell::text("Clients", 3, 2, "Bo"));
//!
//! let builder = RecordSnapshotBuilder::new()
//!     .with_schemas(vec![RecordSchema::new("Clients").with_index(["ID"])]);
//!
//! let changes = diff_records(&builder.build(&origin), &builder.build(&updated));
//! assert_eq!(changes.added.len(), 1);
//! assert!(changes.removed.is_empty());
//! ```

pub mod builder;
pub mod cell;
pub mod diff;
pub mod error;
pub mod record;
pub mod schema;
pub mod value;

// Re-exports
pub use builder::RecordSnapshotBuilder;
pub use cell::{Cell, CellId, CellSnapshot, SheetGrid};
pub use diff::{
    diff_cells, diff_entities, diff_records, CellChange, CellDiffer, Change, ChangeKind,
    ChangeSet, ChangeSummary, Diffable, RecordChange, RecordDiffer,
};
pub use error::{Result, SchemaError};
pub use record::{FieldMap, FieldName, IndexKey, Record, RecordId, RecordSnapshot};
pub use schema::{default_schemas, RecordSchema};
pub use value::{normalize, CellValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
