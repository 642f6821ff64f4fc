//! Schema configuration
//!
//! Record schemas are loaded from `sheetdelta.toml`:
//!
//! ```toml
//! [[sheet]]
//! name = "Clients"
//! index = ["ID Client"]
//!
//! [[sheet]]
//! name = "Raw"
//! has_header = false
//! row_offset = 2
//! index = [1]
//! ```
//!
//! A file without `[[sheet]]` entries means "one default schema per sheet".

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sheetdelta_core::{FieldName, RecordSchema, SchemaError};

/// Config file names looked up in the working directory
pub const CONFIG_CANDIDATES: [&str; 2] = ["sheetdelta.toml", ".sheetdelta.toml"];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Record schemas, in application order
    #[serde(rename = "sheet")]
    pub sheets: Vec<SheetConfig>,
}

impl DiffConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Validated schemas, `None` when no sheet is configured
    pub fn schemas(&self) -> std::result::Result<Option<Vec<RecordSchema>>, SchemaError> {
        if self.sheets.is_empty() {
            return Ok(None);
        }

        let schemas = self
            .sheets
            .iter()
            .map(|sheet| {
                let schema = sheet.to_schema();
                schema.validate()?;
                Ok(schema)
            })
            .collect::<std::result::Result<Vec<_>, SchemaError>>()?;

        Ok(Some(schemas))
    }
}

/// One `[[sheet]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Sheet name
    pub name: String,
    /// Leading rows to skip
    pub row_offset: u32,
    /// Leading columns to skip
    pub col_offset: u32,
    /// First table row holds field names
    pub has_header: bool,
    /// Index fields: header names, or column positions without a header
    pub index: Vec<FieldName>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            row_offset: 0,
            col_offset: 0,
            has_header: true,
            index: Vec::new(),
        }
    }
}

impl SheetConfig {
    pub fn to_schema(&self) -> RecordSchema {
        RecordSchema::new(self.name.as_str())
            .with_header(self.has_header)
            .with_row_offset(self.row_offset)
            .with_col_offset(self.col_offset)
            .with_index(self.index.iter().cloned())
    }
}

/// Load configuration from an explicit path, or from the working directory
pub fn load_config(config_path: Option<&Path>) -> Result<DiffConfig> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            read_config(path)
        }
        None => {
            for candidate in CONFIG_CANDIDATES {
                let path = Path::new(candidate);
                if path.exists() {
                    tracing::debug!("Using config {}", path.display());
                    return read_config(path);
                }
            }
            Ok(DiffConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<DiffConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    DiffConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}
