//! Record entities: logical rows identified by a schema-defined key.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Name of a record field.
///
/// Sheets read with a header row use the header text; sheets without one
/// use the 1-based column position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldName {
    /// 1-based column position
    Column(u32),
    /// Header text
    Named(String),
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldName::Column(col) => write!(f, "{}", col),
            FieldName::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        FieldName::Named(name.to_string())
    }
}

impl From<String> for FieldName {
    fn from(name: String) -> Self {
        FieldName::Named(name)
    }
}

impl From<u32> for FieldName {
    fn from(col: u32) -> Self {
        FieldName::Column(col)
    }
}

/// Insertion-ordered mapping from field name to normalized value.
///
/// Names are unique: inserting an existing name replaces its value but keeps
/// its position. Equality and hashing ignore order. Lookups go through a
/// name-to-position index, so wide rows stay linear to build and compare.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    entries: Vec<(FieldName, String)>,
    positions: HashMap<FieldName, usize>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, name: impl Into<FieldName>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.positions.get(&name) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.positions.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &FieldName) -> Option<&str> {
        self.positions
            .get(name)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn contains(&self, name: &FieldName) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.entries.iter().map(|(n, v)| (n, v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &FieldName> {
        self.entries.iter().map(|(n, _)| n)
    }

    fn sorted(&self) -> Vec<&(FieldName, String)> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort();
        sorted
    }
}

impl PartialEq for FieldMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(name, value)| other.get(name) == Some(value.as_str()))
    }
}

impl Eq for FieldMap {}

impl Hash for FieldMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

impl<N: Into<FieldName>, V: Into<String>> FromIterator<(N, V)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut map = FieldMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl fmt::Display for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {:?}", name, value)?;
        }
        f.write_str("}")
    }
}

/// Key identifying a record within its sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum IndexKey {
    /// 1-based row number the record was read from (no index fields declared)
    Positional(u32),
    /// Values of the declared index fields
    Keyed(FieldMap),
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Positional(row) => write!(f, "row {}", row),
            IndexKey::Keyed(fields) => fields.fmt(f),
        }
    }
}

/// Identity of a record: sheet plus index key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordId {
    pub sheet: String,
    pub key: IndexKey,
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sheet, self.key)
    }
}

/// A logical row reconstructed from a sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub sheet: String,
    pub key: IndexKey,
    pub fields: FieldMap,
}

impl Record {
    pub fn new(sheet: impl Into<String>, key: IndexKey, fields: FieldMap) -> Self {
        Self {
            sheet: sheet.into(),
            key,
            fields,
        }
    }

    pub fn id(&self) -> RecordId {
        RecordId {
            sheet: self.sheet.clone(),
            key: self.key.clone(),
        }
    }
}

/// Records of one workbook version, in build order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSnapshot {
    records: Vec<Record>,
}

impl RecordSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for RecordSnapshot {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<Record> for RecordSnapshot {
    fn extend<T: IntoIterator<Item = Record>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}
