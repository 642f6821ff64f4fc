//! Three-way change detection between two snapshots.
//!
//! Both differs share one algorithm: index each snapshot by identity, then
//! take `updated \ origin` (added), `origin \ updated` (removed) and the
//! intersection filtered by value inequality (updated).
//!
//! Output order is deterministic: `added` follows the updated snapshot,
//! `removed` and `updated` follow the origin snapshot. When a snapshot holds
//! the same identity twice, the first position and the last value are kept.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellId, CellSnapshot};
use crate::record::{FieldMap, Record, RecordId, RecordSnapshot};

/// Kind of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Updated,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Updated => "updated",
        }
    }
}

/// How one identity's value differs between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "lowercase")]
pub enum Change<I, V> {
    Added { identity: I, new_value: V },
    Removed { identity: I, old_value: V },
    Updated { identity: I, old_value: V, new_value: V },
}

impl<I, V> Change<I, V> {
    pub fn identity(&self) -> &I {
        match self {
            Change::Added { identity, .. }
            | Change::Removed { identity, .. }
            | Change::Updated { identity, .. } => identity,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Added { .. } => ChangeKind::Added,
            Change::Removed { .. } => ChangeKind::Removed,
            Change::Updated { .. } => ChangeKind::Updated,
        }
    }

    /// Value in the origin snapshot, `None` for additions
    pub fn old_value(&self) -> Option<&V> {
        match self {
            Change::Added { .. } => None,
            Change::Removed { old_value, .. } | Change::Updated { old_value, .. } => {
                Some(old_value)
            }
        }
    }

    /// Value in the updated snapshot, `None` for removals
    pub fn new_value(&self) -> Option<&V> {
        match self {
            Change::Removed { .. } => None,
            Change::Added { new_value, .. } | Change::Updated { new_value, .. } => {
                Some(new_value)
            }
        }
    }
}

pub type CellChange = Change<CellId, String>;
pub type RecordChange = Change<RecordId, FieldMap>;

/// Result of one diff: three ordered lists of changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSet<I, V> {
    pub added: Vec<Change<I, V>>,
    pub removed: Vec<Change<I, V>>,
    pub updated: Vec<Change<I, V>>,
}

impl<I, V> Default for ChangeSet<I, V> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            updated: Vec::new(),
        }
    }
}

impl<I, V> ChangeSet<I, V> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.updated.len()
    }

    /// All changes: added, then removed, then updated
    pub fn iter(&self) -> impl Iterator<Item = &Change<I, V>> {
        self.added
            .iter()
            .chain(self.removed.iter())
            .chain(self.updated.iter())
    }

    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary {
            added: self.added.len(),
            removed: self.removed.len(),
            updated: self.updated.len(),
        }
    }
}

/// Change counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
}

impl ChangeSummary {
    pub fn total(&self) -> usize {
        self.added + self.removed + self.updated
    }
}

/// An entity that can be matched across snapshots
pub trait Diffable {
    type Id: Clone + Eq + Hash;
    type Value: Clone + PartialEq;

    fn identity(&self) -> Self::Id;
    fn value(&self) -> &Self::Value;
}

impl Diffable for Cell {
    type Id = CellId;
    type Value = String;

    fn identity(&self) -> CellId {
        self.id()
    }

    fn value(&self) -> &String {
        &self.value
    }
}

impl Diffable for Record {
    type Id = RecordId;
    type Value = FieldMap;

    fn identity(&self) -> RecordId {
        self.id()
    }

    fn value(&self) -> &FieldMap {
        &self.fields
    }
}

/// Identities in first-seen order plus a lookup holding each identity's last entity
struct Index<'a, E: Diffable> {
    order: Vec<E::Id>,
    lookup: HashMap<E::Id, &'a E>,
}

impl<'a, E: Diffable> Index<'a, E> {
    fn build(entities: &'a [E]) -> Self {
        let mut order = Vec::with_capacity(entities.len());
        let mut lookup = HashMap::with_capacity(entities.len());

        for entity in entities {
            let id = entity.identity();
            if lookup.insert(id.clone(), entity).is_none() {
                order.push(id);
            }
        }

        if order.len() < entities.len() {
            log::debug!(
                "{} entities share an identity with an earlier one; the last occurrence wins",
                entities.len() - order.len()
            );
        }

        Self { order, lookup }
    }

    fn entries(&self) -> impl Iterator<Item = (&E::Id, &'a E)> + '_ {
        self.order.iter().filter_map(|id| self.lookup.get(id).map(|e| (id, *e)))
    }
}

/// Classify every identity of two entity collections as added, removed or updated
pub fn diff_entities<E: Diffable>(origin: &[E], updated: &[E]) -> ChangeSet<E::Id, E::Value> {
    let origin_index = Index::build(origin);
    let updated_index = Index::build(updated);
    let mut changes = ChangeSet::default();

    for (id, new) in updated_index.entries() {
        if !origin_index.lookup.contains_key(id) {
            changes.added.push(Change::Added {
                identity: id.clone(),
                new_value: new.value().clone(),
            });
        }
    }

    for (id, old) in origin_index.entries() {
        match updated_index.lookup.get(id) {
            None => changes.removed.push(Change::Removed {
                identity: id.clone(),
                old_value: old.value().clone(),
            }),
            Some(new) if old.value() != new.value() => changes.updated.push(Change::Updated {
                identity: id.clone(),
                old_value: old.value().clone(),
                new_value: new.value().clone(),
            }),
            Some(_) => {}
        }
    }

    log::debug!(
        "Diff: {} added, {} removed, {} updated",
        changes.added.len(),
        changes.removed.len(),
        changes.updated.len()
    );

    changes
}

/// Diff two cell snapshots by `(sheet, row, col)`
pub fn diff_cells(origin: &CellSnapshot, updated: &CellSnapshot) -> ChangeSet<CellId, String> {
    diff_entities(origin.cells(), updated.cells())
}

/// Diff two record snapshots by `(sheet, index key)`, comparing whole field maps
pub fn diff_records(
    origin: &RecordSnapshot,
    updated: &RecordSnapshot,
) -> ChangeSet<RecordId, FieldMap> {
    diff_entities(origin.records(), updated.records())
}

/// Cell-level differ
#[derive(Debug, Clone, Copy, Default)]
pub struct CellDiffer;

impl CellDiffer {
    pub fn diff(origin: &CellSnapshot, updated: &CellSnapshot) -> ChangeSet<CellId, String> {
        diff_cells(origin, updated)
    }
}

/// Record-level differ
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDiffer;

impl RecordDiffer {
    pub fn diff(
        origin: &RecordSnapshot,
        updated: &RecordSnapshot,
    ) -> ChangeSet<RecordId, FieldMap> {
        diff_records(origin, updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::IndexKey;

    fn cells(entries: &[(&str, u32, u32, &str)]) -> CellSnapshot {
        entries
            .iter()
            .map(|(sheet, row, col, value)| Cell::text(*sheet, *row, *col, *value))
            .collect()
    }

    #[test]
    fn test_cell_scenario() {
        let origin = cells(&[("Sheet1", 1, 1, "a")]);
        let updated = cells(&[("Sheet1", 1, 1, "b"), ("Sheet1", 2, 1, "c")]);

        let changes = diff_cells(&origin, &updated);

        assert_eq!(
            changes.updated,
            vec![Change::Updated {
                identity: CellId::new("Sheet1", 1, 1),
                old_value: "a".to_string(),
                new_value: "b".to_string(),
            }]
        );
        assert_eq!(
            changes.added,
            vec![Change::Added {
                identity: CellId::new("Sheet1", 2, 1),
                new_value: "c".to_string(),
            }]
        );
        assert!(changes.removed.is_empty());
    }

    #[test]
    fn test_removed_cell() {
        let origin = cells(&[("S", 1, 1, "a"), ("S", 1, 2, "b")]);
        let updated = cells(&[("S", 1, 1, "a")]);

        let changes = diff_cells(&origin, &updated);
        assert_eq!(changes.summary(), ChangeSummary { added: 0, removed: 1, updated: 0 });
        assert_eq!(changes.removed[0].identity(), &CellId::new("S", 1, 2));
        assert_eq!(changes.removed[0].old_value(), Some(&"b".to_string()));
        assert_eq!(changes.removed[0].new_value(), None);
    }

    #[test]
    fn test_same_coordinates_on_other_sheet_are_distinct() {
        let origin = cells(&[("A", 1, 1, "x")]);
        let updated = cells(&[("B", 1, 1, "x")]);

        let changes = diff_cells(&origin, &updated);
        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.removed.len(), 1);
        assert!(changes.updated.is_empty());
    }

    #[test]
    fn test_comparison_is_exact() {
        let origin = cells(&[("S", 1, 1, "Ann"), ("S", 1, 2, "1")]);
        let updated = cells(&[("S", 1, 1, "ann"), ("S", 1, 2, "1.0")]);

        assert_eq!(diff_cells(&origin, &updated).updated.len(), 2);
    }

    #[test]
    fn test_output_order() {
        let origin = cells(&[("S", 3, 1, "c"), ("S", 1, 1, "a"), ("S", 2, 1, "b")]);
        let updated = cells(&[("S", 5, 1, "e"), ("S", 4, 1, "d"), ("S", 2, 1, "B")]);

        let changes = diff_cells(&origin, &updated);
        let rows = |list: &[CellChange]| list.iter().map(|c| c.identity().row).collect::<Vec<_>>();
        assert_eq!(rows(&changes.added), vec![5, 4]);
        assert_eq!(rows(&changes.removed), vec![3, 1]);
        assert_eq!(rows(&changes.updated), vec![2]);
    }

    #[test]
    fn test_duplicate_identity_last_value_wins() {
        let origin = cells(&[("S", 1, 1, "old"), ("S", 1, 1, "new")]);
        let updated = cells(&[("S", 1, 1, "new")]);

        assert!(diff_cells(&origin, &updated).is_empty());
    }

    #[test]
    fn test_record_update_carries_full_field_maps() {
        let key = IndexKey::Keyed(vec![("ID", "C1")].into_iter().collect());
        let old: FieldMap = vec![("ID", "C1"), ("Name", "Ann")].into_iter().collect();
        let new: FieldMap = vec![("ID", "C1"), ("Name", "Anne")].into_iter().collect();

        let origin: RecordSnapshot = vec![Record::new("Clients", key.clone(), old.clone())]
            .into_iter()
            .collect();
        let updated: RecordSnapshot = vec![Record::new("Clients", key.clone(), new.clone())]
            .into_iter()
            .collect();

        let changes = RecordDiffer::diff(&origin, &updated);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.updated[0].identity().key, key);
        assert_eq!(changes.updated[0].old_value(), Some(&old));
        assert_eq!(changes.updated[0].new_value(), Some(&new));
    }

    #[test]
    fn test_record_with_added_field_is_updated() {
        let key = IndexKey::Positional(2);
        let old: FieldMap = vec![("Name", "Ann")].into_iter().collect();
        let new: FieldMap = vec![("Name", "Ann"), ("Age", "30")].into_iter().collect();

        let origin: RecordSnapshot = vec![Record::new("S", key.clone(), old)].into_iter().collect();
        let updated: RecordSnapshot = vec![Record::new("S", key, new)].into_iter().collect();

        let changes = diff_records(&origin, &updated);
        assert_eq!(changes.updated.len(), 1);
        assert!(changes.added.is_empty());
        assert!(changes.removed.is_empty());
    }

    #[test]
    fn test_change_serializes_with_kind_tag() {
        let change: CellChange = Change::Added {
            identity: CellId::new("S", 2, 1),
            new_value: "c".to_string(),
        };
        let json = serde_json::to_value(&change).unwrap();

        assert_eq!(json["change"], "added");
        assert_eq!(json["identity"]["row"], 2);
        assert_eq!(json["new_value"], "c");
        assert_eq!(change.kind().as_str(), "added");
    }

    #[test]
    fn test_iter_visits_all_kinds() {
        let origin = cells(&[("S", 1, 1, "a"), ("S", 2, 1, "b")]);
        let updated = cells(&[("S", 1, 1, "z"), ("S", 3, 1, "c")]);

        let kinds: Vec<ChangeKind> = CellDiffer::diff(&origin, &updated)
            .iter()
            .map(Change::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Added, ChangeKind::Removed, ChangeKind::Updated]
        );
    }
}
