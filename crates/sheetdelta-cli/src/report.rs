//! Change report rendering (text and JSON)

use std::fmt::{self, Write};

use serde::Serialize;
use sheetdelta_core::{
    CellChange, CellId, Change, ChangeSet, ChangeSummary, FieldMap, RecordChange, RecordId,
};

/// JSON report layout
#[derive(Serialize)]
struct JsonReport<'a, I, V> {
    added: &'a [Change<I, V>],
    removed: &'a [Change<I, V>],
    updated: &'a [Change<I, V>],
    summary: ChangeSummary,
}

/// Render a change set as pretty-printed JSON
pub fn render_json<I: Serialize, V: Serialize>(
    changes: &ChangeSet<I, V>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        added: &changes.added,
        removed: &changes.removed,
        updated: &changes.updated,
        summary: changes.summary(),
    })
}

/// One-line summary, e.g. `3 changes: 1 added, 0 removed, 2 updated`
pub fn summary_line(summary: &ChangeSummary) -> String {
    if summary.total() == 0 {
        return "No changes".to_string();
    }
    format!(
        "{} change{}: {} added, {} removed, {} updated",
        summary.total(),
        if summary.total() == 1 { "" } else { "s" },
        summary.added,
        summary.removed,
        summary.updated
    )
}

/// Render a cell change set as text
pub fn render_cell_text(changes: &ChangeSet<CellId, String>) -> String {
    let mut out = String::new();
    section(&mut out, "New Cells", &changes.added, describe_cell);
    section(&mut out, "Removed Cells", &changes.removed, describe_cell);
    section(&mut out, "Updated Cells", &changes.updated, describe_cell);
    out.push('\n');
    out.push_str(&summary_line(&changes.summary()));
    out.push('\n');
    out
}

/// Render a record change set as text, listing changed fields of updated records
pub fn render_record_text(changes: &ChangeSet<RecordId, FieldMap>) -> String {
    let mut out = String::new();
    section(&mut out, "New Records", &changes.added, describe_record);
    section(&mut out, "Removed Records", &changes.removed, describe_record);
    section(&mut out, "Updated Records", &changes.updated, describe_record);
    out.push('\n');
    out.push_str(&summary_line(&changes.summary()));
    out.push('\n');
    out
}

fn section<C>(
    out: &mut String,
    heading: &str,
    changes: &[C],
    describe: fn(&mut String, &C) -> fmt::Result,
) {
    out.push_str(heading);
    out.push_str(":\n");
    for change in changes {
        // Writing into a String cannot fail
        let _ = describe(out, change);
    }
}

fn describe_cell(out: &mut String, change: &CellChange) -> fmt::Result {
    match change {
        Change::Added { identity, new_value } => writeln!(out, "* {}: {:?}", identity, new_value),
        Change::Removed { identity, old_value } => writeln!(out, "* {}: {:?}", identity, old_value),
        Change::Updated {
            identity,
            old_value,
            new_value,
        } => writeln!(out, "* {}: {:?} -> {:?}", identity, old_value, new_value),
    }
}

fn describe_record(out: &mut String, change: &RecordChange) -> fmt::Result {
    match change {
        Change::Added { identity, new_value } => writeln!(out, "* {} {}", identity, new_value),
        Change::Removed { identity, old_value } => writeln!(out, "* {} {}", identity, old_value),
        Change::Updated {
            identity,
            old_value,
            new_value,
        } => {
            writeln!(out, "* {}", identity)?;
            for line in field_changes(old_value, new_value) {
                writeln!(out, "    {}", line)?;
            }
            Ok(())
        }
    }
}

/// Per-field differences between two versions of a record
///
/// Fields are listed in the new version's order, then fields that only the
/// old version had.
pub fn field_changes(old: &FieldMap, new: &FieldMap) -> Vec<String> {
    let mut lines = Vec::new();

    for (name, value) in new.iter() {
        match old.get(name) {
            Some(previous) if previous == value => {}
            Some(previous) => lines.push(format!("{}: {:?} -> {:?}", name, previous, value)),
            None => lines.push(format!("{}: (new) {:?}", name, value)),
        }
    }
    for (name, value) in old.iter() {
        if !new.contains(name) {
            lines.push(format!("{}: {:?} (dropped)", name, value));
        }
    }

    lines
}
