//! Integration tests for sheetdelta CLI
//!
//! These tests run the commands end to end on CSV files written to a
//! temporary directory. A CSV file maps to one sheet named after its stem,
//! so both versions live in separate directories under the same name.

use std::fs;
use std::path::PathBuf;

use sheetdelta_cli::{cells_command, records_command, sheets_command, OutputFormat};
use tempfile::TempDir;

const CLIENTS_V1: &str = "ID Client,Nom,Age\nC001,Dupont,34\nC002,Martin,51\nC003,Moreau,27\n";
const CLIENTS_V2: &str = "ID Client,Nom,Age\nC001,Dupont,35\nC003,Moreau,27\nC004,Bernard,42\n";

const CLIENTS_CONFIG: &str = r#"
[[sheet]]
name = "clients"
index = ["ID Client"]
"#;

struct Fixture {
    dir: TempDir,
    origin: PathBuf,
    updated: PathBuf,
}

impl Fixture {
    fn new(origin: &str, updated: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let origin_path = write_version(&dir, "v1", origin);
        let updated_path = write_version(&dir, "v2", updated);
        Self {
            dir,
            origin: origin_path,
            updated: updated_path,
        }
    }

    fn config(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("sheetdelta.toml");
        fs::write(&path, content).unwrap();
        path
    }
}

fn write_version(dir: &TempDir, version: &str, content: &str) -> PathBuf {
    let version_dir = dir.path().join(version);
    fs::create_dir_all(&version_dir).unwrap();
    let path = version_dir.join("clients.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cells_text_report() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V2);

    let (report, summary) =
        cells_command(&fixture.origin, &fixture.updated, OutputFormat::Text, None).unwrap();

    // Same 4x3 grid: the Age change plus the two rows shifted by the deletion
    assert_eq!((summary.added, summary.removed, summary.updated), (0, 0, 7));
    assert!(report.starts_with("New Cells:\nRemoved Cells:\nUpdated Cells:\n"));
    assert!(report.contains("* clients!R2C3: \"34\" -> \"35\"\n"));
    assert!(report.contains("* clients!R4C1: \"C003\" -> \"C004\"\n"));
    assert!(report.ends_with("7 changes: 0 added, 0 removed, 7 updated\n"));
}

#[test]
fn test_cells_json_report() {
    let fixture = Fixture::new(CLIENTS_V1, "ID Client,Nom,Age\nC001,Dupont,34\n");

    let (report, summary) =
        cells_command(&fixture.origin, &fixture.updated, OutputFormat::Json, None).unwrap();
    assert_eq!(summary.removed, 6);

    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value["summary"]["removed"], 6);

    let first = &value["removed"][0];
    assert_eq!(first["change"], "removed");
    assert_eq!(first["identity"]["sheet"], "clients");
    assert_eq!(first["identity"]["row"], 3);
    assert_eq!(first["identity"]["col"], 1);
    assert_eq!(first["old_value"], "C002");
}

#[test]
fn test_cells_identical_files() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V1);

    let (report, summary) =
        cells_command(&fixture.origin, &fixture.updated, OutputFormat::Text, None).unwrap();

    assert_eq!(summary.total(), 0);
    assert!(report.ends_with("No changes\n"));
}

#[test]
fn test_cells_sheet_filter() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V2);

    let (_, summary) = cells_command(
        &fixture.origin,
        &fixture.updated,
        OutputFormat::Text,
        Some("Villes"),
    )
    .unwrap();
    assert_eq!(summary.total(), 0);

    let (_, summary) = cells_command(
        &fixture.origin,
        &fixture.updated,
        OutputFormat::Text,
        Some("clients"),
    )
    .unwrap();
    assert_eq!(summary.updated, 7);
}

#[test]
fn test_records_with_index_config() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V2);
    let config = fixture.config(CLIENTS_CONFIG);

    let (report, summary) = records_command(
        &fixture.origin,
        &fixture.updated,
        Some(&config),
        None,
        OutputFormat::Text,
    )
    .unwrap();

    assert_eq!((summary.added, summary.removed, summary.updated), (1, 1, 1));
    assert!(report.contains(
        "New Records:\n* clients {ID Client: \"C004\"} {ID Client: \"C004\", Nom: \"Bernard\", Age: \"42\"}\n"
    ));
    assert!(report.contains("* clients {ID Client: \"C002\"}"));
    assert!(report.contains("Updated Records:\n* clients {ID Client: \"C001\"}\n    Age: \"34\" -> \"35\"\n"));
}

#[test]
fn test_records_json_report() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V2);
    let config = fixture.config(CLIENTS_CONFIG);

    let (report, _) = records_command(
        &fixture.origin,
        &fixture.updated,
        Some(&config),
        None,
        OutputFormat::Json,
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    let updated = &value["updated"][0];
    assert_eq!(updated["identity"]["key"]["ID Client"], "C001");
    assert_eq!(updated["old_value"]["Age"], "34");
    assert_eq!(updated["new_value"]["Age"], "35");
    assert_eq!(value["added"][0]["new_value"]["Nom"], "Bernard");
}

#[test]
fn test_records_default_schemas_match_by_row() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V2);
    let config = fixture.config("");

    let (report, summary) = records_command(
        &fixture.origin,
        &fixture.updated,
        Some(&config),
        None,
        OutputFormat::Text,
    )
    .unwrap();

    // Without an index every data row keeps its row number as identity
    assert_eq!((summary.added, summary.removed, summary.updated), (0, 0, 3));
    assert!(report.contains("* clients row 2\n    Age: \"34\" -> \"35\"\n"));
}

#[test]
fn test_records_headerless_positional_index() {
    let fixture = Fixture::new("x,C1,10\nx,C2,20\n", "x,C2,21\nx,C1,10\n");
    let config = fixture.config(
        r#"
[[sheet]]
name = "clients"
has_header = false
col_offset = 1
index = [2]
"#,
    );

    let (_, summary) = records_command(
        &fixture.origin,
        &fixture.updated,
        Some(&config),
        None,
        OutputFormat::Text,
    )
    .unwrap();

    // Reordering is invisible with an index; only C2's value changed
    assert_eq!((summary.added, summary.removed, summary.updated), (0, 0, 1));
}

#[test]
fn test_records_invalid_config_is_an_error() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V2);
    let config = fixture.config("[[sheet]]\nname = \"clients\"\nindex = [1]\n");

    let result = records_command(
        &fixture.origin,
        &fixture.updated,
        Some(&config),
        None,
        OutputFormat::Text,
    );
    assert!(result.is_err());
}

#[test]
fn test_sheets_command() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V2);

    let sheets = sheets_command(&fixture.origin).unwrap();
    assert_eq!(sheets, vec!["clients".to_string()]);
}

#[test]
fn test_missing_input_is_an_error() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V2);
    let missing = fixture.dir.path().join("missing.csv");

    assert!(cells_command(&missing, &fixture.updated, OutputFormat::Text, None).is_err());
    assert!(sheets_command(&missing).is_err());
}

#[test]
fn test_unsupported_extension_is_an_error() {
    let fixture = Fixture::new(CLIENTS_V1, CLIENTS_V2);
    let path = fixture.dir.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();

    let error = sheets_command(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("notes.txt"));
}
