//! Integration tests for the gridpatch binary (snapshot + action JSON in,
//! snapshot/changes JSON out).

use std::path::PathBuf;
use std::process::Command;

struct Cleanup(Vec<PathBuf>);

impl Drop for Cleanup {
    fn drop(&mut self) {
        for path in &self.0 {
            let _ = std::fs::remove_file(path);
        }
    }
}

fn temp_file(tag: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "gridpatch_{}_{}_{}_{:?}.json",
        tag,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos(),
        std::thread::current().id(),
    ));
    std::fs::write(&path, contents).expect("failed to write temp file");
    path
}

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

const PEOPLE: &str = r#"{
    "headers": ["Name", "Age"],
    "rows": [["Alice", 25], ["Bob", 30]]
}"#;

#[test]
fn test_apply_set_value() {
    let snapshot = temp_file("snap", PEOPLE);
    let action = temp_file(
        "action",
        r#"{"type": "SET_VALUE", "target": "B3", "value": 31}"#,
    );
    let _cleanup = Cleanup(vec![snapshot.clone(), action.clone()]);

    let (stdout, _, code) = run_command(&[
        snapshot.to_str().unwrap(),
        "-a",
        action.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["rows"][1][1], serde_json::json!(31.0));
    assert_eq!(result["rows"][0][1], serde_json::json!(25.0));
}

#[test]
fn test_changes_only_prints_compiled_list() {
    let snapshot = temp_file("snap", PEOPLE);
    let action = temp_file("action", r#"{"type": "DELETE_ROW", "target": "3"}"#);
    let _cleanup = Cleanup(vec![snapshot.clone(), action.clone()]);

    let (stdout, _, code) = run_command(&[
        snapshot.to_str().unwrap(),
        "-a",
        action.to_str().unwrap(),
        "-c",
    ]);
    assert_eq!(code, 0);
    let changes: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(changes[0]["kind"], "row_delete");
    assert_eq!(changes[0]["row"], 1);
}

#[test]
fn test_inverse_round_trips_through_two_runs() {
    let snapshot = temp_file("snap", PEOPLE);
    let action = temp_file("action", r#"{"type": "DELETE_ROW", "target": "3"}"#);
    let _cleanup = Cleanup(vec![snapshot.clone(), action.clone()]);

    let (stdout, _, code) = run_command(&[
        snapshot.to_str().unwrap(),
        "-a",
        action.to_str().unwrap(),
        "-i",
    ]);
    assert_eq!(code, 0);
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["snapshot"]["rows"].as_array().unwrap().len(), 1);
    assert_eq!(result["inverse"][0]["kind"], "row_insert");
    assert_eq!(result["inverse"][0]["row"], 1);
}

#[test]
fn test_chained_actions_apply_in_order() {
    let snapshot = temp_file("snap", PEOPLE);
    let add = temp_file(
        "action",
        r#"{"type": "ADD_COLUMN", "newColumnName": "City"}"#,
    );
    let fill = temp_file(
        "action2",
        r#"{"type": "SET_VALUE", "target": "C2:C3", "value": "Paris"}"#,
    );
    let _cleanup = Cleanup(vec![snapshot.clone(), add.clone(), fill.clone()]);

    let (stdout, _, code) = run_command(&[
        snapshot.to_str().unwrap(),
        "-a",
        add.to_str().unwrap(),
        "-a",
        fill.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        result["headers"],
        serde_json::json!(["Name", "Age", "City"])
    );
    assert_eq!(result["rows"][0][2], "Paris");
    assert_eq!(result["rows"][1][2], "Paris");
}

#[test]
fn test_changes_mode_compiles_against_updated_snapshot() {
    // The second intent targets the column the first one adds; in --changes
    // mode the snapshot still advances between intents, so the fill compiles
    // against a three-column grid instead of the stale two-column one.
    let snapshot = temp_file("snap", PEOPLE);
    let add = temp_file(
        "action",
        r#"{"type": "ADD_COLUMN", "newColumnName": "City"}"#,
    );
    let fill = temp_file(
        "action2",
        r#"{"type": "SET_VALUE", "target": "C2:C3", "value": "Paris"}"#,
    );
    let _cleanup = Cleanup(vec![snapshot.clone(), add.clone(), fill.clone()]);

    let (stdout, _, code) = run_command(&[
        snapshot.to_str().unwrap(),
        "-a",
        add.to_str().unwrap(),
        "-a",
        fill.to_str().unwrap(),
        "-c",
    ]);
    assert_eq!(code, 0);
    let changes: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(changes.as_array().unwrap().len(), 3);
    assert_eq!(changes[0]["kind"], "column_add");
    assert_eq!(changes[1]["kind"], "cell_update");
    assert_eq!(changes[1]["col"], 2);
    assert_eq!(changes[2]["col"], 2);
}

#[test]
fn test_ragged_snapshot_is_rejected() {
    let snapshot = temp_file(
        "snap",
        r#"{"headers": ["Name", "Age"], "rows": [["Alice"]]}"#,
    );
    let action = temp_file(
        "action",
        r#"{"type": "SET_VALUE", "target": "B2", "value": 1}"#,
    );
    let _cleanup = Cleanup(vec![snapshot.clone(), action.clone()]);

    let (_, stderr, code) = run_command(&[
        snapshot.to_str().unwrap(),
        "-a",
        action.to_str().unwrap(),
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("expected 2"));
}

#[test]
fn test_bad_action_file_fails_with_error() {
    let snapshot = temp_file("snap", PEOPLE);
    let action = temp_file("action", "not json");
    let _cleanup = Cleanup(vec![snapshot.clone(), action.clone()]);

    let (_, stderr, code) = run_command(&[
        snapshot.to_str().unwrap(),
        "-a",
        action.to_str().unwrap(),
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error:"));
}
