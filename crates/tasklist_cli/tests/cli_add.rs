use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    Command::new(exe)
        .args(args)
        .env("TASKLIST_STORE_PATH", store_path)
        .env("TASKLIST_CONFIG_PATH", temp_path("no-config.json"))
        .env("TASKLIST_DISABLE_NOTIFICATIONS", "1")
        .output()
        .expect("failed to run tasklist")
}

#[test]
fn add_command_succeeds() {
    let store_path = temp_path("cli-add.json");
    let output = run(&store_path, &["add", "Buy milk"]);

    let content = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task:"));

    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(value["taskIdCounter"], 2);
}

#[test]
fn add_command_rejects_missing_text() {
    let store_path = temp_path("cli-add-missing.json");
    let output = run(&store_path, &["add"]);

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn add_command_rejects_short_text_without_writing() {
    let store_path = temp_path("cli-add-short.json");
    let output = run(&store_path, &["add", "ok"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(!store_path.exists());
}

#[test]
fn add_command_rejects_case_insensitive_duplicate() {
    let store_path = temp_path("cli-add-duplicate.json");
    let first = run(&store_path, &["add", "Buy milk"]);
    let second = run(&store_path, &["add", "Buy Milk"]);

    let content = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(first.status.success());
    assert!(!second.status.success());
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(stderr.contains("ERROR: duplicate"));

    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["tasks"].as_array().unwrap().len(), 1);
}

#[test]
fn add_command_json_uses_wire_keys() {
    let store_path = temp_path("cli-add-json.json");
    let output = run(&store_path, &["add", "Buy milk", "--json"]);

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["id"], 1);
    assert_eq!(value["text"], "Buy milk");
    assert_eq!(value["completed"], false);
    assert_eq!(value["priority"], "normal");
    assert!(value["completedAt"].is_null());

    let created_at = value["createdAt"].as_str().unwrap();
    OffsetDateTime::parse(created_at, &Rfc3339).unwrap();
}
