use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

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
fn stats_counts_the_full_collection() {
    let store_path = temp_path("cli-stats.json");
    run(&store_path, &["add", "first task"]);
    run(&store_path, &["add", "second task"]);
    run(&store_path, &["add", "third task"]);
    run(&store_path, &["toggle", "2"]);

    let output = run(&store_path, &["stats"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("3 total | 1 completed | 2 pending"));
}

#[test]
fn stats_ignores_the_current_filter() {
    let store_path = temp_path("cli-stats-filtered.json");
    run(&store_path, &["add", "first task"]);
    run(&store_path, &["add", "second task"]);
    run(&store_path, &["toggle", "1"]);
    run(&store_path, &["filter", "completed"]);

    let output = run(&store_path, &["stats"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 total | 1 completed | 1 pending"));
}

#[test]
fn stats_json_partitions_the_total() {
    let store_path = temp_path("cli-stats-json.json");
    run(&store_path, &["add", "first task"]);
    run(&store_path, &["add", "second task"]);
    run(&store_path, &["toggle", "1"]);

    let output = run(&store_path, &["stats", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let total = value["total"].as_u64().unwrap();
    let completed = value["completed"].as_u64().unwrap();
    let pending = value["pending"].as_u64().unwrap();
    assert_eq!(total, 2);
    assert_eq!(total, completed + pending);
}
