use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::TempDir;
use predicates::prelude::*;

const TARGET: &str = "00000000-1234-5678-1234-567812345678";
const AUTHOR: &str = "10000000-1234-5678-1234-567812345678";
const VIEWER: &str = "20000000-1234-5678-1234-567812345678";

/// Run datalog with given args.
fn datalog() -> Command {
    let mut cmd = cargo_bin_cmd!("datalog");
    cmd.env_remove("DATALOG_DIR").env_remove("RUST_LOG");
    cmd
}

/// A temp directory with `datalog init` already run.
fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    datalog()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

/// Create a comment through the `run` command and return its UUID.
fn create_comment(dir: &TempDir) -> String {
    let args =
        format!(r#"{{"target_uuid":"{TARGET}","author_uuid":"{AUTHOR}","text":"comment 1"}}"#);
    let output = datalog()
        .current_dir(dir.path())
        .args(["run", "create_comment", args.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json_start = stdout.find('{').unwrap();
    let created: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    created["comment_uuid"].as_str().unwrap().to_string()
}

// ─── init ───────────────────────────────────────────────────────

#[test]
fn init_creates_config_and_database() {
    let dir = initialized();

    assert!(dir.path().join(".datalog/config.toml").exists());
    assert!(dir.path().join(".datalog/datalog.db").exists());
}

#[test]
fn init_twice_fails() {
    let dir = initialized();

    datalog()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn commands_require_init() {
    let dir = TempDir::new().unwrap();

    datalog()
        .current_dir(dir.path())
        .arg("log")
        .assert()
        .failure()
        .stderr(predicate::str::contains("datalog init"));
}

#[test]
fn custom_config_dir() {
    let dir = TempDir::new().unwrap();

    datalog()
        .current_dir(dir.path())
        .args(["--config", "store", "init"])
        .assert()
        .success();

    assert!(dir.path().join("store/datalog.db").exists());
}

// ─── comment ────────────────────────────────────────────────────

#[test]
fn comment_create_is_logged() {
    let dir = initialized();

    datalog()
        .current_dir(dir.path())
        .args([
            "comment", "create", "--target", TARGET, "--author", AUTHOR, "--text", "hello",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created comment"));

    datalog()
        .current_dir(dir.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("create_comment"))
        .stdout(predicate::str::contains(TARGET));
}

#[test]
fn comment_edit_unknown_fails() {
    let dir = initialized();

    datalog()
        .current_dir(dir.path())
        .args([
            "comment",
            "edit",
            "30000000-1234-5678-1234-567812345678",
            "--text",
            "x",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("affected 0"));

    datalog()
        .current_dir(dir.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("No log records found"));
}

#[test]
fn comment_view_and_list() {
    let dir = initialized();
    let comment = create_comment(&dir);

    datalog()
        .current_dir(dir.path())
        .args(["comment", "view", comment.as_str(), "--viewer", VIEWER])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded view"));

    datalog()
        .current_dir(dir.path())
        .args(["comment", "list", "--target", TARGET])
        .assert()
        .success()
        .stdout(predicate::str::contains(comment.as_str()))
        .stdout(predicate::str::contains("comment 1"));
}

#[test]
fn comment_delete_twice_fails() {
    let dir = initialized();
    let comment = create_comment(&dir);

    datalog()
        .current_dir(dir.path())
        .args(["comment", "delete", comment.as_str()])
        .assert()
        .success();

    datalog()
        .current_dir(dir.path())
        .args(["comment", "delete", comment.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("delete_comment"));
}

#[test]
fn comment_rejects_malformed_uuid() {
    let dir = initialized();

    datalog()
        .current_dir(dir.path())
        .args(["comment", "delete", "not-a-uuid"])
        .assert()
        .failure();
}

// ─── run / actions ──────────────────────────────────────────────

#[test]
fn actions_lists_registered_names() {
    datalog()
        .arg("actions")
        .assert()
        .success()
        .stdout(predicate::str::contains("create_comment"))
        .stdout(predicate::str::contains("edit_comment"))
        .stdout(predicate::str::contains("delete_comment"))
        .stdout(predicate::str::contains("store_comment_view"));
}

#[test]
fn run_unknown_action_fails() {
    let dir = initialized();

    datalog()
        .current_dir(dir.path())
        .args(["run", "purge", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

#[test]
fn run_positional_arguments_rejected() {
    let dir = initialized();

    let args = format!(r#"["{TARGET}","{AUTHOR}","hi"]"#);

    datalog()
        .current_dir(dir.path())
        .args(["run", "create_comment", args.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("named arguments"));
}

// ─── log ────────────────────────────────────────────────────────

#[test]
fn log_operation_filter_and_last() {
    let dir = initialized();
    let comment = create_comment(&dir);

    datalog()
        .current_dir(dir.path())
        .args(["comment", "view", comment.as_str(), "--viewer", VIEWER])
        .assert()
        .success();

    datalog()
        .current_dir(dir.path())
        .args(["log", "--operation", "store_comment_view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 records"))
        .stdout(predicate::str::contains(VIEWER));

    datalog()
        .current_dir(dir.path())
        .args(["log", "--last", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("store_comment_view"))
        .stdout(predicate::str::contains("create_comment").not());
}

#[test]
fn log_invalid_since_fails() {
    let dir = initialized();

    datalog()
        .current_dir(dir.path())
        .args(["log", "--since", "last tuesday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}
