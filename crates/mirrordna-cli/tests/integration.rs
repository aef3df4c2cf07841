//! Integration tests for CLI commands.

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_mirrordna"))
        .args(args)
        .env_remove("MIRRORDNA_LOG")
        .env_remove("MIRRORDNA_LOG_FORMAT")
        .env_remove("MIRRORDNA_CONFIG_DIR")
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn create_vault() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("notes")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("a.txt"), "1").unwrap();
    fs::write(root.join("b.txt"), "2").unwrap();
    fs::write(root.join("notes").join("day.md"), "hello").unwrap();
    fs::write(root.join(".git").join("HEAD"), "ref").unwrap();
    temp_dir
}

#[test]
fn test_compute_hash_json() {
    let vault = create_vault();
    let (success, stdout, _) = run_cli(&["compute-hash", path_str(vault.path()), "--json", "--verbose"]);
    assert!(success);

    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["file_count"], 3);
    assert_eq!(report["state_hash"].as_str().unwrap().len(), 64);
    let files = report["files"].as_object().unwrap();
    assert!(files.contains_key("notes/day.md"));
    assert!(!files.contains_key(".git/HEAD"));
}

#[test]
fn test_compute_hash_tracks_changes() {
    let vault = create_vault();
    let hash = |dir: &Path| {
        let (success, stdout, _) = run_cli(&["compute-hash", path_str(dir), "--json"]);
        assert!(success);
        let report: Value = serde_json::from_str(&stdout).unwrap();
        report["state_hash"].as_str().unwrap().to_string()
    };

    let original = hash(vault.path());
    fs::write(vault.path().join("b.txt"), "3").unwrap();
    assert_ne!(hash(vault.path()), original);
    fs::write(vault.path().join("b.txt"), "2").unwrap();
    assert_eq!(hash(vault.path()), original);
}

#[test]
fn test_compute_hash_custom_ignore() {
    let vault = create_vault();
    let (success, stdout, _) = run_cli(&[
        "compute-hash",
        path_str(vault.path()),
        "--ignore",
        "notes",
        "--json",
    ]);
    assert!(success);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    // custom patterns replace the defaults, so .git is now included
    assert_eq!(report["file_count"], 3);
}

#[cfg(unix)]
#[test]
fn test_compute_hash_warns_about_skipped_files() {
    let vault = create_vault();
    std::os::unix::fs::symlink(vault.path().join("gone.txt"), vault.path().join("dangling.txt")).unwrap();

    let (success, stdout, stderr) = run_cli(&["compute-hash", path_str(vault.path()), "--json"]);
    assert!(success);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["file_count"], 3);
    assert_eq!(report["skipped"].as_array().unwrap().len(), 1);
    assert!(stderr.contains("file left out of state hash"));
}

#[test]
fn test_compute_hash_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");
    let (success, _, stderr) = run_cli(&["compute-hash", path_str(&missing)]);
    assert!(!success);
    assert!(stderr.contains("Error"));
    assert!(stderr.contains("not found"));
}

#[test]
fn test_canonicalize_command() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.json");
    fs::write(&input, "{ \"b\": [1, 2],\n  \"a\": {\"y\": null, \"x\": true} }").unwrap();

    let (success, stdout, _) = run_cli(&["canonicalize", path_str(&input)]);
    assert!(success);
    assert_eq!(stdout.trim_end(), r#"{"a":{"x":true,"y":null},"b":[1,2]}"#);

    let yaml = temp_dir.path().join("input.yaml");
    fs::write(&yaml, "b: [1, 2]\na:\n  y: null\n  x: true\n").unwrap();
    let (success, yaml_stdout, stderr) = run_cli(&["canonicalize", path_str(&yaml), "--digest"]);
    assert!(success);
    assert_eq!(yaml_stdout, stdout);
    assert!(stderr.contains("sha256: "));
}

#[test]
fn test_checksum_and_verify() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("data.txt");
    fs::write(&file, "hello").unwrap();

    let (success, stdout, _) = run_cli(&["checksum", path_str(&file)]);
    assert!(success);
    let digest = stdout.split_whitespace().next().unwrap().to_string();
    assert_eq!(
        digest,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );

    let (success, _, _) = run_cli(&["verify", path_str(&file), &digest.to_uppercase()]);
    assert!(success);

    fs::write(&file, "hello!").unwrap();
    let (success, _, stderr) = run_cli(&["verify", path_str(&file), &digest]);
    assert!(!success);
    assert!(stderr.contains("checksum mismatch"));
}

#[test]
fn test_text_checksum_normalizes_line_endings() {
    let temp_dir = TempDir::new().unwrap();
    let unix = temp_dir.path().join("unix.txt");
    let windows = temp_dir.path().join("windows.txt");
    fs::write(&unix, "line one\nline two\n").unwrap();
    fs::write(&windows, "line one  \r\nline two\r\n").unwrap();

    let digest_of = |path: &Path, extra: &[&str]| {
        let mut args = vec!["checksum", path_str(path), "--text"];
        args.extend_from_slice(extra);
        let (success, stdout, _) = run_cli(&args);
        assert!(success);
        stdout.split_whitespace().next().unwrap().to_string()
    };

    assert_eq!(digest_of(&unix, &[]), digest_of(&windows, &[]));
    assert_ne!(
        digest_of(&unix, &["--no-normalize"]),
        digest_of(&windows, &["--no-normalize"])
    );

    let expected = digest_of(&unix, &[]);
    let (success, _, _) = run_cli(&["verify", path_str(&windows), &expected, "--text"]);
    assert!(success);
}

#[test]
fn test_snapshot_capture_show_diff() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_json(&dir.join("identity.json"), &json!({"id": "alice"}));
    write_json(&dir.join("c1.json"), &json!({"sessions": 1}));
    write_json(&dir.join("c2.json"), &json!({"sessions": 2}));
    fs::write(dir.join("meta.yaml"), "source: cli-test\n").unwrap();

    let first = dir.join("s1.json");
    let second = dir.join("s2.yaml");
    let (success, stdout, stderr) = run_cli(&[
        "snapshot",
        "capture",
        "--id",
        "s1",
        "--identity",
        path_str(&dir.join("identity.json")),
        "--continuity",
        path_str(&dir.join("c1.json")),
        "--metadata",
        path_str(&dir.join("meta.yaml")),
        "--out",
        path_str(&first),
    ]);
    assert!(success, "capture failed: {stderr}");
    assert!(stdout.contains("Checksum:"));

    let (success, _, _) = run_cli(&[
        "snapshot",
        "capture",
        "--id",
        "s2",
        "--identity",
        path_str(&dir.join("identity.json")),
        "--continuity",
        path_str(&dir.join("c2.json")),
        "--out",
        path_str(&second),
    ]);
    assert!(success);

    let (success, stdout, _) = run_cli(&["snapshot", "show", path_str(&first)]);
    assert!(success);
    let shown: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(shown["snapshot_id"], "s1");
    assert_eq!(shown["metadata"]["source"], "cli-test");
    assert_eq!(shown["vault_state"], Value::Null);

    let (success, stdout, _) = run_cli(&["snapshot", "diff", path_str(&first), path_str(&second), "--json"]);
    assert!(success);
    let diff: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(diff["checksum_changed"], true);
    assert_eq!(diff["changed_sections"], json!(["continuity_state"]));
}

#[test]
fn test_snapshot_show_rejects_tampering() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_json(&dir.join("identity.json"), &json!({"id": "alice"}));
    write_json(&dir.join("continuity.json"), &json!({"sessions": 1}));
    let snap = dir.join("snap.json");

    let (success, _, _) = run_cli(&[
        "snapshot",
        "capture",
        "--id",
        "s1",
        "--identity",
        path_str(&dir.join("identity.json")),
        "--continuity",
        path_str(&dir.join("continuity.json")),
        "--out",
        path_str(&snap),
    ]);
    assert!(success);

    let text = fs::read_to_string(&snap).unwrap();
    fs::write(&snap, text.replace("alice", "mallory")).unwrap();
    let (success, _, stderr) = run_cli(&["snapshot", "show", path_str(&snap)]);
    assert!(!success);
    assert!(stderr.contains("integrity check failed"));
}

#[test]
fn test_config_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    let source = temp_dir.path().join("agent.json");
    write_json(&source, &json!({"model": "local", "retries": 3}));

    let (success, stdout, _) = run_cli(&[
        "--config-dir",
        path_str(&config_dir),
        "config",
        "save",
        "agent",
        path_str(&source),
        "--version",
        "2.0.0",
    ]);
    assert!(success);
    assert!(stdout.contains("Checksum:"));

    let (success, stdout, _) = run_cli(&["--config-dir", path_str(&config_dir), "config", "show", "agent"]);
    assert!(success);
    let shown: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(shown["retries"], 3);

    let (success, stdout, _) = run_cli(&["--config-dir", path_str(&config_dir), "config", "list", "--json"]);
    assert!(success);
    let listing: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listing["agent"]["version"], "2.0.0");
    assert_eq!(listing["agent"]["has_checksum"], true);

    let (success, _, _) = run_cli(&["--config-dir", path_str(&config_dir), "config", "verify", "agent"]);
    assert!(success);

    fs::write(config_dir.join("agent.json"), r#"{"model": "remote", "retries": 3}"#).unwrap();
    let (success, _, stderr) = run_cli(&["--config-dir", path_str(&config_dir), "config", "verify", "agent"]);
    assert!(!success);
    assert!(stderr.contains("integrity"));

    let (success, _, _) = run_cli(&["--config-dir", path_str(&config_dir), "config", "show", "agent"]);
    assert!(!success);
    let (success, stdout, _) = run_cli(&[
        "--config-dir",
        path_str(&config_dir),
        "config",
        "show",
        "agent",
        "--no-verify",
    ]);
    assert!(success);
    assert!(stdout.contains("remote"));
}

#[test]
fn test_timeline_validate() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.json");
    let bad = temp_dir.path().join("bad.json");
    write_json(
        &good,
        &json!({"timeline_id": "tl_001", "events": [
            {"id": "e1", "timestamp": "2025-01-01T00:00:00Z", "event_type": "session_start", "actor": "alice"}
        ]}),
    );
    write_json(&bad, &json!([{"id": "e1"}]));

    let (success, stdout, _) = run_cli(&["timeline", "validate", path_str(&good), "--json"]);
    assert!(success);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["timeline_id"], "tl_001");

    let (success, stdout, _) = run_cli(&["timeline", "validate", path_str(&bad)]);
    assert!(success);
    assert!(stdout.contains("missing fields"));

    let (success, _, _) = run_cli(&["timeline", "validate", path_str(&bad), "--strict"]);
    assert!(!success);
}

#[test]
fn test_status_command() {
    let vault_dir = create_vault();
    let temp_dir = TempDir::new().unwrap();
    let vault = temp_dir.path().join("vault.yaml");
    fs::write(
        &vault,
        format!(
            "vault_id: vault_001\nname: Test Vault\npath: {}\ncreated_at: \"2025-01-01T00:00:00Z\"\n",
            path_str(vault_dir.path())
        ),
    )
    .unwrap();

    let (success, stdout, _) = run_cli(&["status", "--vault", path_str(&vault), "--json"]);
    assert!(success);
    let status: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["vault_loaded"], true);
    assert_eq!(status["vault_id"], "vault_001");
    assert_eq!(status["state_hash"].as_str().unwrap().len(), 64);

    let (success, _, stderr) = run_cli(&["status"]);
    assert!(!success);
    assert!(stderr.contains("--vault"));
}

#[test]
fn test_json_logging_goes_to_stderr() {
    let vault = create_vault();
    let (success, stdout, stderr) = run_cli(&[
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "compute-hash",
        path_str(vault.path()),
        "--json",
    ]);
    assert!(success);
    assert!(serde_json::from_str::<Value>(&stdout).is_ok());
    let first_log: Value = serde_json::from_str(stderr.lines().next().unwrap()).unwrap();
    assert!(first_log.get("timestamp").is_some());
}
