use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn mentorhub() -> Command {
    let mut cmd = Command::cargo_bin("mentorhub").unwrap();
    for var in [
        "MENTORHUB_CONFIG",
        "MENTORHUB_PORT",
        "MENTORHUB_STORAGE_TYPE",
        "MENTORHUB_STORAGE_DIR",
        "MENTORHUB_MAIL_RELAY_URL",
        "MENTORHUB_ANALYSIS_API_KEY",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("mentorhub.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_help_lists_subcommands() {
    mentorhub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("weekly-report"));
}

#[test]
fn test_show_config_applies_file_values() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
[server]
port = 6100

[booking]
currency = "EUR"
"#,
    );

    mentorhub()
        .args(["--config", config.to_str().unwrap(), "show-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port = 6100"))
        .stdout(predicate::str::contains("currency = \"EUR\""));
}

#[test]
fn test_invalid_config_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
[verification]
token_bytes = 4
"#,
    );

    mentorhub()
        .args(["--config", config.to_str().unwrap(), "show-config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("token_bytes"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    mentorhub()
        .args(["--config", missing.to_str().unwrap(), "show-config"])
        .assert()
        .code(2);
}

#[test]
fn test_weekly_report_writes_json_file() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    let config = write_config(
        &dir,
        &format!(
            r#"
[storage]
backend = "file"

[storage.file]
base_dir = {:?}
"#,
            data_dir.to_str().unwrap()
        ),
    );
    let output = dir.path().join("report.json");

    mentorhub()
        .args([
            "--config",
            config.to_str().unwrap(),
            "weekly-report",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["totalBookings"], 0);
    assert_eq!(report["statusCounts"]["scheduled"], 0);
    assert!(data_dir.join("mentors").is_dir());
}
