//! Integration tests for the octane-migrate CLI
//!
//! These run the binary end-to-end with assert_cmd. Nothing here talks to a
//! real server: migrations run with --dry-run or fail before connecting.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const EXPORT: &str = "\
Name,Description,Folder,Steps,Param 1,Param 2,Param 3,Param 4,Expected Result
Exported from legacy tool,,,,,,,,
Login,Checks the login page,Web,\"Open the app\nType \"\"admin\"\"\",\"user: bob\npin:11\",\"user: amy\npin:22\",\"user: joe\npin:33\",\"user: eve\npin:44\",Welcome page is shown
Logout,Checks logout,Web,Click logout,a:1,a:2,a:3,a:4,Sign-in page is shown
";

/// Helper to get an octane-migrate command with no OCTANE_* environment
fn octane_migrate() -> Command {
    let mut cmd = Command::cargo_bin("octane-migrate").unwrap();
    for var in [
        "OCTANE_SERVER",
        "OCTANE_SHARED_SPACE",
        "OCTANE_WORKSPACE",
        "OCTANE_CLIENT_ID",
        "OCTANE_CLIENT_SECRET",
        "OCTANE_USER",
        "OCTANE_PASSWORD",
        "OCTANE_DEFAULT_USER_NAME",
        "OCTANE_DEFAULT_USER_ID",
        "OCTANE_TIMEOUT_SECS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Temp dir with the export and an empty config file
fn setup() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let csv = tmp.path().join("export.csv");
    let config = tmp.path().join("config.yaml");
    fs::write(&csv, EXPORT).unwrap();
    fs::write(&config, "").unwrap();
    (tmp, csv, config)
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    octane_migrate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_migrate_help_lists_flags() {
    octane_migrate()
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--start-record"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--shared-space"));
}

#[test]
fn test_version_displays() {
    octane_migrate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("octane-migrate"));
}

#[test]
fn test_completions_bash() {
    octane_migrate()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octane-migrate"));
}

// ============================================================================
// Migrate Tests
// ============================================================================

#[test]
fn test_migrate_missing_file() {
    let (tmp, _, config) = setup();
    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args(["migrate", "--dry-run"])
        .arg(tmp.path().join("missing.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_dry_run_migrates_every_data_row() {
    let (_tmp, csv, config) = setup();
    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args(["migrate", "--dry-run"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Record 3: Created test DRY-1 - Login"))
        .stdout(predicate::str::contains("Record 4: Created test DRY-3 - Logout"))
        .stdout(predicate::str::contains("Tests migrated:   2"))
        .stdout(predicate::str::contains("Dry run complete"))
        .stdout(predicate::str::contains("Exported from legacy tool").not());
}

#[test]
fn test_dry_run_prints_legacy_payloads() {
    let (_tmp, csv, config) = setup();
    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args(["migrate", "--dry-run"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"PUT tests/DRY-1/script {"script":"- Open the app\n- Type \"admin\"\n","comment":"","revision_type":"Minor"}"#,
        ))
        .stdout(predicate::str::contains(
            r#"{"data":[{"name":"paramTableDRY-1","data":{"iterations":[{"user":" bob","pin":"11"},{"user":" amy","pin":"22"},{"user":" joe","pin":"33"},{"user":" eve","pin":"44"}],"parameters":["user","pin"]}}]}"#,
        ));
}

#[test]
fn test_dry_run_resumes_from_start_record() {
    let (_tmp, csv, config) = setup();
    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args(["migrate", "--dry-run", "--start-record", "4"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("starting at record 4"))
        .stdout(predicate::str::contains("Record 4: Created test DRY-1 - Logout"))
        .stdout(predicate::str::contains("Login").not())
        .stdout(predicate::str::contains("Tests migrated:   1"));
}

#[test]
fn test_dry_run_short_row_fails() {
    let (tmp, _, config) = setup();
    let csv = tmp.path().join("short.csv");
    fs::write(&csv, "h\nh\nOnly,three,columns\n").unwrap();

    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args(["migrate", "--dry-run"])
        .arg(&csv)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed at record: 3"))
        .stderr(predicate::str::contains("--start-record"));
}

#[test]
fn test_dry_run_ignores_connection_config() {
    let (tmp, csv, _) = setup();
    octane_migrate()
        .env("OCTANE_WORKSPACE", "abc")
        .arg("--config")
        .arg(tmp.path().join("missing.yaml"))
        .args(["migrate", "--dry-run"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Tests migrated:   2"));
}

#[test]
fn test_migrate_rejects_bad_env_number() {
    let (_tmp, csv, config) = setup();
    octane_migrate()
        .env("OCTANE_WORKSPACE", "abc")
        .arg("--config")
        .arg(&config)
        .arg("migrate")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for OCTANE_WORKSPACE"))
        .stderr(predicate::str::contains("octane_migrate::config::invalid_env"));
}

#[test]
fn test_migrate_requires_server() {
    let (_tmp, csv, config) = setup();
    octane_migrate()
        .arg("--config")
        .arg(&config)
        .arg("migrate")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing configuration: server"));
}

#[test]
fn test_migrate_requires_credentials() {
    let (_tmp, csv, config) = setup();
    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args([
            "migrate",
            "--server",
            "http://127.0.0.1:9",
            "--shared-space",
            "1001",
            "--workspace",
            "1002",
        ])
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing credentials"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_show_masks_secrets() {
    let (tmp, _, _) = setup();
    let config = tmp.path().join("octane.yaml");
    fs::write(
        &config,
        "server: https://octane.example.com\nshared_space: 1001\nclient_id: key\nclient_secret: hunter2\n",
    )
    .unwrap();

    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://octane.example.com"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_show_single_key() {
    let (tmp, _, _) = setup();
    let config = tmp.path().join("octane.yaml");
    fs::write(&config, "workspace: 1002\n").unwrap();

    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args(["config", "show", "workspace"])
        .assert()
        .success()
        .stdout("1002\n");
}

#[test]
fn test_config_env_overrides_file() {
    let (tmp, _, _) = setup();
    let config = tmp.path().join("octane.yaml");
    fs::write(&config, "workspace: 1002\n").unwrap();

    octane_migrate()
        .env("OCTANE_WORKSPACE", "3003")
        .arg("--config")
        .arg(&config)
        .args(["config", "show", "workspace"])
        .assert()
        .success()
        .stdout("3003\n");
}

#[test]
fn test_config_show_unknown_key() {
    let (_tmp, _, config) = setup();
    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args(["config", "show", "editor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_config_invalid_yaml() {
    let (tmp, _, _) = setup();
    let config = tmp.path().join("broken.yaml");
    fs::write(&config, "shared_space: [not, a, number\n").unwrap();

    octane_migrate()
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_config_keys() {
    octane_migrate()
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("client_secret"))
        .stdout(predicate::str::contains("timeout_secs"));
}
