//! CLI integration tests for dbbrowse.
//!
//! These tests verify argument parsing, help output, statement output,
//! and exit codes for the error classes. None of them need a database.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

/// Get a command for the dbbrowse binary.
fn cmd() -> Command {
    Command::cargo_bin("dbbrowse").unwrap()
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("select"))
        .stdout(predicate::str::contains("update-cell"))
        .stdout(predicate::str::contains("insert-row"))
        .stdout(predicate::str::contains("delete-rows"))
        .stdout(predicate::str::contains("schemas"))
        .stdout(predicate::str::contains("tables"))
        .stdout(predicate::str::contains("describe"));
}

#[test]
fn test_select_subcommand_help() {
    cmd()
        .args(["select", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--filters"))
        .stdout(predicate::str::contains("--sort"))
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--offset"))
        .stdout(predicate::str::contains("[default: postgres]"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dbbrowse"));
}

// =============================================================================
// Global Flags Tests
// =============================================================================

#[test]
fn test_global_flag_defaults() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: dbbrowse.yaml]"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("[default: info]"));
}

#[test]
fn test_short_config_flag() {
    cmd()
        .args(["-c", "some_config.yaml", "--help"])
        .assert()
        .success();
}

#[test]
fn test_unknown_log_format_exits_with_code_1() {
    cmd()
        .args(["--log-format", "xml", "select", "--schema", "s", "--table", "t"])
        .assert()
        .code(1);
}

// =============================================================================
// Statement Output Tests
// =============================================================================

#[test]
fn test_select_prints_data_and_count_queries() {
    let output = cmd()
        .args([
            "select",
            "--schema",
            "public",
            "--table",
            "users",
            "--filters",
            r#"[{"column":"age","operator":">","value":18}]"#,
            "--sort",
            "name:asc",
            "--limit",
            "10",
            "--offset",
            "20",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(
        json["data"]["query"],
        r#"SELECT * FROM "public"."users" WHERE "age" > $1 ORDER BY "name" ASC LIMIT $2 OFFSET $3"#
    );
    assert_eq!(json["data"]["params"], serde_json::json!([18, 10, 20]));
    assert_eq!(
        json["count"]["query"],
        r#"SELECT COUNT(*) as total FROM "public"."users" WHERE "age" > $1"#
    );
    assert_eq!(json["count"]["params"], serde_json::json!([18]));
}

#[test]
fn test_select_mysql_dialect() {
    let output = cmd()
        .args([
            "select", "--schema", "shop", "--table", "orders", "--dialect", "mysql",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(
        json["data"]["query"],
        "SELECT * FROM `shop`.`orders` LIMIT ? OFFSET ?"
    );
    assert_eq!(json["data"]["params"], serde_json::json!([50, 0]));
}

#[test]
fn test_select_uses_configured_page_size() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  type: postgres").unwrap();
    writeln!(file, "  host: localhost").unwrap();
    writeln!(file, "  database: app").unwrap();
    writeln!(file, "  user: app").unwrap();
    writeln!(file, "browse:").unwrap();
    writeln!(file, "  default_page_size: 25").unwrap();

    let output = cmd()
        .args(["--config", file.path().to_str().unwrap()])
        .args(["select", "--schema", "public", "--table", "users"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["data"]["params"], serde_json::json!([25, 0]));
}

#[test]
fn test_update_cell_prints_statement() {
    let output = cmd()
        .args([
            "update-cell",
            "--schema",
            "s",
            "--table",
            "t",
            "--column",
            "email",
            "--value",
            "x@y.com",
            "--pk",
            "id=5",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(
        json["query"],
        r#"UPDATE "s"."t" SET "email" = $1 WHERE "id" = $2"#
    );
    assert_eq!(json["params"], serde_json::json!(["x@y.com", 5]));
}

#[test]
fn test_insert_row_prints_statement() {
    let output = cmd()
        .args([
            "insert-row",
            "--schema",
            "public",
            "--table",
            "users",
            "--set",
            "name=\"ada\"",
            "--set",
            "age=36",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(
        json["query"],
        r#"INSERT INTO "public"."users" ("name", "age") VALUES ($1, $2) RETURNING *"#
    );
    assert_eq!(json["params"], serde_json::json!(["ada", 36]));
}

#[test]
fn test_delete_rows_prints_statement() {
    let output = cmd()
        .args([
            "delete-rows",
            "--schema",
            "s",
            "--table",
            "t",
            "--pk-columns",
            "a,b",
            "--row",
            r#"{"a":1,"b":2}"#,
            "--row",
            r#"{"a":3,"b":4}"#,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(
        json["query"],
        r#"DELETE FROM "s"."t" WHERE ("a" = $1 AND "b" = $2) OR ("a" = $3 AND "b" = $4)"#
    );
    assert_eq!(json["params"], serde_json::json!([1, 2, 3, 4]));
}

// =============================================================================
// Exit Code Tests - Request Errors (Exit Code 2)
// =============================================================================

#[test]
fn test_invalid_identifier_exits_with_code_2() {
    cmd()
        .args(["select", "--schema", "", "--table", "users"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid identifier"));
}

#[test]
fn test_bad_filter_json_exits_with_code_2() {
    cmd()
        .args([
            "select",
            "--schema",
            "public",
            "--table",
            "users",
            "--filters",
            r#"[{"column":"age","operator":"~~","value":1}]"#,
        ])
        .assert()
        .code(2);
}

#[test]
fn test_missing_pk_value_exits_with_code_2() {
    cmd()
        .args([
            "delete-rows",
            "--schema",
            "s",
            "--table",
            "t",
            "--pk-columns",
            "id",
            "--row",
            r#"{"other":1}"#,
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing primary key value"));
}

// =============================================================================
// Exit Code Tests - Config Errors (Exit Code 1 / 7)
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    // Missing file is an IO error (code 7), not config error (code 1)
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "schemas"])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "schemas"])
        .assert()
        .code(1);
}

#[test]
fn test_empty_config_exits_with_code_1() {
    let file = tempfile::NamedTempFile::new().unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "tables"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_required_fields_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  type: postgres").unwrap();
    writeln!(file, "  host: \"\"").unwrap();
    writeln!(file, "  database: app").unwrap();
    writeln!(file, "  user: app").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "schemas"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("connection.host is required"));
}

#[test]
fn test_unknown_dialect_exits_with_code_1() {
    cmd()
        .args([
            "select", "--schema", "s", "--table", "t", "--dialect", "oracle",
        ])
        .assert()
        .code(1);
}

// =============================================================================
// No Subcommand Tests
// =============================================================================

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}
