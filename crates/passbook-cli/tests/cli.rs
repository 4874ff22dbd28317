use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn passbook() -> Command {
    Command::cargo_bin("passbook").unwrap()
}

fn write_pages(dir: &Path, name: &str) -> std::path::PathBuf {
    let pages = json!([
        {
            "number": 1,
            "text": "HDFC BANK LTD\nStatement of account",
            "tables": [[
                ["Tran Date", "Chq No", "Particulars", "Debit", "Credit", "Balance", "Init.Br"],
                ["01-06-2025", "", "Opening Balance", "", "", "100000.00", ""],
                ["02-06-2025", "", "Salary Credit", "", "50000.00", "150000.00", "0042"],
                ["01-06-2025", "000123", "Rent", "15,000.00", null, "135000.00", null]
            ]]
        }
    ]);
    let path = dir.join(name);
    fs::write(&path, pages.to_string()).unwrap();
    path
}

#[test]
fn process_prints_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_pages(dir.path(), "june.json");

    passbook()
        .args(["process", "-f", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Tran Date,Chq No,Particulars,Debit,Credit,Balance,Init.Br",
        ))
        .stdout(predicate::str::contains("01-06-2025,000123,Rent,15000.00,,135000.00,"))
        .stdout(predicate::str::contains("Salary Credit").and(predicate::str::contains("Opening").not()));
}

#[test]
fn process_writes_json_file() {
    let dir = TempDir::new().unwrap();
    let input = write_pages(dir.path(), "june.json");
    let output = dir.path().join("out.json");

    passbook()
        .arg("process")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 transactions from HDFC Bank"));

    let outcome: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["bank_code"], "hdfc");
    assert_eq!(outcome["date_range"]["end"], "02-06-2025");
}

#[test]
fn process_fails_on_empty_document() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("blank.json");
    fs::write(&input, r#"[{"number": 1, "text": ""}]"#).unwrap();

    passbook()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No tables or text could be extracted from the PDF",
        ));
}

#[test]
fn process_prints_failed_status() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("blank.json");
    fs::write(&input, r#"[{"number": 1, "text": ""}]"#).unwrap();

    passbook()
        .args(["process", "-f", "status"])
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""error_kind": "no_tables_or_text""#))
        .stdout(predicate::str::contains(r#""transaction_count": 0"#));
}

#[test]
fn process_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "hello").unwrap();

    passbook()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: txt"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    write_pages(dir.path(), "june.json");
    fs::write(dir.path().join("blank.json"), r#"[{"number": 1}]"#).unwrap();
    let out_dir = dir.path().join("out");
    let pattern = dir.path().join("*.json");

    passbook()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("-o")
        .arg(&out_dir)
        .args(["-f", "csv", "--summary", "--continue-on-error", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 files"));

    assert!(out_dir.join("june.csv").exists());
    assert!(!out_dir.join("blank.csv").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("june.json,success,HDFC Bank,2,01-06-2025,02-06-2025,,"));
    assert!(summary.contains("blank.json,error,,0,,,no_tables_or_text,"));
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    passbook()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.text_fallback", "always"])
        .assert()
        .success();

    passbook()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "extraction.text_fallback"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"always\""));
}
