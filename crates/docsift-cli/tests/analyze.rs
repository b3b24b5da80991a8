//! Integration tests for the docsift binary.

use assert_cmd::Command;
use predicates::prelude::*;

const RULES: &str = r#"{
  "invoice": {
    "keywords": ["invoice"],
    "phrases": ["total due"],
    "weights": {"keyword": 2.0, "phrase": 3.0, "regex": 1.0}
  },
  "flight_ticket": {},
  "passport": {}
}"#;

const INVOICE_TEXT: &str = "\
Invoice No: INV-12345
Invoice Date: 15.01.2024
Bill To:
Acme GmbH
Total due: $1,234.56
";

fn docsift() -> Command {
    Command::cargo_bin("docsift").unwrap()
}

#[test]
fn analyze_classifies_invoice_and_proposes_name() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.json");
    let doc = dir.path().join("scan001.txt");
    std::fs::write(&rules, RULES).unwrap();
    std::fs::write(&doc, INVOICE_TEXT).unwrap();

    docsift()
        .args(["analyze", doc.to_str().unwrap(), "--rules", rules.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""top_class":"invoice""#))
        .stdout(predicate::str::contains(r#""invoice_number":"INV-12345""#))
        .stdout(predicate::str::contains("Inv_INV-12345_Acme_GmbH_1234.56_2024-01-15.txt"));
}

#[test]
fn analyze_rename_moves_file_and_avoids_collision() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.json");
    std::fs::write(&rules, RULES).unwrap();
    std::fs::write(dir.path().join("a.txt"), INVOICE_TEXT).unwrap();
    std::fs::write(dir.path().join("b.txt"), INVOICE_TEXT).unwrap();

    docsift()
        .args([
            "analyze",
            dir.path().to_str().unwrap(),
            "--rules",
            rules.to_str().unwrap(),
            "--rename",
        ])
        .assert()
        .success();

    let base = dir.path().join("Inv_INV-12345_Acme_GmbH_1234.56_2024-01-15.txt");
    let deduped = dir.path().join("Inv_INV-12345_Acme_GmbH_1234.56_2024-01-15_1.txt");
    assert!(base.exists(), "first rename target missing");
    assert!(deduped.exists(), "collision target missing");
    assert!(!dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn analyze_low_confidence_falls_back_to_other() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.json");
    let doc = dir.path().join("doc.txt");
    std::fs::write(&rules, RULES).unwrap();
    std::fs::write(&doc, "nothing that matches any rule").unwrap();

    docsift()
        .args(["analyze", doc.to_str().unwrap(), "--rules", rules.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""top_class":"other""#))
        .stdout(predicate::str::contains(r#""extracted":null"#));
}

#[test]
fn analyze_writes_csv_report() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.json");
    let doc = dir.path().join("doc.txt");
    let report = dir.path().join("out/report.csv");
    std::fs::write(&rules, RULES).unwrap();
    std::fs::write(&doc, INVOICE_TEXT).unwrap();

    docsift()
        .args([
            "analyze",
            doc.to_str().unwrap(),
            "--rules",
            rules.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
        ])
        .assert()
        .success();

    let csv = std::fs::read_to_string(&report).unwrap();
    assert!(csv.starts_with("path_in,path_out,top_class,confidence"));
    assert!(csv.contains("invoice"));
    assert!(csv.contains("INV-12345"));
}

#[test]
fn rules_validate_rejects_bad_regex() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.json");
    std::fs::write(&rules, r#"{"invoice": {"regexes": ["(unclosed"]}}"#).unwrap();

    docsift()
        .args(["rules", "validate", rules.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid regex"));
}

#[test]
fn rules_init_then_validate() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.json");

    docsift()
        .args(["rules", "init", rules.to_str().unwrap()])
        .assert()
        .success();

    docsift()
        .args(["rules", "validate", rules.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 classes"));
}
