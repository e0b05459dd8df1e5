//! End-to-end CLI tests: run the binary against temp files.

use std::io::Write;
use std::process::Command;

fn tyin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tyin"))
}

fn write_temp(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".js")
        .tempfile()
        .expect("temp file");
    file.write_all(source.as_bytes()).expect("write source");
    file
}

#[test]
fn test_report_output() {
    let file = write_temp("const x = 1;\nlet y = \"hi\";\n");
    let output = tyin()
        .arg(file.path())
        .arg("--no-color")
        .output()
        .expect("run tyin");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("const x: 1"), "{stdout}");
    assert!(stdout.contains("let y: string"), "{stdout}");
    assert!(stdout.contains("blocks"), "{stdout}");
}

#[test]
fn test_json_output_is_valid() {
    let file = write_temp("function add(a, b) { return a + b; } add(1, 2);");
    let output = tyin()
        .arg(file.path())
        .args(["--format", "json"])
        .output()
        .expect("run tyin");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let document: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert!(document["annotations"].is_array());
    assert!(document["errors"].as_array().expect("errors array").is_empty());
}

#[test]
fn test_declaration_output() {
    let file = write_temp("function id(x) { return x; } id(42);");
    let output = tyin()
        .arg(file.path())
        .args(["--format", "declaration"])
        .output()
        .expect("run tyin");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("declare function id(x: number): number;"),
        "{stdout}"
    );
}

#[test]
fn test_inline_output() {
    let file = write_temp("const total = 10;");
    let output = tyin()
        .arg(file.path())
        .args(["--format", "inline"])
        .output()
        .expect("run tyin");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("const total /* : 10 */ = 10;"), "{stdout}");
}

#[test]
fn test_parse_failure_exits_nonzero() {
    let file = write_temp("let = = 1;");
    let output = tyin().arg(file.path()).output().expect("run tyin");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parse error"), "{stderr}");
}

#[test]
fn test_missing_file_fails() {
    let output = tyin()
        .arg("definitely-not-a-file.js")
        .output()
        .expect("run tyin");
    assert!(!output.status.success());
}
